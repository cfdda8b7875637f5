//! SAF vs RSF event-type distribution.
//!
//! `attributed` counts records by their `actor1` bucket, the attribution rule
//! used everywhere else. `dyadic` counts a record for a bucket when either
//! side belongs to it, so a clash between the two shows up under both.

use std::collections::BTreeMap;

use ced_core::{ActorBucket, NormalizedEvent};
use serde::Serialize;

use crate::temporal::event_type_of;

pub const DISTRIBUTION_BUCKETS: [ActorBucket; 2] = [ActorBucket::Saf, ActorBucket::Rsf];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorEventDistribution {
    pub bucket: ActorBucket,
    pub attributed: BTreeMap<String, usize>,
    pub dyadic: BTreeMap<String, usize>,
}

pub fn actor_event_distribution(events: &[NormalizedEvent]) -> Vec<ActorEventDistribution> {
    DISTRIBUTION_BUCKETS
        .iter()
        .map(|&bucket| {
            let mut attributed: BTreeMap<String, usize> = BTreeMap::new();
            let mut dyadic: BTreeMap<String, usize> = BTreeMap::new();
            for e in events.iter().filter(|e| e.involves(bucket)) {
                let t = event_type_of(e).to_string();
                if e.actor_bucket == bucket {
                    *attributed.entry(t.clone()).or_default() += 1;
                }
                *dyadic.entry(t).or_default() += 1;
            }
            ActorEventDistribution {
                bucket,
                attributed,
                dyadic,
            }
        })
        .collect()
}
