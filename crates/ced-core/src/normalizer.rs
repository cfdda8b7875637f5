//! Normalizer: attaches derived columns to ingested [`EventRecord`] values.
//!
//! For every record the normalizer assigns the structural-break [`Period`]
//! and the actor bucket of `actor1` (the attribution side), keeping the
//! bucket of `actor2` alongside for dyadic views. It also builds the audit
//! table that lists, for every distinct actor string, the bucket it landed in
//! and the rule responsible.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::period::Period;
use crate::taxonomy::{Classification, Taxonomy};
use crate::types::{ActorBucket, EventRecord, NormalizedEvent};

/// One row of the taxonomy audit table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub actor: String,
    pub bucket: ActorBucket,
    /// `kind:pattern` of the matching rule; `None` for the fallback.
    pub rule: Option<String>,
    /// Appearances across `actor1` and `actor2`.
    pub occurrences: usize,
}

/// Applies a [`Taxonomy`] to records. Holds no state of its own.
#[derive(Debug, Clone, Copy)]
pub struct ActorNormalizer<'t> {
    taxonomy: &'t Taxonomy,
}

impl<'t> ActorNormalizer<'t> {
    pub fn new(taxonomy: &'t Taxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &'t Taxonomy {
        self.taxonomy
    }

    pub fn classify(&self, name: &str) -> Classification {
        self.taxonomy.classify(name)
    }

    /// Attach period and actor buckets to one record.
    pub fn normalize(&self, event: EventRecord) -> NormalizedEvent {
        let attribution = match event.actor1.as_deref() {
            Some(name) => {
                let c = self.classify(name);
                if c.is_fallback() {
                    tracing::debug!(actor = name, "unmapped actor, using fallback bucket");
                }
                c.bucket
            }
            None => ActorBucket::OtherArmedGroups,
        };
        let counterpart = event.actor2.as_deref().map(|n| self.classify(n).bucket);

        NormalizedEvent {
            period: Period::for_date(event.event_date),
            actor_bucket: attribution,
            counterpart_bucket: counterpart,
            event,
        }
    }

    /// Normalize a whole table, preserving row order.
    pub fn normalize_all(&self, events: Vec<EventRecord>) -> Vec<NormalizedEvent> {
        let out: Vec<NormalizedEvent> = events.into_iter().map(|e| self.normalize(e)).collect();
        let fallback = out
            .iter()
            .filter(|e| e.actor_bucket == ActorBucket::OtherArmedGroups)
            .count();
        tracing::info!(
            records = out.len(),
            other_armed_groups = fallback,
            taxonomy = self.taxonomy.version(),
            "normalized records"
        );
        out
    }

    /// Audit table over every distinct actor string in `events`, sorted by
    /// actor name.
    pub fn audit<'e, I>(&self, events: I) -> Vec<AuditEntry>
    where
        I: IntoIterator<Item = &'e EventRecord>,
    {
        let mut counts: BTreeMap<&'e str, usize> = BTreeMap::new();
        for e in events {
            for name in [e.actor1.as_deref(), e.actor2.as_deref()].into_iter().flatten() {
                *counts.entry(name).or_default() += 1;
            }
        }

        counts
            .into_iter()
            .map(|(actor, occurrences)| {
                let c = self.classify(actor);
                AuditEntry {
                    actor: actor.to_string(),
                    bucket: c.bucket,
                    rule: c.rule.map(|i| self.taxonomy.rules()[i].describe()),
                    occurrences,
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Text cleaning
// ---------------------------------------------------------------------------

/// Trim and collapse internal whitespace. Returns `None` for empty values and
/// for the `nan` placeholder left behind by spreadsheet exports.
pub fn clean_text(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() || collapsed.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(collapsed)
    }
}

/// Title-case a categorical value. A letter is upper-cased when it starts
/// the value or follows a non-letter, and lower-cased otherwise, so
/// `air/drone strike` becomes `Air/Drone Strike`.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut after_letter = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if after_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(c);
            after_letter = false;
        }
    }
    out
}
