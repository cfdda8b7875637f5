//! Monthly aggregates: fatalities across the structural break, event-type
//! composition, and per-bucket actor timelines.

use std::collections::BTreeMap;

use ced_core::{ActorBucket, NormalizedEvent, Period};
use serde::Serialize;

use crate::month::Month;

/// Label used when a record carries no event type.
pub const UNKNOWN_EVENT_TYPE: &str = "Unknown";

/// Buckets that get a timeline. The fallback bucket is too heterogeneous to
/// plot as one actor.
pub const TIMELINE_BUCKETS: [ActorBucket; 3] =
    [ActorBucket::Saf, ActorBucket::Rsf, ActorBucket::ProtestGroups];

pub(crate) fn event_type_of(e: &NormalizedEvent) -> &str {
    e.event.event_type.as_deref().unwrap_or(UNKNOWN_EVENT_TYPE)
}

// ---------------------------------------------------------------------------
// Fatalities across the break
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyFatalities {
    pub month: Month,
    pub period: Period,
    pub fatalities: u64,
    /// Mean of this month and up to `window - 1` preceding months of the same
    /// period that have data.
    pub rolling_mean: f64,
}

/// Monthly fatality sums per period with a trailing rolling mean. The mean
/// runs over months present in the period, so it never spans the break.
pub fn monthly_fatalities(events: &[NormalizedEvent], window: usize) -> Vec<MonthlyFatalities> {
    let window = window.max(1);
    let mut sums: BTreeMap<(Period, Month), u64> = BTreeMap::new();
    for e in events {
        *sums.entry((e.period, Month::of(e.event.event_date))).or_default() +=
            u64::from(e.event.fatalities);
    }

    let mut out = Vec::with_capacity(sums.len());
    for period in Period::ALL {
        let series: Vec<(Month, u64)> = sums
            .iter()
            .filter(|((p, _), _)| *p == period)
            .map(|((_, m), v)| (*m, *v))
            .collect();
        for (i, (month, fatalities)) in series.iter().enumerate() {
            let start = (i + 1).saturating_sub(window);
            let slice = &series[start..=i];
            let mean = slice.iter().map(|(_, v)| *v as f64).sum::<f64>() / slice.len() as f64;
            out.push(MonthlyFatalities {
                month: *month,
                period,
                fatalities: *fatalities,
                rolling_mean: mean,
            });
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Event composition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionRow {
    pub month: Month,
    pub event_type: String,
    pub events: usize,
    /// Share of the month's events, in percent.
    pub share_pct: f64,
    /// Centered rolling mean of `share_pct` over neighbouring months, with a
    /// type absent from a month counted as 0.
    pub share_smoothed_pct: f64,
}

/// Event counts and shares per month and event type, plus a centered
/// `window`-month mean of each share over the months that have data.
pub fn event_composition(events: &[NormalizedEvent], window: usize) -> Vec<CompositionRow> {
    let window = window.max(1);
    let mut counts: BTreeMap<Month, BTreeMap<&str, usize>> = BTreeMap::new();
    for e in events {
        *counts
            .entry(Month::of(e.event.event_date))
            .or_default()
            .entry(event_type_of(e))
            .or_default() += 1;
    }

    let shares: Vec<BTreeMap<&str, f64>> = counts
        .values()
        .map(|types| {
            let total: usize = types.values().sum();
            types
                .iter()
                .map(|(t, n)| (*t, *n as f64 * 100.0 / total as f64))
                .collect()
        })
        .collect();

    let before = window / 2;
    let after = window - 1 - before;
    let last = shares.len().saturating_sub(1);
    let mut out = Vec::new();
    for (i, (month, types)) in counts.iter().enumerate() {
        let span = &shares[i.saturating_sub(before)..=(i + after).min(last)];
        for (&event_type, &n) in types {
            let smoothed = span
                .iter()
                .map(|s| s.get(event_type).copied().unwrap_or(0.0))
                .sum::<f64>()
                / span.len() as f64;
            out.push(CompositionRow {
                month: *month,
                event_type: event_type.to_string(),
                events: n,
                share_pct: shares[i][event_type],
                share_smoothed_pct: smoothed,
            });
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Actor timelines
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthCount {
    pub month: Month,
    pub events: usize,
    /// Trailing mean over this month and the preceding zero-filled months.
    pub events_smoothed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorTimeline {
    pub bucket: ActorBucket,
    pub points: Vec<MonthCount>,
}

/// Monthly event counts attributed to each timeline bucket, zero-filled
/// between the bucket's first and last active month, with a trailing
/// `window`-month mean.
pub fn actor_timelines(events: &[NormalizedEvent], window: usize) -> Vec<ActorTimeline> {
    let window = window.max(1);
    TIMELINE_BUCKETS
        .iter()
        .map(|&bucket| {
            let mut counts: BTreeMap<Month, usize> = BTreeMap::new();
            for e in events.iter().filter(|e| e.actor_bucket == bucket) {
                *counts.entry(Month::of(e.event.event_date)).or_default() += 1;
            }
            let filled: Vec<(Month, usize)> = match (counts.keys().next(), counts.keys().next_back()) {
                (Some(&first), Some(&last)) => Month::range(first, last)
                    .into_iter()
                    .map(|month| (month, counts.get(&month).copied().unwrap_or(0)))
                    .collect(),
                _ => Vec::new(),
            };
            let points = filled
                .iter()
                .enumerate()
                .map(|(i, &(month, events))| {
                    let span = &filled[(i + 1).saturating_sub(window)..=i];
                    MonthCount {
                        month,
                        events,
                        events_smoothed: span.iter().map(|(_, n)| *n as f64).sum::<f64>()
                            / span.len() as f64,
                    }
                })
                .collect();
            ActorTimeline { bucket, points }
        })
        .collect()
}
