//! Shift in source reporting scale across the structural break.

use std::collections::BTreeMap;

use ced_core::{NormalizedEvent, Period};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleShare {
    pub period: Period,
    pub source_scale: String,
    pub reports: usize,
    /// Share of the period's reports with a known scale, in percent.
    pub share_pct: f64,
}

/// Per-period shares of the `top` most common source scales. Reports without
/// a scale take no part in the ranking or the shares. Shares are over every
/// scaled report in the period, so the top scales need not sum to 100.
pub fn source_scale_shift(events: &[NormalizedEvent], top: usize) -> Vec<ScaleShare> {
    let mut overall: BTreeMap<&str, usize> = BTreeMap::new();
    let mut per_period: BTreeMap<(Period, &str), usize> = BTreeMap::new();
    let mut period_totals: BTreeMap<Period, usize> = BTreeMap::new();
    let mut unscaled = 0usize;
    for e in events {
        let Some(scale) = e.event.context.source_scale.as_deref() else {
            unscaled += 1;
            continue;
        };
        *overall.entry(scale).or_default() += 1;
        *per_period.entry((e.period, scale)).or_default() += 1;
        *period_totals.entry(e.period).or_default() += 1;
    }
    if unscaled > 0 {
        tracing::debug!(reports = unscaled, "reports without a source scale left out");
    }

    let mut ranked: Vec<(&str, usize)> = overall.into_iter().collect();
    // Stable sort over name-ordered input: ties stay alphabetical.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(top);

    let mut out = Vec::new();
    for period in Period::ALL {
        let Some(&total) = period_totals.get(&period) else {
            continue;
        };
        for &(scale, _) in &ranked {
            let reports = per_period.get(&(period, scale)).copied().unwrap_or(0);
            out.push(ScaleShare {
                period,
                source_scale: scale.to_string(),
                reports,
                share_pct: reports as f64 * 100.0 / total as f64,
            });
        }
    }
    out
}
