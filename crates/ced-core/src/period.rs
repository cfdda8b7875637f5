//! Structural-break tagging and the corpus date window.
//!
//! The break date was fixed once by an external break-detection analysis;
//! it is a constant here and is never recomputed from the data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// First day of the `war` regime.
pub fn structural_break() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 4, 15).expect("structural break is a valid calendar date")
}

/// Regime label derived from `event_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    PreWar,
    War,
}

impl Period {
    /// Both regimes, in chronological order.
    pub const ALL: [Period; 2] = [Period::PreWar, Period::War];

    /// `PreWar` strictly before the break, `War` on or after it.
    pub fn for_date(date: NaiveDate) -> Self {
        if date < structural_break() {
            Period::PreWar
        } else {
            Period::War
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::PreWar => "pre_war",
            Period::War => "war",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

// ---------------------------------------------------------------------------
// Corpus window
// ---------------------------------------------------------------------------

/// Inclusive date range a record must fall in to be retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CorpusWindow {
    #[serde(default = "default_window_start")]
    pub start: NaiveDate,
    #[serde(default = "default_window_end")]
    pub end: NaiveDate,
}

fn default_window_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 4, 15).expect("valid corpus start")
}

fn default_window_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 23).expect("valid corpus end")
}

impl Default for CorpusWindow {
    fn default() -> Self {
        Self {
            start: default_window_start(),
            end: default_window_end(),
        }
    }
}

impl CorpusWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn break_date_is_war() {
        assert_eq!(Period::for_date(date(2023, 4, 15)), Period::War);
        assert_eq!(Period::for_date(date(2023, 4, 14)), Period::PreWar);
    }

    #[test]
    fn window_is_inclusive() {
        let w = CorpusWindow::default();
        assert!(w.contains(date(2019, 4, 15)));
        assert!(w.contains(date(2025, 1, 23)));
        assert!(!w.contains(date(2019, 4, 14)));
        assert!(!w.contains(date(2025, 1, 24)));
    }

    proptest! {
        #[test]
        fn period_splits_on_break(offset in -3000i64..3000) {
            let d = structural_break() + chrono::Duration::days(offset);
            let expected = if offset < 0 { Period::PreWar } else { Period::War };
            prop_assert_eq!(Period::for_date(d), expected);
        }
    }
}
