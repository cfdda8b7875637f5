//! Month-by-month point layer of war-period events located to the exact
//! place, indexed so a figure can step through the conflict one month at a
//! time.

use ced_core::geo::is_high_geo;
use ced_core::{ActorBucket, NormalizedEvent, Period};
use chrono::NaiveDate;
use serde::Serialize;

use crate::month::Month;
use crate::temporal::event_type_of;

/// Coarse grouping of event types used to color the layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EventCategory {
    #[serde(rename = "Battles")]
    Battles,
    #[serde(rename = "Violence Against Civilians")]
    ViolenceAgainstCivilians,
    #[serde(rename = "Strategic Attacks and Movements")]
    StrategicAttacksAndMovements,
}

impl EventCategory {
    pub fn of(event_type: &str) -> Self {
        if event_type.contains("Battles") {
            EventCategory::Battles
        } else if event_type.contains("Violence Against Civilians") {
            EventCategory::ViolenceAgainstCivilians
        } else {
            EventCategory::StrategicAttacksAndMovements
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelapseEvent {
    /// Position of the event's month in [`TimelapseLayer::months`].
    pub month_idx: usize,
    pub event_date: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    pub fatalities: u32,
    pub category: EventCategory,
    pub actor_bucket: ActorBucket,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelapseLayer {
    /// Every month from the first to the last exact-place war event,
    /// including months with none.
    pub months: Vec<Month>,
    pub war_events: usize,
    pub exact_events: usize,
    /// `exact_events` as a share of `war_events`, in percent.
    pub exact_pct: f64,
    /// Exact-place events with no coordinates; counted but not plotted.
    pub without_coordinates: usize,
    pub events: Vec<TimelapseEvent>,
}

/// Build the layer in table order.
pub fn timelapse(events: &[NormalizedEvent]) -> TimelapseLayer {
    let war: Vec<&NormalizedEvent> = events.iter().filter(|e| e.period == Period::War).collect();
    let exact: Vec<&NormalizedEvent> = war
        .iter()
        .copied()
        .filter(|e| is_high_geo(e.event.geo_precision))
        .collect();

    let first = exact.iter().map(|e| Month::of(e.event.event_date)).min();
    let last = exact.iter().map(|e| Month::of(e.event.event_date)).max();
    let months = match (first, last) {
        (Some(first), Some(last)) => Month::range(first, last),
        _ => Vec::new(),
    };

    let mut without_coordinates = 0;
    let mut points = Vec::with_capacity(exact.len());
    for e in &exact {
        let (Some(latitude), Some(longitude)) = (e.event.latitude, e.event.longitude) else {
            without_coordinates += 1;
            continue;
        };
        let Ok(month_idx) = months.binary_search(&Month::of(e.event.event_date)) else {
            continue;
        };
        points.push(TimelapseEvent {
            month_idx,
            event_date: e.event.event_date,
            latitude,
            longitude,
            fatalities: e.event.fatalities,
            category: EventCategory::of(event_type_of(e)),
            actor_bucket: e.actor_bucket,
        });
    }

    let exact_pct = if war.is_empty() {
        0.0
    } else {
        exact.len() as f64 * 100.0 / war.len() as f64
    };
    tracing::debug!(
        war = war.len(),
        exact = exact.len(),
        plotted = points.len(),
        "timelapse layer"
    );
    TimelapseLayer {
        months,
        war_events: war.len(),
        exact_events: exact.len(),
        exact_pct,
        without_coordinates,
        events: points,
    }
}
