use std::collections::HashSet;

use super::geofence::{GeofencingStatus, Level};

const PLACEHOLDER: &str = "-";
const MAX_FRACTION_DIGITS: usize = 3;

/// Statuses split by level, each keeping the order they arrived in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusBuckets {
    pub intersecting: Vec<GeofencingStatus>,
    pub entering: Vec<GeofencingStatus>,
    pub approaching: Vec<GeofencingStatus>,
}

impl StatusBuckets {
    pub fn get(&self, level: Level) -> &[GeofencingStatus] {
        match level {
            Level::Intersecting => &self.intersecting,
            Level::Entering => &self.entering,
            Level::Approaching => &self.approaching,
        }
    }

    pub fn len(&self) -> usize {
        self.intersecting.len() + self.entering.len() + self.approaching.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps the first status seen for each airspace name and buckets the result by level.
///
/// Statuses whose airspace has no name are dropped.
pub fn aggregate(statuses: Vec<GeofencingStatus>) -> StatusBuckets {
    let mut seen = HashSet::new();
    let mut buckets = StatusBuckets::default();

    for status in statuses {
        let Some(name) = status.name() else {
            continue;
        };
        if !seen.insert(name.to_string()) {
            continue;
        }

        match status.level {
            Level::Intersecting => buckets.intersecting.push(status),
            Level::Entering => buckets.entering.push(status),
            Level::Approaching => buckets.approaching.push(status),
        }
    }

    buckets
}

/// One line of a status board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRow {
    pub title: String,
    pub description: String,
}

impl StatusRow {
    pub fn from_status(status: &GeofencingStatus) -> Self {
        let distance = format_metric(Some(status.context.distance_to));
        let time = format_metric(status.context.time_to);

        StatusRow {
            title: status.name().unwrap_or(PLACEHOLDER).to_string(),
            description: format!("{} m, {} s", distance, time),
        }
    }
}

/// Formats with at most three fraction digits and no trailing zeros.
fn format_metric(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return PLACEHOLDER.to_string();
    };

    let mut text = format!("{:.*}", MAX_FRACTION_DIGITS, value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

/// Latest statuses reported for the aircraft, ready for display.
#[derive(Debug, Default)]
pub struct StatusBoard {
    buckets: StatusBuckets,
    updates: u64,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every bucket with the aggregation of `statuses`.
    pub fn update(&mut self, statuses: Vec<GeofencingStatus>) {
        self.buckets = aggregate(statuses);
        self.updates += 1;
    }

    pub fn buckets(&self) -> &StatusBuckets {
        &self.buckets
    }

    pub fn intersecting(&self) -> &[GeofencingStatus] {
        &self.buckets.intersecting
    }

    pub fn entering(&self) -> &[GeofencingStatus] {
        &self.buckets.entering
    }

    pub fn approaching(&self) -> &[GeofencingStatus] {
        &self.buckets.approaching
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn rows(&self, level: Level) -> Vec<StatusRow> {
        self.buckets
            .get(level)
            .iter()
            .map(StatusRow::from_status)
            .collect()
    }
}
