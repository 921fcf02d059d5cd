//! Daily statistics join and trip-wide totals.
//!
//! The per-date statistics table is produced out of band (one entry per GPX
//! day file) and joined against the day segments here. Every numeric field is
//! optional: sums treat a missing value as zero, and display text degrades
//! per field to a placeholder instead of aborting the aggregation.

use crate::segmenter::DaySegment;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Placeholder shown for a statistic that is missing or not numeric.
const PLACEHOLDER: &str = "—";

/// One day of externally supplied trip statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStat {
    /// Calendar-day key (`YYYY-MM-DD`).
    pub date: String,
    /// Stage label, e.g. `"Milano_Brescia"`. Underscores render as spaces.
    #[serde(default)]
    pub label: Option<String>,
    /// Distance ridden that day in kilometers.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub distance_km: Option<f64>,
    /// Cumulative climb that day in meters.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub elevation_up_m: Option<f64>,
    /// Moving time that day in hours.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub moving_time_h: Option<f64>,
}

impl DailyStat {
    /// Label with underscores replaced by spaces; empty when absent.
    pub fn display_label(&self) -> String {
        self.label.as_deref().unwrap_or("").replace('_', " ")
    }

    /// One-line display text for this day, with per-field placeholders for
    /// missing values.
    pub fn summary_text(&self) -> String {
        let dist = self
            .distance_km
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        let up = self
            .elevation_up_m
            .map(|v| format!("{:.0}", v))
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        let time = self
            .moving_time_h
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| PLACEHOLDER.to_string());

        let label = self.display_label();
        if label.is_empty() {
            format!("{} km · ↑ {} m · {} h", dist, up, time)
        } else {
            format!("{} · {} km · ↑ {} m · {} h", label, dist, up, time)
        }
    }
}

/// Per-date statistics table.
///
/// Keeps the original file order (ties for the longest day go to the first
/// entry) alongside a date index for segment lookup. The table is replaced
/// wholesale when fresh statistics arrive; it is never mutated in place.
#[derive(Debug, Clone, Default)]
pub struct StatsTable {
    days: Vec<DailyStat>,
    by_date: HashMap<String, usize>,
}

impl StatsTable {
    /// Build a table from day entries in file order. When two entries share a
    /// date, the first one wins the index.
    pub fn new(days: Vec<DailyStat>) -> Self {
        let mut by_date = HashMap::with_capacity(days.len());
        for (idx, day) in days.iter().enumerate() {
            by_date.entry(day.date.clone()).or_insert(idx);
        }
        Self { days, by_date }
    }

    /// All entries in file order.
    pub fn days(&self) -> &[DailyStat] {
        &self.days
    }

    /// Look up the statistics for a calendar-day key.
    pub fn get(&self, date: &str) -> Option<&DailyStat> {
        self.by_date.get(date).map(|&idx| &self.days[idx])
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Trip-wide totals derived from the statistics table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripTotals {
    /// Number of days with a statistics entry.
    pub total_days: u32,
    /// Sum of daily distances in kilometers.
    pub total_km: f64,
    /// Sum of daily climbs in meters.
    pub total_elevation_up_m: f64,
    /// Sum of daily moving times in hours.
    pub total_hours: f64,
    /// `total_km / total_days`, zero when there are no days.
    pub avg_km_per_day: f64,
    /// `total_km / total_hours`, zero when no moving time is recorded.
    pub avg_speed_kmh: f64,
    /// The day with the strictly greatest distance; the first maximum wins
    /// ties. Days without a numeric distance are ignored.
    pub longest_day: Option<DailyStat>,
}

/// Compute trip-wide totals over the statistics table.
///
/// Missing numeric fields contribute zero to every sum.
pub fn compute_totals(stats: &StatsTable) -> TripTotals {
    let days = stats.days();

    let total_days = days.len() as u32;
    let total_km: f64 = days.iter().filter_map(|d| d.distance_km).sum();
    let total_elevation_up_m: f64 = days.iter().filter_map(|d| d.elevation_up_m).sum();
    let total_hours: f64 = days.iter().filter_map(|d| d.moving_time_h).sum();

    let avg_km_per_day = if total_days == 0 {
        0.0
    } else {
        total_km / total_days as f64
    };
    let avg_speed_kmh = if total_hours == 0.0 {
        0.0
    } else {
        total_km / total_hours
    };

    let mut longest_day: Option<&DailyStat> = None;
    for day in days {
        let Some(km) = day.distance_km else { continue };
        let best = longest_day
            .and_then(|d| d.distance_km)
            .unwrap_or(f64::NEG_INFINITY);
        if km > best {
            longest_day = Some(day);
        }
    }

    TripTotals {
        total_days,
        total_km,
        total_elevation_up_m,
        total_hours,
        avg_km_per_day,
        avg_speed_kmh,
        longest_day: longest_day.cloned(),
    }
}

/// Attach display text to every segment that has a statistics entry for its
/// date. Segments without a matching entry keep `summary = None`.
pub fn attach_summaries(segments: &mut [DaySegment], stats: &StatsTable) {
    for segment in segments {
        let Some(date) = segment.date.as_deref() else {
            continue;
        };
        if let Some(stat) = stats.get(date) {
            segment.summary = Some(stat.summary_text());
        }
    }
}

/// Accept a JSON number for an optional statistic; anything else (null,
/// string, missing) becomes `None` rather than failing the whole table.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}
