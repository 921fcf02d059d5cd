//! Per-calendar-day segmentation of an ordered fix stream.
//!
//! Walks the fixes once, grouping them by calendar-day key (the date portion
//! of the timestamp string), and emits one [`DaySegment`] per group — the
//! marker a dashboard renders at the end of each day of the trip.
//!
//! Fixes without a usable timestamp never open or close a group: they are
//! absorbed into the group that is currently open, and any that arrive before
//! the first dated fix merge into the first dated day. A stream with no dated
//! fix at all yields a single segment with no date.

use crate::GeoFix;
use serde::{Deserialize, Serialize};

/// End-of-day marker for one calendar-day group of fixes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySegment {
    /// 1-based position of this day within the trip, in order of appearance.
    pub day_index: u32,
    /// Calendar-day key (`YYYY-MM-DD`), or `None` for an all-undated group.
    pub date: Option<String>,
    /// The last fix observed within the group. An owned copy: callers attach
    /// derived display fields without touching the original stream.
    pub last_fix: GeoFix,
    /// Display text attached by the summary aggregator, when statistics exist
    /// for this date.
    pub summary: Option<String>,
}

impl DaySegment {
    fn close(day_index: u32, date: Option<&str>, last_fix: &GeoFix) -> Self {
        Self {
            day_index,
            date: date.map(str::to_owned),
            last_fix: last_fix.clone(),
            summary: None,
        }
    }
}

/// Partition an ordered fix sequence into per-calendar-day segments.
///
/// For fixes spanning `D` distinct day keys the result is exactly `D`
/// segments, with `day_index` forming the contiguous run `1..=D` in
/// chronological order of appearance. Within one day only the last fix of the
/// run becomes the segment's representative.
///
/// # Example
///
/// ```rust
/// use trip_track::{segment_days, GeoFix};
///
/// let fixes = vec![
///     GeoFix::new(45.0, 9.00).with_timestamp("2024-01-01T08:00:00Z"),
///     GeoFix::new(45.0, 9.01).with_timestamp("2024-01-01T18:00:00Z"),
///     GeoFix::new(45.5, 9.50).with_timestamp("2024-01-02T09:00:00Z"),
/// ];
///
/// let segments = segment_days(&fixes);
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[0].date.as_deref(), Some("2024-01-01"));
/// assert_eq!(segments[1].day_index, 2);
/// ```
pub fn segment_days(fixes: &[GeoFix]) -> Vec<DaySegment> {
    let mut segments = Vec::new();
    let mut current_key: Option<&str> = None;
    let mut last_fix: Option<&GeoFix> = None;
    let mut day_counter: u32 = 0;

    for fix in fixes {
        if let Some(key) = fix.day_key() {
            match current_key {
                Some(current) if current != key => {
                    // Day boundary: close the group that just finished.
                    if let Some(prev) = last_fix {
                        day_counter += 1;
                        segments.push(DaySegment::close(day_counter, Some(current), prev));
                    }
                    current_key = Some(key);
                }
                // First dated fix adopts the key without emitting, so leading
                // undated fixes fold into this first day.
                None => current_key = Some(key),
                _ => {}
            }
        }
        last_fix = Some(fix);
    }

    // Close the final still-open group.
    if let Some(prev) = last_fix {
        day_counter += 1;
        segments.push(DaySegment::close(day_counter, current_key, prev));
    }

    segments
}
