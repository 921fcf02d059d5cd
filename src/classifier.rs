//! Live movement-state classification.
//!
//! Decides what the tracker is doing right now from the newest fix's message
//! type and, for plain tracking messages, a time-windowed distance scan over
//! the recent fixes. The classifier is a pure function of the fix list and
//! the supplied wall-clock time: nothing carries over between runs.

use crate::geo_utils::haversine_distance;
use crate::pipeline::PipelineConfig;
use crate::GeoFix;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recognized message-type tags, compared case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Manually sent camp message.
    Custom,
    /// Check-in message: safe indoors for the night.
    Ok,
    /// Automatic tracking message.
    UnlimitedTrack,
    /// Anything else, including a missing tag.
    Unknown,
}

impl MessageKind {
    /// Parse a raw message-type tag. Unrecognized and absent tags both map to
    /// [`MessageKind::Unknown`].
    pub fn parse(tag: Option<&str>) -> Self {
        let Some(tag) = tag else {
            return MessageKind::Unknown;
        };
        if tag.eq_ignore_ascii_case("CUSTOM") {
            MessageKind::Custom
        } else if tag.eq_ignore_ascii_case("OK") {
            MessageKind::Ok
        } else if tag.eq_ignore_ascii_case("UNLIMITED-TRACK") {
            MessageKind::UnlimitedTrack
        } else {
            MessageKind::Unknown
        }
    }
}

/// Classified current activity of the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveState {
    /// Moving along the route.
    Riding,
    /// Recent fixes but no meaningful movement.
    Stopped,
    /// Camping, announced with a custom message.
    Camp,
    /// Indoors for the night, announced with a check-in message.
    Indoors,
}

impl LiveState {
    /// Short lowercase label for panel display.
    pub fn label(&self) -> &'static str {
        match self {
            LiveState::Riding => "riding",
            LiveState::Stopped => "stopped",
            LiveState::Camp => "camp",
            LiveState::Indoors => "indoors",
        }
    }
}

/// Classify the current movement state from the full ordered fix list.
///
/// Evaluated against the newest fix:
/// 1. A `CUSTOM` message means camp, an `OK` message means indoors,
///    regardless of movement history.
/// 2. An `UNLIMITED-TRACK` message older than the recent window means
///    stopped. A fresh one is judged by the cumulative distance covered by
///    the fixes inside the trailing window: under the movement threshold is
///    stopped, otherwise riding.
/// 3. Any other tag defaults to riding.
///
/// An empty fix list defaults to riding; the pipeline short-circuits before
/// that can be observed.
pub fn classify(fixes: &[GeoFix], now: DateTime<Utc>, config: &PipelineConfig) -> LiveState {
    let Some(newest) = fixes.last() else {
        return LiveState::Riding;
    };

    match MessageKind::parse(newest.message_type.as_deref()) {
        MessageKind::Custom => LiveState::Camp,
        MessageKind::Ok => LiveState::Indoors,
        MessageKind::UnlimitedTrack => classify_track_motion(fixes, newest, now, config),
        MessageKind::Unknown => LiveState::Riding,
    }
}

/// Judge a fresh tracking message by recent movement.
fn classify_track_motion(
    fixes: &[GeoFix],
    newest: &GeoFix,
    now: DateTime<Utc>,
    config: &PipelineConfig,
) -> LiveState {
    let window_mins = config.recent_window_mins as f64;

    // No timestamp means the age is unknown: treat as old.
    let Some(newest_ts) = newest.parsed_timestamp() else {
        return LiveState::Stopped;
    };
    if age_minutes(now, newest_ts) > window_mins {
        return LiveState::Stopped;
    }

    // Walk newest to oldest collecting the fixes inside the window. Undated
    // fixes are skipped without breaking the scan; the first dated fix that
    // falls outside the window ends it.
    let mut window: Vec<&GeoFix> = Vec::new();
    for fix in fixes.iter().rev() {
        match fix.parsed_timestamp() {
            None => continue,
            Some(ts) => {
                if age_minutes(now, ts) <= window_mins {
                    window.push(fix);
                } else {
                    break;
                }
            }
        }
    }
    window.reverse();

    // Cumulative distance between consecutive window fixes, in chronological
    // order.
    let moved: f64 = window
        .windows(2)
        .map(|w| haversine_distance(&w[0].point, &w[1].point))
        .sum();

    if moved < config.min_moving_distance_m {
        LiveState::Stopped
    } else {
        LiveState::Riding
    }
}

fn age_minutes(now: DateTime<Utc>, ts: DateTime<Utc>) -> f64 {
    (now - ts).num_seconds() as f64 / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap()
    }

    fn track_fix(lat: f64, lng: f64, h: u32, m: u32) -> GeoFix {
        GeoFix::new(lat, lng)
            .with_timestamp(&at(h, m).to_rfc3339())
            .with_message_type("UNLIMITED-TRACK")
    }

    #[test]
    fn test_message_kind_case_insensitive() {
        assert_eq!(MessageKind::parse(Some("custom")), MessageKind::Custom);
        assert_eq!(MessageKind::parse(Some("Ok")), MessageKind::Ok);
        assert_eq!(
            MessageKind::parse(Some("unlimited-track")),
            MessageKind::UnlimitedTrack
        );
        assert_eq!(MessageKind::parse(Some("TRACK")), MessageKind::Unknown);
        assert_eq!(MessageKind::parse(None), MessageKind::Unknown);
    }

    #[test]
    fn test_ok_means_indoors_regardless_of_movement() {
        let fixes = vec![
            track_fix(45.0, 9.00, 8, 0),
            track_fix(45.0, 9.10, 8, 5),
            GeoFix::new(45.0, 9.20)
                .with_timestamp(&at(8, 10).to_rfc3339())
                .with_message_type("OK"),
        ];
        let state = classify(&fixes, at(8, 12), &PipelineConfig::default());
        assert_eq!(state, LiveState::Indoors);
    }

    #[test]
    fn test_custom_means_camp() {
        let fixes = vec![GeoFix::new(45.0, 9.0)
            .with_timestamp(&at(20, 0).to_rfc3339())
            .with_message_type("CUSTOM")];
        let state = classify(&fixes, at(20, 5), &PipelineConfig::default());
        assert_eq!(state, LiveState::Camp);
    }

    #[test]
    fn test_unknown_tag_defaults_to_riding() {
        let fixes = vec![GeoFix::new(45.0, 9.0)
            .with_timestamp(&at(8, 0).to_rfc3339())
            .with_message_type("TRACK")];
        let state = classify(&fixes, at(12, 0), &PipelineConfig::default());
        assert_eq!(state, LiveState::Riding);

        let untagged = vec![GeoFix::new(45.0, 9.0)];
        let state = classify(&untagged, at(12, 0), &PipelineConfig::default());
        assert_eq!(state, LiveState::Riding);
    }

    #[test]
    fn test_stale_track_message_is_stopped() {
        let fixes = vec![track_fix(45.0, 9.0, 8, 0)];
        // 16 minutes later: outside the window
        let state = classify(&fixes, at(8, 16), &PipelineConfig::default());
        assert_eq!(state, LiveState::Stopped);
    }

    #[test]
    fn test_track_message_without_timestamp_is_stopped() {
        let fixes = vec![GeoFix::new(45.0, 9.0).with_message_type("UNLIMITED-TRACK")];
        let state = classify(&fixes, at(8, 0), &PipelineConfig::default());
        assert_eq!(state, LiveState::Stopped);
    }

    #[test]
    fn test_fresh_but_stationary_is_stopped() {
        // Three fixes within the window, all at the same spot
        let fixes = vec![
            track_fix(45.0, 9.0, 8, 0),
            track_fix(45.0, 9.0, 8, 5),
            track_fix(45.0, 9.0, 8, 10),
        ];
        let state = classify(&fixes, at(8, 12), &PipelineConfig::default());
        assert_eq!(state, LiveState::Stopped);
    }

    #[test]
    fn test_fresh_and_moving_is_riding() {
        // 0.01° of longitude at 45°N is ~787 m, far over the threshold
        let fixes = vec![
            track_fix(45.0, 9.00, 8, 0),
            track_fix(45.0, 9.01, 8, 5),
            track_fix(45.0, 9.02, 8, 10),
        ];
        let state = classify(&fixes, at(8, 12), &PipelineConfig::default());
        assert_eq!(state, LiveState::Riding);
    }

    #[test]
    fn test_window_excludes_old_movement() {
        // Plenty of movement, but all of it before the window; the two fixes
        // inside the window are stationary.
        let fixes = vec![
            track_fix(45.0, 8.00, 6, 0),
            track_fix(45.0, 9.00, 6, 30),
            track_fix(45.0, 9.00, 8, 0),
            track_fix(45.0, 9.00, 8, 10),
        ];
        let state = classify(&fixes, at(8, 12), &PipelineConfig::default());
        assert_eq!(state, LiveState::Stopped);
    }

    #[test]
    fn test_undated_fixes_skipped_in_window_scan() {
        // An undated fix sits between two dated window fixes; the scan steps
        // over it and still sees the movement.
        let fixes = vec![
            track_fix(45.0, 9.00, 8, 0),
            GeoFix::new(45.0, 9.05).with_message_type("UNLIMITED-TRACK"),
            track_fix(45.0, 9.01, 8, 10),
        ];
        let state = classify(&fixes, at(8, 12), &PipelineConfig::default());
        assert_eq!(state, LiveState::Riding);
    }

    #[test]
    fn test_single_fresh_fix_is_stopped() {
        // A one-fix window covers no distance at all
        let fixes = vec![track_fix(45.0, 9.0, 8, 0)];
        let state = classify(&fixes, at(8, 5), &PipelineConfig::default());
        assert_eq!(state, LiveState::Stopped);
    }

    #[test]
    fn test_empty_fix_list_defaults_to_riding() {
        let state = classify(&[], at(8, 0), &PipelineConfig::default());
        assert_eq!(state, LiveState::Riding);
    }
}
