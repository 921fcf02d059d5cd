//! Rendering seam between the pipeline and the map/panel collaborator.
//!
//! The pipeline never touches a map source or a DOM node; it hands a finished
//! [`TrackSnapshot`](crate::TrackSnapshot) to whatever implements
//! [`TrackView`]. [`present`] pushes one snapshot through the seam in a fixed
//! order: track line, live point, day markers, viewport, totals.

use crate::classifier::LiveState;
use crate::segmenter::DaySegment;
use crate::summary::TripTotals;
use crate::{Bounds, GeoFix, GpsPoint, TrackSnapshot};

/// What a rendering collaborator must accept. One method per map source plus
/// the totals panel; the rendering technology behind it is its own business.
pub trait TrackView {
    /// Replace the track polyline.
    fn set_track_line(&mut self, coordinates: &[GpsPoint]);

    /// Replace the live-position marker.
    fn set_live_point(&mut self, fix: &GeoFix, state: LiveState);

    /// Replace the per-day markers.
    fn set_day_markers(&mut self, segments: &[DaySegment]);

    /// Frame the viewport on the track.
    fn set_viewport(&mut self, bounds: &Bounds);

    /// Update the totals panel.
    fn set_totals(&mut self, totals: &TripTotals);
}

/// Push one snapshot through the rendering seam.
pub fn present(view: &mut dyn TrackView, snapshot: &TrackSnapshot) {
    view.set_track_line(&snapshot.polyline);
    view.set_live_point(&snapshot.newest, snapshot.live_state);
    view.set_day_markers(&snapshot.day_segments);
    view.set_viewport(&snapshot.bounds);
    view.set_totals(&snapshot.totals);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrackPipeline;
    use chrono::{TimeZone, Utc};

    #[derive(Default)]
    struct RecordingView {
        calls: Vec<String>,
        line_len: usize,
        live_state: Option<LiveState>,
        marker_count: usize,
    }

    impl TrackView for RecordingView {
        fn set_track_line(&mut self, coordinates: &[GpsPoint]) {
            self.calls.push("track_line".to_string());
            self.line_len = coordinates.len();
        }

        fn set_live_point(&mut self, _fix: &GeoFix, state: LiveState) {
            self.calls.push("live_point".to_string());
            self.live_state = Some(state);
        }

        fn set_day_markers(&mut self, segments: &[DaySegment]) {
            self.calls.push("day_markers".to_string());
            self.marker_count = segments.len();
        }

        fn set_viewport(&mut self, _bounds: &Bounds) {
            self.calls.push("viewport".to_string());
        }

        fn set_totals(&mut self, _totals: &TripTotals) {
            self.calls.push("totals".to_string());
        }
    }

    #[test]
    fn test_present_pushes_every_surface_once() {
        let fixes = vec![
            GeoFix::new(45.0, 9.00)
                .with_timestamp("2024-01-01T08:00:00Z")
                .with_message_type("UNLIMITED-TRACK"),
            GeoFix::new(45.5, 9.50)
                .with_timestamp("2024-01-02T09:00:00Z")
                .with_message_type("OK"),
        ];
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 9, 5, 0).unwrap();
        let pipeline = TrackPipeline::new();
        let output = pipeline.run(&fixes, now).unwrap();
        let snapshot = output.snapshot().unwrap();

        let mut view = RecordingView::default();
        present(&mut view, snapshot);

        assert_eq!(
            view.calls,
            vec!["track_line", "live_point", "day_markers", "viewport", "totals"]
        );
        assert_eq!(view.line_len, 2);
        assert_eq!(view.live_state, Some(LiveState::Indoors));
        assert_eq!(view.marker_count, 2);
    }
}
