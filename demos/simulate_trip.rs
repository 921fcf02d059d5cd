//! Simulated trip: feeds a synthetic Milano → Istanbul fix stream through the
//! pipeline and renders the result on the console.
//!
//! Run with: cargo run --example simulate_trip

use chrono::{Duration, TimeZone, Utc};
use trip_track::geo_utils::polyline_length;
use trip_track::{
    present, Bounds, DaySegment, GeoFix, GpsPoint, LiveState, PipelineOutput, StatsTable,
    TrackPipeline, TrackView, TripTotals,
};

/// Console stand-in for the map and the summary panel.
#[derive(Default)]
struct ConsoleView;

impl TrackView for ConsoleView {
    fn set_track_line(&mut self, coordinates: &[GpsPoint]) {
        println!(
            "Track: {} points, {:.0} km as drawn",
            coordinates.len(),
            polyline_length(coordinates) / 1000.0
        );
    }

    fn set_live_point(&mut self, fix: &GeoFix, state: LiveState) {
        println!(
            "Live:  {:.4}, {:.4} ({}) at {}",
            fix.point.latitude,
            fix.point.longitude,
            state.label(),
            fix.timestamp.as_deref().unwrap_or("—"),
        );
    }

    fn set_day_markers(&mut self, segments: &[DaySegment]) {
        println!("\nDay markers:");
        for segment in segments {
            println!(
                "  Day {} [{}]  {}",
                segment.day_index,
                segment.date.as_deref().unwrap_or("no date"),
                segment.summary.as_deref().unwrap_or("(no summary)"),
            );
        }
    }

    fn set_viewport(&mut self, bounds: &Bounds) {
        let center = bounds.center();
        println!(
            "\nViewport: lat {:.2}..{:.2}, lng {:.2}..{:.2} (center {:.2}, {:.2})",
            bounds.min_lat,
            bounds.max_lat,
            bounds.min_lng,
            bounds.max_lng,
            center.latitude,
            center.longitude
        );
    }

    fn set_totals(&mut self, totals: &TripTotals) {
        println!(
            "\nTotals: {} days, {:.0} km, ↑ {:.0} m, {:.1} h",
            totals.total_days, totals.total_km, totals.total_elevation_up_m, totals.total_hours
        );
        println!(
            "        {:.1} km/day, {:.1} km/h average",
            totals.avg_km_per_day, totals.avg_speed_kmh
        );
        if let Some(longest) = &totals.longest_day {
            println!(
                "        longest day: {} ({})",
                longest.date,
                longest.summary_text()
            );
        }
    }
}

fn main() {
    env_logger::init();

    // A rough eastward route, one waypoint every six hours
    let route = [
        (9.19, 45.4642),   // Milano
        (13.7768, 45.6500),  // Trieste
        (15.9819, 45.8150),  // Zagreb
        (20.4489, 44.7866),  // Belgrade
        (27.5667, 47.1667),  // Bucharest
        (28.9784, 41.0082),  // Istanbul
    ];

    let start = Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap();
    let fixes: Vec<GeoFix> = route
        .iter()
        .enumerate()
        .map(|(i, &(lon, lat))| {
            let ts = start + Duration::hours(i as i64 * 6);
            GeoFix::new(lat, lon)
                .with_timestamp(&ts.to_rfc3339())
                .with_message_type("UNLIMITED-TRACK")
        })
        .collect();

    let stats = StatsTable::new(
        serde_json::from_str(
            r#"[
                {"date": "2025-04-01", "label": "Milano_Trieste", "distance_km": 120.0,
                 "elevation_up_m": 850, "moving_time_h": 6.5},
                {"date": "2025-04-02", "label": "Trieste_Belgrado", "distance_km": 145.5,
                 "elevation_up_m": 1200, "moving_time_h": 7.8}
            ]"#,
        )
        .expect("valid sample stats"),
    );

    let mut pipeline = TrackPipeline::new();
    pipeline.set_daily_stats(stats);

    // Pretend we refreshed a few minutes after the last fix came in
    let now = start + Duration::hours((route.len() as i64 - 1) * 6) + Duration::minutes(5);

    match pipeline.run(&fixes, now).expect("pipeline run") {
        PipelineOutput::Snapshot(snapshot) => {
            let mut view = ConsoleView;
            present(&mut view, &snapshot);
        }
        PipelineOutput::NoData => println!("No positions yet."),
    }
}
