//! Walkthrough of the live-state classifier across the message types.
//!
//! Run with: cargo run --example classify_live

use chrono::{Duration, TimeZone, Utc};
use trip_track::{classify, GeoFix, PipelineConfig};

fn main() {
    env_logger::init();

    let config = PipelineConfig::default();
    let now = Utc.with_ymd_and_hms(2025, 4, 1, 12, 0, 0).unwrap();

    println!("Live-state classification examples\n");
    println!(
        "Config: {} min window, {} m movement threshold\n",
        config.recent_window_mins, config.min_moving_distance_m
    );

    // 1. Check-in message: indoors, whatever the movement history says
    let indoors = vec![GeoFix::new(45.0, 9.0)
        .with_timestamp(&(now - Duration::minutes(2)).to_rfc3339())
        .with_message_type("OK")];
    println!("1. OK message:            {}", classify(&indoors, now, &config).label());

    // 2. Custom message announces camp
    let camp = vec![GeoFix::new(45.0, 9.0)
        .with_timestamp(&(now - Duration::minutes(2)).to_rfc3339())
        .with_message_type("CUSTOM")];
    println!("2. CUSTOM message:        {}", classify(&camp, now, &config).label());

    // 3. Fresh tracking messages, moving east at speed
    let riding: Vec<GeoFix> = (0..3)
        .map(|i| {
            GeoFix::new(45.0, 9.0 + i as f64 * 0.01)
                .with_timestamp(&(now - Duration::minutes(10 - i * 5)).to_rfc3339())
                .with_message_type("UNLIMITED-TRACK")
        })
        .collect();
    println!("3. Fresh track, moving:   {}", classify(&riding, now, &config).label());

    // 4. Fresh tracking messages, parked at a cafe
    let parked: Vec<GeoFix> = (0..3)
        .map(|i| {
            GeoFix::new(45.0, 9.0)
                .with_timestamp(&(now - Duration::minutes(10 - i * 5)).to_rfc3339())
                .with_message_type("UNLIMITED-TRACK")
        })
        .collect();
    println!("4. Fresh track, parked:   {}", classify(&parked, now, &config).label());

    // 5. Last tracking message is half an hour old
    let stale = vec![GeoFix::new(45.0, 9.0)
        .with_timestamp(&(now - Duration::minutes(30)).to_rfc3339())
        .with_message_type("UNLIMITED-TRACK")];
    println!("5. Stale track message:   {}", classify(&stale, now, &config).label());
}
