//! # Trip Track
//!
//! Live GPS trip tracking: turns a chronologically ordered stream of position
//! fixes into a renderable snapshot — a continuous track polyline, per-day
//! markers joined with daily statistics, a classified live movement state and
//! a bounding box for viewport framing.
//!
//! This library provides:
//! - Per-calendar-day segmentation of an ordered fix stream
//! - Live movement-state classification (riding / stopped / camp / indoors)
//! - Daily statistics aggregation with trip-wide totals
//! - GeoJSON feed parsing and an optional HTTP refresh service
//!
//! ## Features
//!
//! - **`http`** - Enable the HTTP client for feed fetching and the periodic
//!   refresh service
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use trip_track::{GeoFix, LiveState, PipelineOutput, TrackPipeline};
//!
//! // A short morning of riding, freshly reported
//! let fixes = vec![
//!     GeoFix::new(45.4642, 9.19)
//!         .with_timestamp("2024-01-01T08:00:00Z")
//!         .with_message_type("UNLIMITED-TRACK"),
//!     GeoFix::new(45.4700, 9.21)
//!         .with_timestamp("2024-01-01T08:10:00Z")
//!         .with_message_type("UNLIMITED-TRACK"),
//! ];
//!
//! let pipeline = TrackPipeline::new();
//! let now = Utc.with_ymd_and_hms(2024, 1, 1, 8, 12, 0).unwrap();
//!
//! match pipeline.run(&fixes, now).unwrap() {
//!     PipelineOutput::Snapshot(snapshot) => {
//!         assert_eq!(snapshot.live_state, LiveState::Riding);
//!         assert_eq!(snapshot.day_segments.len(), 1);
//!     }
//!     PipelineOutput::NoData => unreachable!(),
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Unified error handling
pub mod error;
pub use error::{OptionExt, Result, TrackError};

// Geographic utilities (distance, length, center calculations)
pub mod geo_utils;

// Per-calendar-day segmentation of the fix stream
pub mod segmenter;
pub use segmenter::{segment_days, DaySegment};

// Daily statistics join and trip-wide totals
pub mod summary;
pub use summary::{compute_totals, DailyStat, StatsTable, TripTotals};

// Live movement-state classification
pub mod classifier;
pub use classifier::{classify, LiveState, MessageKind};

// Pipeline orchestration (one immutable snapshot per run)
pub mod pipeline;
pub use pipeline::{PipelineConfig, PipelineOutput, TrackPipeline, TrackSnapshot};

// Rendering seam: how a snapshot reaches the map/panel collaborator
pub mod render;
pub use render::{present, TrackView};

// Feed parsing (GeoJSON positions, daily statistics, photo markers)
pub mod feed;
pub use feed::Photo;

// HTTP module for feed fetching and the periodic refresh service
#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{FeedClient, FeedUrls, TrackerService};

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use trip_track::GpsPoint;
/// let point = GpsPoint::new(45.4642, 9.19); // Milano
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Axis-aligned bounding box for a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Compute the bounding box of a coordinate set by a single linear scan,
    /// seeded with the first coordinate.
    ///
    /// Returns `None` for empty input. A single coordinate yields a zero-area
    /// box.
    pub fn from_points(points: &[GpsPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lng: first.longitude,
            max_lng: first.longitude,
        };

        for p in &points[1..] {
            bounds.min_lat = bounds.min_lat.min(p.latitude);
            bounds.max_lat = bounds.max_lat.max(p.latitude);
            bounds.min_lng = bounds.min_lng.min(p.longitude);
            bounds.max_lng = bounds.max_lng.max(p.longitude);
        }

        Some(bounds)
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GpsPoint {
        GpsPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

/// One GPS record from the position feed.
///
/// Fixes are assumed — never verified — to arrive in ascending chronological
/// order. The raw timestamp string is kept as received;
/// [`GeoFix::parsed_timestamp`] gives the parsed form when the string is
/// valid RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    /// Position of the fix.
    pub point: GpsPoint,
    /// ISO-8601 timestamp as received from the feed, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Message-type tag as received ("CUSTOM", "OK", "UNLIMITED-TRACK", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
    /// Remaining feed properties, passed through untouched.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl GeoFix {
    /// Create a fix at the given position with no timestamp or tag.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            point: GpsPoint::new(latitude, longitude),
            timestamp: None,
            message_type: None,
            extra: Map::new(),
        }
    }

    /// Attach a raw ISO-8601 timestamp.
    pub fn with_timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = Some(timestamp.to_string());
        self
    }

    /// Attach a message-type tag.
    pub fn with_message_type(mut self, message_type: &str) -> Self {
        self.message_type = Some(message_type.to_string());
        self
    }

    /// Parse the timestamp as RFC 3339. Unparseable or absent timestamps
    /// both yield `None`.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Calendar-day key of this fix: the date portion (`YYYY-MM-DD`) of the
    /// timestamp string. `None` when the fix has no usable timestamp.
    pub fn day_key(&self) -> Option<&str> {
        self.timestamp.as_deref().and_then(|ts| ts.get(..10))
    }
}

// ============================================================================
// Tests
// ============================================================================
