//! Feed parsing: GeoJSON positions, daily statistics and photo markers.
//!
//! The position feed is a GeoJSON `FeatureCollection` of `Point` features
//! with `timestamp` and `type` in their properties, assumed chronologically
//! ordered. Rows that cannot yield a usable coordinate are skipped rather
//! than failing the whole feed; every other property passes through on the
//! fix untouched.

use crate::error::{Result, TrackError};
use crate::summary::{DailyStat, StatsTable};
use crate::{GeoFix, GpsPoint};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct SummaryFile {
    #[serde(default)]
    days: Vec<DailyStat>,
}

#[derive(Debug, Deserialize)]
struct PhotosFile {
    #[serde(default)]
    photos: Vec<Photo>,
}

/// One geotagged photo from the parallel photo feed. Rendered as a simple
/// point marker, independent of the track pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub lon: f64,
    pub lat: f64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    pub file: String,
}

/// Parse a GeoJSON `FeatureCollection` body into ordered fixes.
///
/// Non-`Point` geometries, missing coordinates and out-of-range positions are
/// skipped with a debug log. `timestamp` and `type` are lifted out of the
/// properties; the rest stays on the fix as pass-through attributes.
pub fn parse_positions(body: &str) -> Result<Vec<GeoFix>> {
    let collection: FeatureCollection =
        serde_json::from_str(body).map_err(|e| TrackError::MalformedFeed {
            message: e.to_string(),
        })?;

    let mut fixes = Vec::with_capacity(collection.features.len());

    for feature in collection.features {
        let Some(geometry) = feature.geometry else {
            debug!("skipping feature without geometry");
            continue;
        };
        if geometry.kind != "Point" {
            debug!("skipping non-Point geometry: {}", geometry.kind);
            continue;
        }
        if geometry.coordinates.len() < 2 {
            debug!(
                "skipping Point with {} coordinate values",
                geometry.coordinates.len()
            );
            continue;
        }
        let (lon, lat) = (geometry.coordinates[0], geometry.coordinates[1]);

        let point = GpsPoint::new(lat, lon);
        if !point.is_valid() {
            debug!("skipping out-of-range position ({}, {})", lat, lon);
            continue;
        }

        let mut properties = feature.properties;
        let timestamp = take_string(&mut properties, "timestamp");
        let message_type = take_string(&mut properties, "type");

        fixes.push(GeoFix {
            point,
            timestamp,
            message_type,
            extra: properties,
        });
    }

    Ok(fixes)
}

/// Parse a daily-statistics body (`{ "days": [...] }`) into a table.
///
/// A missing or empty `days` array is a valid "no statistics yet" state and
/// yields an empty table.
pub fn parse_daily_stats(body: &str) -> Result<StatsTable> {
    let file: SummaryFile = serde_json::from_str(body).map_err(|e| TrackError::MalformedFeed {
        message: e.to_string(),
    })?;
    Ok(StatsTable::new(file.days))
}

/// Parse a photo-markers body (`{ "photos": [...] }`).
pub fn parse_photos(body: &str) -> Result<Vec<Photo>> {
    let file: PhotosFile = serde_json::from_str(body).map_err(|e| TrackError::MalformedFeed {
        message: e.to_string(),
    })?;
    Ok(file.photos)
}

/// Remove a string property, leaving non-string values in place.
fn take_string(properties: &mut Map<String, Value>, key: &str) -> Option<String> {
    match properties.remove(key) {
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            properties.insert(key.to_string(), other);
            None
        }
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [9.19, 45.4642]},
                "properties": {
                    "timestamp": "2024-01-01T08:00:00Z",
                    "type": "UNLIMITED-TRACK",
                    "battery": "GOOD"
                }
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [9.21, 45.4700]},
                "properties": {"timestamp": "2024-01-01T08:10:00Z", "type": "OK"}
            }
        ]
    }"#;

    #[test]
    fn test_parse_positions() {
        let fixes = parse_positions(FEED).unwrap();
        assert_eq!(fixes.len(), 2);
        assert_eq!(fixes[0].point.longitude, 9.19);
        assert_eq!(fixes[0].point.latitude, 45.4642);
        assert_eq!(fixes[0].timestamp.as_deref(), Some("2024-01-01T08:00:00Z"));
        assert_eq!(fixes[0].message_type.as_deref(), Some("UNLIMITED-TRACK"));
        // Unclaimed properties pass through
        assert_eq!(
            fixes[0].extra.get("battery").and_then(|v| v.as_str()),
            Some("GOOD")
        );
        assert_eq!(fixes[1].message_type.as_deref(), Some("OK"));
    }

    #[test]
    fn test_parse_positions_skips_bad_rows() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": null, "properties": {}},
                {"type": "Feature", "geometry": {"type": "LineString", "coordinates": []}, "properties": {}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [9.19]}, "properties": {}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [200.0, 95.0]}, "properties": {}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [9.19, 45.46]}, "properties": {}}
            ]
        }"#;
        let fixes = parse_positions(body).unwrap();
        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].point.longitude, 9.19);
    }

    #[test]
    fn test_parse_positions_empty_collection() {
        let fixes = parse_positions(r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        assert!(fixes.is_empty());
    }

    #[test]
    fn test_parse_positions_malformed() {
        assert!(matches!(
            parse_positions("not json"),
            Err(TrackError::MalformedFeed { .. })
        ));
    }

    #[test]
    fn test_non_string_type_stays_in_extra() {
        let body = r#"{
            "features": [
                {"geometry": {"type": "Point", "coordinates": [9.19, 45.46]},
                 "properties": {"type": 7}}
            ]
        }"#;
        let fixes = parse_positions(body).unwrap();
        assert_eq!(fixes[0].message_type, None);
        assert_eq!(fixes[0].extra.get("type").and_then(|v| v.as_i64()), Some(7));
    }

    #[test]
    fn test_parse_daily_stats() {
        let table = parse_daily_stats(
            r#"{"days": [
                {"date": "2024-01-01", "label": "Milano_Brescia", "distance_km": 80.5,
                 "elevation_up_m": 1200, "moving_time_h": 5.2}
            ]}"#,
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        let day = table.get("2024-01-01").unwrap();
        assert_eq!(day.distance_km, Some(80.5));
        assert_eq!(day.elevation_up_m, Some(1200.0));
    }

    #[test]
    fn test_parse_daily_stats_missing_days_is_empty() {
        let table = parse_daily_stats("{}").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_photos() {
        let photos = parse_photos(
            r#"{"photos": [
                {"lon": 9.19, "lat": 45.46, "title": "Duomo", "file": "duomo.jpg"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].title.as_deref(), Some("Duomo"));
        assert_eq!(photos[0].caption, None);
        assert_eq!(photos[0].file, "duomo.jpg");
    }
}
