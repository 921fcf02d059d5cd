//! Pipeline orchestration: one immutable snapshot per run.
//!
//! [`TrackPipeline`] is the explicit context threaded through every refresh —
//! it owns the tunable thresholds and the current statistics table, so no
//! state hides in process-wide globals. Each [`TrackPipeline::run`] recomputes
//! the whole snapshot from scratch over the fix list it is handed.

use crate::classifier::{classify, LiveState};
use crate::error::{OptionExt, Result};
use crate::segmenter::{segment_days, DaySegment};
use crate::summary::{attach_summaries, compute_totals, StatsTable, TripTotals};
use crate::{Bounds, GeoFix, GpsPoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tunable thresholds for classification and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Width of the trailing window, in minutes, used to judge recent
    /// movement. A newest fix older than this counts as stopped.
    /// Default: 15
    pub recent_window_mins: i64,

    /// Minimum cumulative distance in meters within the window to count as
    /// riding. Default: 50.0
    pub min_moving_distance_m: f64,

    /// Seconds between feed refreshes in the periodic service.
    /// Default: 60
    pub refresh_interval_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            recent_window_mins: 15,
            min_moving_distance_m: 50.0,
            refresh_interval_secs: 60,
        }
    }
}

/// The pipeline's sole output: everything the rendering collaborator needs
/// for one refresh. Treated as immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSnapshot {
    /// Ordered polyline of every fix coordinate.
    pub polyline: Vec<GpsPoint>,
    /// The most recent fix.
    pub newest: GeoFix,
    /// Classified current movement state.
    pub live_state: LiveState,
    /// Per-day markers in chronological order, summaries attached where
    /// statistics exist.
    pub day_segments: Vec<DaySegment>,
    /// Bounding box of the whole track, for viewport framing.
    pub bounds: Bounds,
    /// Trip-wide totals from the statistics table.
    pub totals: TripTotals,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutput {
    /// A fresh snapshot, ready to render.
    Snapshot(TrackSnapshot),
    /// The feed answered but carried no fixes yet. Distinct from an error:
    /// the dashboard shows a "no positions yet" notice and keeps waiting.
    NoData,
}

impl PipelineOutput {
    /// The snapshot, when this run produced one.
    pub fn snapshot(&self) -> Option<&TrackSnapshot> {
        match self {
            PipelineOutput::Snapshot(snapshot) => Some(snapshot),
            PipelineOutput::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, PipelineOutput::NoData)
    }
}

/// Orchestrates segmentation, classification, aggregation and bounds into one
/// snapshot per invocation.
///
/// The statistics table is the only state the pipeline carries between runs,
/// and it is only ever replaced wholesale via [`TrackPipeline::set_daily_stats`].
#[derive(Debug, Clone, Default)]
pub struct TrackPipeline {
    config: PipelineConfig,
    stats: StatsTable,
}

impl TrackPipeline {
    /// Create a pipeline with default thresholds and no statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline with custom thresholds.
    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            config,
            stats: StatsTable::default(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Current statistics table.
    pub fn stats(&self) -> &StatsTable {
        &self.stats
    }

    /// Replace the statistics table wholesale. A single assignment: a run can
    /// see the old table or the new one, never a half-updated mix.
    pub fn set_daily_stats(&mut self, stats: StatsTable) {
        self.stats = stats;
    }

    /// Run the full pipeline over an ordered fix list.
    ///
    /// An empty list short-circuits to [`PipelineOutput::NoData`]. Otherwise
    /// the polyline, live state, day segments, totals and bounds are all
    /// recomputed from scratch and assembled into a snapshot.
    pub fn run(&self, fixes: &[GeoFix], now: DateTime<Utc>) -> Result<PipelineOutput> {
        if fixes.is_empty() {
            return Ok(PipelineOutput::NoData);
        }

        let polyline: Vec<GpsPoint> = fixes.iter().map(|f| f.point).collect();
        let newest = fixes.last().cloned().ok_or_internal("fix list emptied")?;

        let live_state = classify(fixes, now, &self.config);

        let mut day_segments = segment_days(fixes);
        attach_summaries(&mut day_segments, &self.stats);
        let totals = compute_totals(&self.stats);

        let bounds = Bounds::from_points(&polyline).ok_or_empty_track()?;

        Ok(PipelineOutput::Snapshot(TrackSnapshot {
            polyline,
            newest,
            live_state,
            day_segments,
            bounds,
            totals,
        }))
    }
}
