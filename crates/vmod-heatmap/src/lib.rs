//! Attention heatmap accumulation and point-of-interest extraction.
//!
//! This crate holds the only original numeric work in the moderation
//! pipeline: per-frame energy grids are accumulated into a single heatmap,
//! which is then segmented into heat zones, mined for hotspots, and used to
//! fabricate a simulated gaze track. Every function here is pure over the
//! accumulated grid and integer configuration — no state survives a call.
//!
//! Zone and hotspot counts are fixed by configuration rather than driven by
//! the data, so low-signal video still produces (degenerate, low-intensity)
//! entries.

pub mod cluster;
pub mod gaze;
pub mod heatmap;
pub mod hotspots;
pub mod zones;

pub use cluster::kmeans;
pub use gaze::{simulate_gaze, GazeConfig};
pub use heatmap::{Heatmap, HeatmapAccumulator, NORMALIZED_MAX};
pub use hotspots::extract_hotspots;
pub use zones::{extract_zones, otsu_threshold, ZoneConfig};

use thiserror::Error;

/// Result type for heatmap operations.
pub type HeatmapResult<T> = Result<T, HeatmapError>;

/// Errors from heatmap construction.
#[derive(Debug, Error)]
pub enum HeatmapError {
    #[error("Frame grid {got:?} does not match heatmap dimensions {expected:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("Heatmap dimensions must be non-zero")]
    EmptyGrid,

    #[error("Negative intensity {0} in frame energy grid")]
    NegativeIntensity(f32),
}
