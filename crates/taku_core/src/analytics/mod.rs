//! Derived analytics over the workspace mirror.
//!
//! # Responsibility
//! - Compute heatmap, streak and progress views from raw tasks and time
//!   entries.
//!
//! # Invariants
//! - Every function is pure: results are recomputed per call and never
//!   persisted.
//! - Day bucketing uses UTC calendar days; callers pass `today`/`now`
//!   explicitly so results are deterministic.

pub mod heatmap;
pub mod progress;
