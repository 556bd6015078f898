//! Data models and processing for health snapshots.
//!
//! This module handles the transformation of raw health snapshots into
//! structured, staleness-annotated rows suitable for display.
//!
//! ## Submodules
//!
//! - [`board`]: Core projection ([`BoardData`], [`DeviceRow`], [`Thresholds`])
//! - [`color`]: Indicator color states and display mappings
//! - [`duration`]: Parsing and formatting of duration flags (e.g. "30s", "5m")
//! - [`relative`]: Relative "ago" phrases and text-aging checks
//!
//! ## Data Flow
//!
//! ```text
//! HealthSnapshot (raw JSON)
//!        │
//!        ▼
//! BoardData::from_snapshot(now, thresholds)
//!        │
//!        └──▶ DeviceRow (state + aged fields + offline flag)
//! ```

pub mod board;
pub mod color;
pub mod duration;
pub mod relative;

pub use board::{display_name, AgedField, BoardData, DeviceRow, Thresholds};
pub use color::{ColorState, UnknownColorError};
