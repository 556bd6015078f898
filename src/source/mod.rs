//! Data source abstraction for receiving health snapshots.
//!
//! This module provides a trait-based abstraction for receiving fleet health
//! data from various backends (the live HTTP endpoint, or a snapshot file on
//! disk for offline inspection).

mod file;
mod http;
mod snapshot;

pub use file::FileSource;
pub use http::HttpSource;
pub use snapshot::{ColorEvent, DeviceHealth, HealthSnapshot, Timestamp, UploadEvent};

use std::fmt::Debug;

/// Trait for receiving health snapshots from various sources.
///
/// Implementations provide health snapshots from different backends - HTTP
/// polling or file reads.
///
/// # Example
///
/// ```
/// use blinkwatch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("health.json");
/// if let Some(snapshot) = source.poll() {
///     println!("got {} devices", snapshot.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// This method must be non-blocking; the TUI calls it from its draw loop.
    fn poll(&mut self) -> Option<HealthSnapshot>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Check if the source has encountered an error.
    ///
    /// Returns the error message, if any, from the most recent poll cycle.
    fn error(&self) -> Option<&str>;
}
