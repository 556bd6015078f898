// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # blinkwatch
//!
//! A terminal dashboard and library for watching a fleet of audio recorders
//! through their health endpoint.
//!
//! Each recorder reports a colored indicator (its current state), its last
//! upload, and a periodic heartbeat blink. This crate polls that health feed,
//! projects it into human-readable rows ("Recording", "3 minutes ago"), and
//! renders it in an interactive terminal UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Application                           │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (state) │    │(projection)   │(rendering)   │         │  │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘  │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐         ┌─────────────────────┐                │
//! │  │ source  │◀────────│ client (HTTP poll)  │                │
//! │  │ (input) │         └─────────────────────┘                │
//! │  └─────────┘◀── FileSource | HttpSource                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and user interaction logic
//! - **[`client`]**: Async HTTP client and background poll loop with cancellation
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) with file
//!   and HTTP implementations
//! - **[`data`]**: Snapshot projection - indicator colors to state labels,
//!   timestamps to "ago" phrases, staleness and offline detection
//! - **[`ui`]**: Terminal rendering using ratatui - grid, list, and table
//!   views with theme support
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a health endpoint
//! blinkwatch --url https://listenin.example/health
//!
//! # Watch a local JSON file with the same shape
//! blinkwatch --file health.json
//! ```
//!
//! ### As a library with a file source
//!
//! ```
//! use blinkwatch::{App, FileSource, Thresholds};
//!
//! let source = Box::new(FileSource::new("health.json"));
//! let app = App::new(source, Thresholds::default());
//! ```
//!
//! ### As a library with a polled endpoint
//!
//! ```no_run
//! use std::time::Duration;
//! use blinkwatch::{App, HealthClient, HttpSource, Thresholds};
//!
//! # tokio_test::block_on(async {
//! let client = HealthClient::new("http://localhost:3000/health", Duration::from_secs(10));
//! let source = HttpSource::start(client, Duration::from_secs(5));
//! let app = App::new(Box::new(source), Thresholds::default());
//! # });
//! ```

pub mod app;
pub mod client;
pub mod data;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use client::{HealthClient, HealthError, PollEvent, PollHandle};
pub use data::{BoardData, ColorState, DeviceRow, Thresholds};
pub use source::{
    ColorEvent, DataSource, DeviceHealth, FileSource, HealthSnapshot, HttpSource, Timestamp,
    UploadEvent,
};
