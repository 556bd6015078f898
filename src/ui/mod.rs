//! Terminal rendering using ratatui.
//!
//! Each view module renders one tab from the shared [`DeviceRow`] projection;
//! [`common`] holds the chrome (header, tabs, status bar, help) and
//! [`detail`] the modal device overlay.
//!
//! ## Submodules
//!
//! - [`common`]: Header bar, tab bar, status bar, and help overlay
//! - [`grid`]: Box-per-device wall-display view
//! - [`list`]: Condensed line-per-device view
//! - [`table`]: Sortable table view
//! - [`detail`]: Modal overlay with a single device's full record
//! - [`theme`]: Light/dark themes and state/staleness styling
//!
//! [`DeviceRow`]: crate::data::DeviceRow

pub mod common;
pub mod detail;
pub mod grid;
pub mod list;
pub mod table;
pub mod theme;

pub use theme::Theme;
