//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::{ColorState, DeviceRow};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
/// Device indicator colors come from [`ColorState::rgb`] and are the same
/// in both themes; the theme only controls the chrome around them.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for degraded rows (unknown colors, stale fields).
    pub warning: Color,
    /// Color for offline devices and fleet-level alarms.
    pub critical: Color,
    /// Color for an all-quiet fleet.
    pub healthy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Foreground style for a device state's indicator color.
    pub fn state_style(&self, state: ColorState) -> Style {
        let (r, g, b) = state.rgb();
        Style::default().fg(Color::Rgb(r, g, b))
    }

    /// Style for a row's state indicator dot.
    ///
    /// Unknown colors render in the warning color; offline devices are dimmed
    /// whatever their reported state.
    pub fn indicator_style(&self, row: &DeviceRow) -> Style {
        let base = match &row.state {
            Ok(state) => self.state_style(*state),
            Err(_) => Style::default().fg(self.warning),
        };
        if row.offline {
            base.add_modifier(Modifier::DIM)
        } else {
            base
        }
    }

    /// Style for a device name: offline devices are dimmed and struck out.
    pub fn name_style(&self, row: &DeviceRow) -> Style {
        if row.offline {
            Style::default().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        }
    }

    /// Style for a timestamp field, dimmed once the field has gone stale.
    pub fn aged_style(&self, stale: bool) -> Style {
        if stale {
            Style::default().add_modifier(Modifier::DIM)
        } else {
            Style::default()
        }
    }
}
