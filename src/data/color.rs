//! Indicator color states and their display mappings.
//!
//! The wire format carries the indicator as a lowercase color name. That name
//! maps 1:1 to a state of the device's recording loop; anything outside the
//! known set is a typed error rather than a silently-propagating default.

use thiserror::Error;

/// A wire color that is not in the indicator table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown indicator color: {0}")]
pub struct UnknownColorError(pub String);

/// The reported state of a device, keyed by its indicator color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ColorState {
    /// Idle between recordings.
    Green,
    /// Actively recording.
    Red,
    /// Uploading a recording.
    Blue,
    /// Powered but not receiving a usable signal.
    Purple,
    /// Fault reported by the device.
    Orange,
}

impl ColorState {
    /// All states, in display order.
    pub const ALL: [ColorState; 5] = [
        ColorState::Green,
        ColorState::Red,
        ColorState::Blue,
        ColorState::Purple,
        ColorState::Orange,
    ];

    /// Parse a wire color name.
    pub fn from_wire(color: &str) -> Result<Self, UnknownColorError> {
        match color {
            "green" => Ok(ColorState::Green),
            "red" => Ok(ColorState::Red),
            "blue" => Ok(ColorState::Blue),
            "purple" => Ok(ColorState::Purple),
            "orange" => Ok(ColorState::Orange),
            other => Err(UnknownColorError(other.to_string())),
        }
    }

    /// The wire name for this state.
    pub fn wire_name(&self) -> &'static str {
        match self {
            ColorState::Green => "green",
            ColorState::Red => "red",
            ColorState::Blue => "blue",
            ColorState::Purple => "purple",
            ColorState::Orange => "orange",
        }
    }

    /// Human label for this state.
    pub fn label(&self) -> &'static str {
        match self {
            ColorState::Green => "Sleeping",
            ColorState::Red => "Recording",
            ColorState::Blue => "Uploading",
            ColorState::Purple => "Waiting for signal",
            ColorState::Orange => "Problem",
        }
    }

    /// Display color as a CSS hex string.
    pub fn hex(&self) -> &'static str {
        match self {
            ColorState::Green => "#2ecc71",
            ColorState::Red => "#e74c3c",
            ColorState::Blue => "#3498db",
            ColorState::Purple => "#9b59b6",
            ColorState::Orange => "#f39c12",
        }
    }

    /// Display color as RGB components, for terminal rendering.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            ColorState::Green => (0x2e, 0xcc, 0x71),
            ColorState::Red => (0xe7, 0x4c, 0x3c),
            ColorState::Blue => (0x34, 0x98, 0xdb),
            ColorState::Purple => (0x9b, 0x59, 0xb6),
            ColorState::Orange => (0xf3, 0x9c, 0x12),
        }
    }
}
