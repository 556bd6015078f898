//! Detail overlay rendering.
//!
//! Displays a modal overlay with detailed information about a selected device.

use chrono::SecondsFormat;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_duration;
use crate::data::AgedField;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;

/// Render the device detail as a modal overlay.
///
/// Shows the selected device's full id, reported state, and each event with
/// both its relative phrase and the absolute timestamp behind it.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(ref data) = app.data else {
        return;
    };

    // Get the actual device from the visual index
    let Some(raw_index) = app.selected_row_index() else {
        return;
    };
    let Some(row) = data.rows.get(raw_index) else {
        return;
    };

    // Width: 70% of screen, clamped to [MIN_OVERLAY_WIDTH, 80]
    let overlay_width = (area.width * 70 / 100).clamp(MIN_OVERLAY_WIDTH, 80);
    // Height: fits the fixed field list
    let overlay_height = MIN_OVERLAY_HEIGHT.min(area.height.saturating_sub(2));

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Min(10),   // Content
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    let state_span = if row.offline {
        Span::styled(
            "● OFFLINE",
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            format!("● {}", row.state_label()),
            app.theme.indicator_style(row).add_modifier(Modifier::BOLD),
        )
    };

    let state_note = match &row.state {
        Ok(state) => format!("  ({} {})", state.wire_name(), state.hex()),
        Err(e) => format!("  ({})", e),
    };

    let mut lines = vec![
        Line::from(vec![
            Span::raw(" Device:  "),
            Span::styled(row.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::raw(" Id:      "),
            Span::styled(row.id.clone(), Style::default().add_modifier(Modifier::DIM)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" State:   "),
            state_span,
            Span::styled(state_note, Style::default().add_modifier(Modifier::DIM)),
        ]),
        Line::from(""),
    ];

    lines.push(field_line(app, " Changed: ", &row.changed));
    lines.push(field_line(app, " Upload:  ", &row.uploaded));
    lines.push(field_line(app, " Blink:   ", &row.blinked));
    lines.push(Line::from(""));

    let text_window = app.thresholds.text_stale.to_std().unwrap_or_default();
    let blink_window = app.thresholds.blink_stale.to_std().unwrap_or_default();
    lines.push(Line::from(Span::styled(
        format!(
            " Stale after {} without events, offline after {} without a blink",
            format_duration(text_window),
            format_duration(blink_window),
        ),
        Style::default().add_modifier(Modifier::DIM),
    )));

    let block = Block::default()
        .title(format!(" {} ", row.name))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(Paragraph::new(lines).block(block), chunks[0]);

    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " Press Esc to close ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, chunks[1]);
}

/// One event field: the relative phrase plus the absolute timestamp.
fn field_line(app: &App, label: &'static str, field: &AgedField) -> Line<'static> {
    let absolute = match field.at {
        Some(t) => t.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => "-".to_string(),
    };

    Line::from(vec![
        Span::raw(label),
        Span::styled(
            format!("{:<18}", field.text),
            app.theme.aged_style(field.stale),
        ),
        Span::styled(absolute, Style::default().add_modifier(Modifier::DIM)),
    ])
}
