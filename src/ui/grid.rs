//! Grid view rendering.
//!
//! One bordered box per device, the wall-display layout the dashboard is
//! usually left running on. Cells page rather than scroll so the selected
//! device is always on screen.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::DeviceRow;

/// Width of one device cell including its border.
const CELL_WIDTH: u16 = 30;
/// Height of one device cell including its border.
const CELL_HEIGHT: u16 = 7;

/// Render the Grid view showing one box per device.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let rows = app.visible_rows(data);

    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let title = format!(" Devices ({}/{}){} ", rows.len(), data.rows.len(), filter_info);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if rows.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            " No devices match",
            Style::default().add_modifier(Modifier::DIM),
        )));
        frame.render_widget(empty, inner);
        return;
    }

    let cols = (inner.width / CELL_WIDTH).max(1) as usize;
    let grid_rows = (inner.height / CELL_HEIGHT).max(1) as usize;
    let capacity = cols * grid_rows;

    // Page to the selected device rather than scrolling line by line
    let selected = app.selected_index.min(rows.len() - 1);
    let offset = (selected / capacity) * capacity;

    for (slot, idx) in (offset..rows.len().min(offset + capacity)).enumerate() {
        let col = (slot % cols) as u16;
        let grid_row = (slot / cols) as u16;

        let cell = Rect::new(
            inner.x + col * CELL_WIDTH,
            inner.y + grid_row * CELL_HEIGHT,
            CELL_WIDTH.min(inner.width - col * CELL_WIDTH),
            CELL_HEIGHT.min(inner.height - grid_row * CELL_HEIGHT),
        );

        render_cell(frame, app, rows[idx].1, idx == selected, cell);
    }
}

/// Render a single device cell.
fn render_cell(frame: &mut Frame, app: &App, row: &DeviceRow, selected: bool, area: Rect) {
    let border_style = if selected {
        Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.border)
    };

    let block = Block::default()
        .title(Line::from(Span::styled(
            format!(" {} ", row.name),
            app.theme.name_style(row),
        )))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(border_style);

    let state_line = if row.offline {
        Line::from(vec![
            Span::styled(" ● ", app.theme.indicator_style(row)),
            Span::styled(
                "OFFLINE",
                Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled(" ● ", app.theme.indicator_style(row)),
            Span::styled(row.state_label(), app.theme.indicator_style(row)),
        ])
    };

    let lines = vec![
        state_line,
        Line::from(vec![
            Span::raw(" changed "),
            Span::styled(row.changed.text.clone(), app.theme.aged_style(row.changed.stale)),
        ]),
        Line::from(vec![
            Span::raw(" upload  "),
            Span::styled(row.uploaded.text.clone(), app.theme.aged_style(row.uploaded.stale)),
        ]),
        Line::from(vec![
            Span::raw(" blink   "),
            Span::styled(row.blinked.text.clone(), app.theme.aged_style(row.blinked.stale)),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
