//! List view rendering.
//!
//! One condensed line per device, for fleets too large for the grid.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::App;
use crate::data::DeviceRow;

/// Render the List view showing one line per device.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    let rows = app.visible_rows(data);

    let items: Vec<ListItem> = rows.iter().map(|(_, row)| ListItem::new(device_line(app, row))).collect();

    let selected = app.selected_index.min(rows.len().saturating_sub(1));

    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let position_info = if !rows.is_empty() {
        format!(" [{}/{}]", selected + 1, rows.len())
    } else {
        String::new()
    };

    let title = format!(
        " Devices ({}/{}){}{} ",
        rows.len(),
        data.rows.len(),
        filter_info,
        position_info
    );

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select((!rows.is_empty()).then_some(selected));

    frame.render_stateful_widget(list, area, &mut state);
}

fn device_line(app: &App, row: &DeviceRow) -> Line<'static> {
    let label = if row.offline { "OFFLINE" } else { row.state_label() };
    let label_style = if row.offline {
        Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD)
    } else {
        app.theme.indicator_style(row)
    };

    Line::from(vec![
        Span::styled("● ", app.theme.indicator_style(row)),
        Span::styled(format!("{:<16}", row.name), app.theme.name_style(row)),
        Span::styled(format!("{:<18}", label), label_style),
        Span::raw("changed "),
        Span::styled(
            format!("{:<18}", row.changed.text),
            app.theme.aged_style(row.changed.stale),
        ),
        Span::raw("blink "),
        Span::styled(row.blinked.text.clone(), app.theme.aged_style(row.blinked.stale)),
    ])
}
