//! Table view rendering.
//!
//! Displays a sortable table of all devices with state, event ages, and
//! liveness.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::{ColorState, DeviceRow};

/// Column to sort by in the Table view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    /// Sort by device name alphabetically.
    #[default]
    Name,
    /// Sort by reported state.
    State,
    /// Sort by last color transition time.
    Changed,
    /// Sort by last upload time.
    Uploaded,
    /// Sort by last heartbeat time.
    Blinked,
}

impl SortColumn {
    /// Cycle to the next sort column.
    pub fn next(self) -> Self {
        match self {
            SortColumn::Name => SortColumn::State,
            SortColumn::State => SortColumn::Changed,
            SortColumn::Changed => SortColumn::Uploaded,
            SortColumn::Uploaded => SortColumn::Blinked,
            SortColumn::Blinked => SortColumn::Name,
        }
    }
}

/// Render the Table view showing all devices in a sortable table.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(ref data) = app.data else {
        return;
    };

    // visible_rows already applies the filter and this view's sort
    let rows_data = app.visible_rows(data);

    let header = Row::new(vec![
        Cell::from(format_header("Device", SortColumn::Name, app)),
        Cell::from(format_header("State", SortColumn::State, app)),
        Cell::from(format_header("Changed", SortColumn::Changed, app)),
        Cell::from(format_header("Uploaded", SortColumn::Uploaded, app)),
        Cell::from(format_header("Blinked", SortColumn::Blinked, app)),
        Cell::from("Live"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = rows_data
        .iter()
        .map(|(_, r)| {
            let live_cell = if r.offline {
                Cell::from("offline").style(
                    Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
                )
            } else {
                Cell::from("live").style(Style::default().fg(app.theme.healthy))
            };

            Row::new(vec![
                Cell::from(r.name.clone()).style(app.theme.name_style(r)),
                Cell::from(format!("● {}", r.state_label())).style(app.theme.indicator_style(r)),
                Cell::from(r.changed.text.clone()).style(app.theme.aged_style(r.changed.stale)),
                Cell::from(r.uploaded.text.clone()).style(app.theme.aged_style(r.uploaded.stale)),
                Cell::from(r.blinked.text.clone()).style(app.theme.aged_style(r.blinked.stale)),
                live_cell,
            ])
        })
        .collect();

    // Use Fill to distribute space evenly while respecting minimum widths
    let widths = [
        Constraint::Fill(2),    // Device
        Constraint::Min(20),    // State
        Constraint::Fill(1),    // Changed
        Constraint::Fill(1),    // Uploaded
        Constraint::Fill(1),    // Blinked
        Constraint::Min(8),     // Live
    ];

    let selected_visual_index = app.selected_index.min(rows_data.len().saturating_sub(1));

    let sort_indicator = match app.sort_column {
        SortColumn::Name => "name",
        SortColumn::State => "state",
        SortColumn::Changed => "changed",
        SortColumn::Uploaded => "uploaded",
        SortColumn::Blinked => "blinked",
    };
    let sort_dir = if app.sort_ascending { "↑" } else { "↓" };

    // Build title with filter info
    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    // Show scroll position if there are items
    let position_info = if !rows_data.is_empty() {
        format!(" [{}/{}]", selected_visual_index + 1, rows_data.len())
    } else {
        String::new()
    };

    let title = format!(
        " Devices ({}/{}) [s:sort {}{}]{}{} ",
        rows_data.len(),
        data.rows.len(),
        sort_indicator,
        sort_dir,
        filter_info,
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected_visual_index));

    frame.render_stateful_widget(table, area, &mut state);
}

fn format_header(name: &str, col: SortColumn, app: &App) -> Span<'static> {
    if app.sort_column == col {
        let arrow = if app.sort_ascending { "↑" } else { "↓" };
        Span::raw(format!("{}{}", name, arrow))
    } else {
        Span::raw(name.to_string())
    }
}

/// Sort rows by the given column and direction (used from App::visible_rows).
pub fn sort_rows_by(rows: &mut [(usize, &DeviceRow)], column: SortColumn, ascending: bool) {
    rows.sort_by(|a, b| {
        let primary = match column {
            SortColumn::Name => a.1.name.cmp(&b.1.name),
            SortColumn::State => state_rank(a.1).cmp(&state_rank(b.1)),
            SortColumn::Changed => a.1.changed.at.cmp(&b.1.changed.at),
            SortColumn::Uploaded => a.1.uploaded.at.cmp(&b.1.uploaded.at),
            SortColumn::Blinked => a.1.blinked.at.cmp(&b.1.blinked.at),
        };

        // Apply direction to primary comparison
        let primary = if ascending {
            primary
        } else {
            primary.reverse()
        };

        // Use secondary sort by name for stability when primary values are equal
        if primary == std::cmp::Ordering::Equal {
            a.1.name.cmp(&b.1.name)
        } else {
            primary
        }
    });
}

/// Ordering rank for the State column: known states in wire order, unknown
/// colors after them, offline devices last.
fn state_rank(row: &DeviceRow) -> u8 {
    if row.offline {
        return ColorState::ALL.len() as u8 + 1;
    }
    match &row.state {
        Ok(state) => ColorState::ALL.iter().position(|s| s == state).unwrap_or(0) as u8,
        Err(_) => ColorState::ALL.len() as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{BoardData, Thresholds};
    use crate::source::{ColorEvent, DeviceHealth, HealthSnapshot, Timestamp, UploadEvent};
    use chrono::{Duration, TimeZone, Utc};

    fn snapshot() -> HealthSnapshot {
        let now = Utc.with_ymd_and_hms(2016, 5, 1, 12, 0, 0).unwrap();
        let device = |color: &str, mins_ago: i64| DeviceHealth {
            last_color: ColorEvent {
                color: Some(color.to_string()),
                time: Some(Timestamp(now - Duration::minutes(mins_ago))),
            },
            last_upload: UploadEvent { time: None },
            last_blink: Some(Timestamp(now - Duration::seconds(10))),
        };

        let mut snap = HealthSnapshot::new();
        snap.insert("club-zebra".to_string(), device("green", 1));
        snap.insert("club-alpha".to_string(), device("red", 30));
        snap.insert("club-mid".to_string(), device("blue", 10));
        snap
    }

    fn board() -> BoardData {
        let now = Utc.with_ymd_and_hms(2016, 5, 1, 12, 0, 0).unwrap();
        BoardData::from_snapshot(&snapshot(), now, &Thresholds::default())
    }

    #[test]
    fn test_sort_by_name_ascending() {
        let data = board();
        let mut rows: Vec<(usize, &DeviceRow)> = data.rows.iter().enumerate().collect();
        sort_rows_by(&mut rows, SortColumn::Name, true);

        let names: Vec<&str> = rows.iter().map(|(_, r)| r.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zebra"]);
    }

    #[test]
    fn test_sort_by_changed_descending_is_newest_first() {
        let data = board();
        let mut rows: Vec<(usize, &DeviceRow)> = data.rows.iter().enumerate().collect();
        sort_rows_by(&mut rows, SortColumn::Changed, false);

        let names: Vec<&str> = rows.iter().map(|(_, r)| r.name.as_str()).collect();
        assert_eq!(names, vec!["zebra", "mid", "alpha"]);
    }

    #[test]
    fn test_sort_cycles_through_all_columns() {
        let mut col = SortColumn::default();
        for _ in 0..5 {
            col = col.next();
        }
        assert_eq!(col, SortColumn::default());
    }
}
