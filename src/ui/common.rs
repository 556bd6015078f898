//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::ColorState;

/// Render the header bar with a fleet-wide overview.
///
/// Displays: overall status indicator, per-state device counts, offline count.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref data) = app.data else {
        let line = Line::from(vec![
            Span::styled(
                " BLINKWATCH ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let total = data.rows.len();
    let offline = data.offline();
    let unknown = data.unknown();

    // Overall indicator: red if anything is offline, yellow if anything is
    // unknown, green otherwise
    let status_style = if offline > 0 {
        Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD)
    } else if unknown > 0 {
        Style::default().fg(app.theme.warning)
    } else {
        Style::default().fg(app.theme.healthy)
    };

    let mut spans = vec![
        Span::styled(" ● ", status_style),
        Span::styled("BLINKWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
    ];

    // One counter per known state, in its own indicator color
    for state in ColorState::ALL {
        let count = data.in_state(state);
        let style = if count > 0 {
            app.theme.state_style(state)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        spans.push(Span::styled(format!("{}", count), style));
        spans.push(Span::raw(format!(" {} ", state.label().to_lowercase())));
    }

    spans.push(Span::raw("│ "));
    if unknown > 0 {
        spans.push(Span::styled(
            format!("{}", unknown),
            Style::default().fg(app.theme.warning),
        ));
        spans.push(Span::raw(" unknown │ "));
    }
    if offline > 0 {
        spans.push(Span::styled(
            format!("{}", offline),
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" offline │ "));
    }
    spans.push(Span::styled(
        format!("{}", total),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::raw(" devices"));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Grid "),
        Line::from(" 2:List "),
        Line::from(" 3:Table "),
    ];

    let selected = match app.current_view {
        View::Grid => 0,
        View::List => 1,
        View::Table => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: data source, time since last update, available controls.
/// Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref data) = app.data {
        let elapsed = data.last_updated.elapsed();

        // Context-sensitive controls
        let controls = if app.filter_active {
            "Type to search | Enter:apply Esc:cancel"
        } else {
            match app.current_view {
                View::Grid => "1/2/3:view ↑↓:select Enter:detail ?:help q:quit",
                View::List => "/:search Tab:switch Enter:detail ?:help q:quit",
                View::Table => "/:search s:sort S:reverse Enter:detail ?:help q:quit",
            }
        };

        // A held snapshot plus a live error means the endpoint went away
        // after a good poll; keep showing the stale data but flag it.
        let error_note = match app.load_error {
            Some(ref err) => format!(" | STALE: {}", err),
            None => String::new(),
        };

        format!(
            " {} | Updated {:.1}s ago{} | {}",
            app.source_description(),
            elapsed.as_secs_f64(),
            error_note,
            controls,
        )
    } else if let Some(ref err) = app.load_error {
        format!(" Error: {} | q:quit r:retry", err)
    } else {
        format!(" {} | Loading... | q:quit", app.source_description())
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate devices"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Device detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Filter & Sort",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  /         Start filter/search"),
        Line::from("  c         Clear filter"),
        Line::from("  s         Cycle sort column (Table)"),
        Line::from("  S         Toggle sort direction (Table)"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Reload data"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 24u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
