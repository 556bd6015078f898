//! Application state and navigation logic.

use std::time::Instant;

use anyhow::Result;
use chrono::Utc;

use crate::data::{BoardData, DeviceRow, Thresholds};
use crate::source::{DataSource, HealthSnapshot};
use crate::ui::table::SortColumn;
use crate::ui::Theme;

/// The current view/tab in the TUI.
///
/// All three views render the same projected rows; they differ only in
/// layout. Device detail is shown as an overlay (`App::show_detail_overlay`)
/// rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// One bordered box per device, the classic wall-display layout.
    Grid,
    /// One condensed line per device.
    List,
    /// Sortable table with one column per field.
    Table,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Grid => View::List,
            View::List => View::Table,
            View::Table => View::Grid,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Grid => View::Table,
            View::List => View::Grid,
            View::Table => View::List,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Grid => "Grid",
            View::List => "List",
            View::Table => "Table",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source and held snapshot
    source: Box<dyn DataSource>,
    snapshot: Option<HealthSnapshot>,
    snapshot_arrived: Option<Instant>,
    pub data: Option<BoardData>,
    pub load_error: Option<String>,
    pub thresholds: Thresholds,

    // Navigation state (visual index into the filtered/sorted row list)
    pub selected_index: usize,

    // Sorting (Table view)
    pub sort_column: SortColumn,
    pub sort_ascending: bool,

    // Search/filter
    pub filter_text: String,
    pub filter_active: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App with the given data source and thresholds.
    pub fn new(source: Box<dyn DataSource>, thresholds: Thresholds) -> Self {
        Self {
            running: true,
            current_view: View::Grid,
            show_help: false,
            show_detail_overlay: false,
            source,
            snapshot: None,
            snapshot_arrived: None,
            data: None,
            load_error: None,
            thresholds,
            selected_index: 0,
            sort_column: SortColumn::default(),
            sort_ascending: true,
            filter_text: String::new(),
            filter_active: false,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// The raw snapshot currently held, if any.
    pub fn snapshot(&self) -> Option<&HealthSnapshot> {
        self.snapshot.as_ref()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the data source and refresh the projection.
    ///
    /// A fresh snapshot replaces the held one wholesale; a failed tick sets
    /// `load_error` and leaves the held snapshot untouched. The projection is
    /// recomputed either way so the "ago" phrases and staleness flags keep
    /// advancing while the endpoint is down.
    ///
    /// Returns Ok(true) if a new snapshot arrived.
    pub fn reload_data(&mut self) -> Result<bool> {
        let fresh = self.source.poll();
        let got_new = fresh.is_some();

        if let Some(snapshot) = fresh {
            self.snapshot = Some(snapshot);
            self.snapshot_arrived = Some(Instant::now());
        }
        self.load_error = self.source.error().map(String::from);

        if let Some(ref snapshot) = self.snapshot {
            let mut data = BoardData::from_snapshot(snapshot, Utc::now(), &self.thresholds);
            if let Some(arrived) = self.snapshot_arrived {
                data.last_updated = arrived;
            }
            if self.selected_index >= data.rows.len() {
                self.selected_index = data.rows.len().saturating_sub(1);
            }
            self.data = Some(data);
        }

        Ok(got_new)
    }

    /// Switch to the next view (cycles Grid → List → Table).
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// The filtered (and, in Table view, sorted) rows with their raw indices.
    ///
    /// All views render from this list, so selection and mouse hits agree
    /// across layouts.
    pub fn visible_rows<'a>(&self, data: &'a BoardData) -> Vec<(usize, &'a DeviceRow)> {
        let mut rows: Vec<(usize, &DeviceRow)> = data
            .rows
            .iter()
            .enumerate()
            .filter(|(_, r)| self.matches_filter(r))
            .collect();

        if self.current_view == View::Table {
            crate::ui::table::sort_rows_by(&mut rows, self.sort_column, self.sort_ascending);
        }
        rows
    }

    fn visible_count(&self) -> usize {
        self.data.as_ref().map_or(0, |d| self.visible_rows(d).len())
    }

    /// Get the raw row index for the currently selected visual row.
    pub fn selected_row_index(&self) -> Option<usize> {
        let data = self.data.as_ref()?;
        let rows = self.visible_rows(data);
        rows.get(self.selected_index).map(|(idx, _)| *idx)
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.visible_count().saturating_sub(1);
        self.selected_index = (self.selected_index + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_index = self.selected_index.saturating_sub(n);
    }

    /// Jump to the first item.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Jump to the last item.
    pub fn select_last(&mut self) {
        self.selected_index = self.visible_count().saturating_sub(1);
    }

    /// Open the detail overlay for the currently selected device.
    pub fn enter_detail(&mut self) {
        if self.selected_row_index().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close overlay first, otherwise return to the Grid.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            return;
        }
        if self.current_view != View::Grid {
            self.current_view = View::Grid;
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Cycle to the next sort column (Table view).
    pub fn cycle_sort(&mut self) {
        if self.current_view == View::Table {
            self.sort_column = self.sort_column.next();
        }
    }

    /// Toggle sort direction between ascending and descending.
    pub fn toggle_sort_direction(&mut self) {
        if self.current_view == View::Table {
            self.sort_ascending = !self.sort_ascending;
        }
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Check if a device row matches the current filter.
    pub fn matches_filter(&self, row: &DeviceRow) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        let search = self.filter_text.to_lowercase();
        row.name.to_lowercase().contains(&search) || row.id.to_lowercase().contains(&search)
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current dashboard state to a file.
    pub fn export_state(&self, path: &std::path::Path) -> Result<()> {
        let Some(ref data) = self.data else {
            anyhow::bail!("No data to export");
        };

        let report = export_report(data, self.source.description());
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        Ok(())
    }
}

/// Build a JSON report of the current dashboard state.
pub fn export_report(data: &BoardData, source: &str) -> serde_json::Value {
    let devices: Vec<serde_json::Value> = data
        .rows
        .iter()
        .map(|r| {
            serde_json::json!({
                "id": r.id,
                "name": r.name,
                "state": match &r.state {
                    Ok(s) => s.wire_name(),
                    Err(_) => "unknown",
                },
                "label": r.state_label(),
                "changed": r.changed.text,
                "uploaded": r.uploaded.text,
                "blinked": r.blinked.text,
                "offline": r.offline,
            })
        })
        .collect();

    serde_json::json!({
        "source": source,
        "summary": {
            "total_devices": data.rows.len(),
            "offline": data.offline(),
            "unknown": data.unknown(),
        },
        "devices": devices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ColorEvent, DeviceHealth, Timestamp, UploadEvent};
    use chrono::{Duration as ChronoDuration, Utc};
    use std::collections::VecDeque;

    /// A source that replays a scripted sequence of poll results.
    #[derive(Debug)]
    struct ScriptedSource {
        polls: VecDeque<Option<HealthSnapshot>>,
        error: Option<String>,
    }

    impl ScriptedSource {
        fn new(polls: Vec<Option<HealthSnapshot>>) -> Self {
            Self {
                polls: polls.into(),
                error: None,
            }
        }
    }

    impl DataSource for ScriptedSource {
        fn poll(&mut self) -> Option<HealthSnapshot> {
            self.polls.pop_front().flatten()
        }

        fn description(&self) -> &str {
            "scripted"
        }

        fn error(&self) -> Option<&str> {
            self.error.as_deref()
        }
    }

    fn device(color: &str) -> DeviceHealth {
        let now = Utc::now();
        DeviceHealth {
            last_color: ColorEvent {
                color: Some(color.to_string()),
                time: Some(Timestamp(now - ChronoDuration::minutes(2))),
            },
            last_upload: UploadEvent {
                time: Some(Timestamp(now - ChronoDuration::minutes(10))),
            },
            last_blink: Some(Timestamp(now - ChronoDuration::seconds(30))),
        }
    }

    fn snapshot_of(entries: &[(&str, &str)]) -> HealthSnapshot {
        entries
            .iter()
            .map(|(id, color)| (id.to_string(), device(color)))
            .collect()
    }

    #[test]
    fn test_failed_tick_keeps_held_snapshot() {
        let first = snapshot_of(&[("club-radio", "green")]);
        let source = ScriptedSource {
            polls: vec![Some(first.clone()), None].into(),
            error: Some("server returned HTTP 500".to_string()),
        };

        let mut app = App::new(Box::new(source), Thresholds::default());
        app.reload_data().unwrap();
        assert_eq!(app.snapshot(), Some(&first));

        // Failed tick: error surfaces, snapshot is untouched
        app.reload_data().unwrap();
        assert_eq!(app.snapshot(), Some(&first));
        assert!(app.load_error.as_deref().unwrap().contains("500"));
        assert_eq!(app.data.as_ref().unwrap().rows.len(), 1);
    }

    #[test]
    fn test_second_snapshot_fully_replaces_first() {
        let first = snapshot_of(&[("club-radio", "green"), ("club-pasaz", "red")]);
        let second = snapshot_of(&[("club-radio", "blue")]);
        let source = ScriptedSource::new(vec![Some(first), Some(second.clone())]);

        let mut app = App::new(Box::new(source), Thresholds::default());
        app.reload_data().unwrap();
        assert_eq!(app.data.as_ref().unwrap().rows.len(), 2);

        app.reload_data().unwrap();
        // Wholesale replacement: the dropped device is gone, nothing merged
        assert_eq!(app.snapshot(), Some(&second));
        let data = app.data.as_ref().unwrap();
        assert_eq!(data.rows.len(), 1);
        assert_eq!(data.rows[0].id, "club-radio");
        assert_eq!(data.rows[0].state_label(), "Uploading");
    }

    #[test]
    fn test_selection_clamps_when_fleet_shrinks() {
        let first = snapshot_of(&[("a-1", "green"), ("b-2", "green"), ("c-3", "green")]);
        let second = snapshot_of(&[("a-1", "green")]);
        let source = ScriptedSource::new(vec![Some(first), Some(second)]);

        let mut app = App::new(Box::new(source), Thresholds::default());
        app.reload_data().unwrap();
        app.select_last();
        assert_eq!(app.selected_index, 2);

        app.reload_data().unwrap();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_filter_matches_name_and_id() {
        let snapshot = snapshot_of(&[("club-radio", "green"), ("club-pasaz", "red")]);
        let source = ScriptedSource::new(vec![Some(snapshot)]);
        let mut app = App::new(Box::new(source), Thresholds::default());
        app.reload_data().unwrap();

        app.filter_text = "radio".to_string();
        let data = app.data.as_ref().unwrap();
        let visible = app.visible_rows(data);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].1.name, "radio");
    }

    #[test]
    fn test_export_report_shape() {
        let snapshot = snapshot_of(&[("club-radio", "green")]);
        let source = ScriptedSource::new(vec![Some(snapshot)]);
        let mut app = App::new(Box::new(source), Thresholds::default());
        app.reload_data().unwrap();

        let report = export_report(app.data.as_ref().unwrap(), "scripted");
        assert_eq!(report["summary"]["total_devices"], 1);
        assert_eq!(report["devices"][0]["name"], "radio");
        assert_eq!(report["devices"][0]["label"], "Sleeping");
    }
}
