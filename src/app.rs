use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::aggregate::GroupBy;
use crate::filter::Recency;
use crate::pipeline::{ChartKind, PipelineConfig, PipelineOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Chart,
    Table,
}

/// Viewer state for one rendered chart
#[derive(Debug)]
pub struct App {
    pub chart: ChartKind,
    pub group_by: GroupBy,
    pub title: String,
    pub output: PipelineOutput,
    pub state: AppState,
    pub show_scatter: bool,
    pub show_excluded: bool,
    pub scroll_offset: usize,
}

/// Chart title with the time window it covers
pub fn chart_title(chart: ChartKind, recency: Option<Recency>) -> String {
    let window = match recency {
        None => "All Data".to_string(),
        Some(Recency { months: 1, .. }) => "Last Month".to_string(),
        Some(Recency { months, .. }) => format!("Last {months} Months"),
    };
    format!("{} ({window})", chart.title())
}

impl App {
    pub fn new(chart: ChartKind, config: &PipelineConfig, output: PipelineOutput) -> Self {
        Self {
            chart,
            group_by: config.group_by,
            title: chart_title(chart, config.recency),
            output,
            state: AppState::Chart,
            show_scatter: true,
            show_excluded: true,
            scroll_offset: 0,
        }
    }

    /// Apply a key press. Returns false when the viewer should close.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return false;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return false,
            KeyCode::Tab => {
                self.state = match self.state {
                    AppState::Chart => AppState::Table,
                    AppState::Table => AppState::Chart,
                };
            }
            _ => {}
        }

        match self.state {
            AppState::Chart => match key.code {
                KeyCode::Char('s') => self.show_scatter = !self.show_scatter,
                KeyCode::Char('e') => self.show_excluded = !self.show_excluded,
                _ => {}
            },
            AppState::Table => match key.code {
                KeyCode::Up => self.scroll_offset = self.scroll_offset.saturating_sub(1),
                // clamped against the table height when rendering
                KeyCode::Down => self.scroll_offset += 1,
                KeyCode::PageUp => self.scroll_offset = self.scroll_offset.saturating_sub(10),
                KeyCode::PageDown => self.scroll_offset += 10,
                KeyCode::Home => self.scroll_offset = 0,
                _ => {}
            },
        }

        true
    }
}
