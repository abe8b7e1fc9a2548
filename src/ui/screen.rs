use ratatui::Frame;

use crate::app::{App, AppState};
use crate::ui::bucket_table::render_bucket_table;

/// A UI Screen boundary: responsible for rendering the current view
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Chart screen - renders the chart using the App widget
pub struct ChartScreen;

impl Screen for ChartScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

/// Bucket table screen - uses dedicated renderer
pub struct TableScreen;

impl Screen for TableScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_bucket_table(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Chart => Box::new(ChartScreen),
        AppState::Table => Box::new(TableScreen),
    }
}
