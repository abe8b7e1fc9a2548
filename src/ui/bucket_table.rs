use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::aggregate::{AggregateBucket, Metric};
use crate::app::App;
use crate::ui::metric_name;

/// Format a bucket mean for display
pub fn format_mean(mean: f64, metric: Metric) -> String {
    match metric {
        Metric::Accuracy => format!("{mean:.4}"),
        Metric::Level => format!("{mean:.2}"),
    }
}

/// Pure presenter for a single bucket row
pub fn present_row(bucket: &AggregateBucket, metric: Metric) -> Row<'static> {
    let mean_style = match metric {
        Metric::Accuracy if bucket.mean >= 0.95 => Style::default().fg(Color::Green),
        Metric::Accuracy if bucket.mean >= 0.9 => Style::default().fg(Color::Yellow),
        Metric::Accuracy => Style::default().fg(Color::Red),
        Metric::Level => Style::default(),
    };

    Row::new(vec![
        Cell::from(bucket.key.to_string()).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(bucket.player.clone().unwrap_or_else(|| "all".to_string())),
        Cell::from(format_mean(bucket.mean, metric)).style(mean_style),
        Cell::from(bucket.count.to_string()),
    ])
}

/// Render the bucket table screen
pub fn render_bucket_table(app: &mut App, f: &mut Frame) {
    let area = f.area();
    let metric = app.chart.metric();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Bucket table
            Constraint::Length(2), // Instructions
        ])
        .split(area);

    let title = Paragraph::new(app.title.clone())
        .block(Block::default().borders(Borders::ALL).title("Averages"))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let buckets = &app.output.buckets;
    if buckets.is_empty() {
        let no_data = Paragraph::new("No sessions left after filtering.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(no_data, chunks[1]);
    } else {
        let table_height = chunks[1].height.saturating_sub(3) as usize; // borders + header
        let max_scroll = buckets.len().saturating_sub(table_height);
        if app.scroll_offset > max_scroll {
            app.scroll_offset = max_scroll;
        }

        let header = Row::new(vec![
            Cell::from("Group"),
            Cell::from("Player"),
            Cell::from(format!("Mean {}", metric_name(metric))),
            Cell::from("Sessions"),
        ])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let visible_rows: Vec<Row> = buckets
            .iter()
            .skip(app.scroll_offset)
            .take(table_height)
            .map(|bucket| present_row(bucket, metric))
            .collect();

        let widths = [
            Constraint::Length(12), // Group
            Constraint::Min(10),    // Player
            Constraint::Length(24), // Mean
            Constraint::Length(10), // Sessions
        ];

        let table = Table::new(visible_rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Buckets"))
            .column_spacing(2);

        f.render_widget(table, chunks[1]);
    }

    let instructions =
        Paragraph::new("(↑/↓) scroll  (PgUp/PgDn) page  (Home) top  (tab) chart  (esc) quit")
            .alignment(Alignment::Center)
            .wrap(ratatui::widgets::Wrap { trim: true });
    f.render_widget(instructions, chunks[2]);
}
