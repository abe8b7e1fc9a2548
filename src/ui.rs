pub mod bucket_table;
pub mod charting;
pub mod screen;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget},
    Frame,
};

use crate::aggregate::{GroupBy, Metric};
use crate::app::App;
use crate::time_series::{scatter_points, trend_points, ChartPoint};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;
const AXIS_LABELS: usize = 5;

const PLAYER_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::LightRed,
];

pub fn player_color(idx: usize) -> Color {
    PLAYER_COLORS[idx % PLAYER_COLORS.len()]
}

pub fn metric_name(metric: Metric) -> &'static str {
    match metric {
        Metric::Accuracy => "accuracy",
        Metric::Level => "difficulty level",
    }
}

fn x_axis_name(group_by: GroupBy) -> &'static str {
    match group_by {
        GroupBy::Level => "difficulty level",
        GroupBy::TimeBucket { .. } => "date",
    }
}

fn to_tuples(points: &[ChartPoint]) -> Vec<(f64, f64)> {
    points.iter().map(|p| (*p).into()).collect()
}

/// Draw the current screen
pub fn ui(app: &mut App, f: &mut Frame) {
    screen::current_screen(&app.state).render(app, f);
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let metric = self.chart.metric();
        let output = &self.output;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Min(1),    // chart
                Constraint::Length(1), // counts
                Constraint::Length(1), // legend
            ])
            .split(area);

        Paragraph::new(Span::styled(self.title.clone(), bold_style))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let players: Vec<&str> = output
            .kept
            .iter()
            .chain(output.excluded.iter())
            .map(|r| r.player.as_str())
            .unique()
            .collect();
        let color_of = |player: Option<&str>| {
            player
                .and_then(|p| players.iter().position(|q| *q == p))
                .map(player_color)
                .unwrap_or(Color::Gray)
        };

        let scatter: Vec<(String, Color, Vec<(f64, f64)>)> = if self.show_scatter {
            players
                .iter()
                .map(|player| {
                    let points = scatter_points(
                        output.kept.iter().filter(|r| r.player == *player),
                        self.group_by,
                        |r| metric.value(r),
                    );
                    (
                        format!("{player} - individual"),
                        color_of(Some(*player)),
                        to_tuples(&points),
                    )
                })
                .collect()
        } else {
            Vec::new()
        };

        let excluded = if self.show_excluded {
            to_tuples(&scatter_points(&output.excluded, self.group_by, |r| {
                metric.value(r)
            }))
        } else {
            Vec::new()
        };

        let trends: Vec<(String, Color, Vec<(f64, f64)>)> = output
            .series
            .iter()
            .map(|series| {
                let name = match &series.player {
                    Some(player) => format!("{player} - average {}", metric_name(metric)),
                    None => format!("average {}", metric_name(metric)),
                };
                (
                    name,
                    color_of(series.player.as_deref()),
                    to_tuples(&trend_points(&series.buckets)),
                )
            })
            .collect();

        let all_points: Vec<ChartPoint> = scatter
            .iter()
            .chain(trends.iter())
            .flat_map(|(_, _, data)| data.iter())
            .chain(excluded.iter())
            .map(|&p| p.into())
            .collect();
        let (x_bounds, y_bounds) = charting::compute_bounds(&all_points);

        let mut datasets = Vec::new();
        for (name, color, data) in &scatter {
            datasets.push(
                Dataset::default()
                    .name(name.clone())
                    .marker(Marker::Dot)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(*color).add_modifier(Modifier::DIM))
                    .data(data),
            );
        }
        if !excluded.is_empty() {
            datasets.push(
                Dataset::default()
                    .name("grade E (excluded)")
                    .marker(Marker::Dot)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(Color::Red))
                    .data(&excluded),
            );
        }
        for (name, color, data) in &trends {
            datasets.push(
                Dataset::default()
                    .name(name.clone())
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(*color).add_modifier(Modifier::BOLD))
                    .data(data),
            );
        }

        let group_by = self.group_by;
        let level_axis = match group_by {
            GroupBy::Level => {
                let levels: Vec<f64> = all_points.iter().map(|p| p.x).collect();
                charting::level_axis(&levels)
            }
            GroupBy::TimeBucket { .. } => None,
        };
        let (x_bounds, x_labels) = level_axis.unwrap_or_else(|| {
            let labels = charting::axis_labels(x_bounds, AXIS_LABELS, |v| {
                charting::x_label(v, group_by)
            });
            (x_bounds, labels)
        });
        let y_labels = charting::axis_labels(y_bounds, AXIS_LABELS, charting::format_label);

        Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title(x_axis_name(group_by))
                    .bounds(x_bounds)
                    .labels(
                        x_labels
                            .into_iter()
                            .map(|l| Span::styled(l, bold_style))
                            .collect::<Vec<_>>(),
                    ),
            )
            .y_axis(
                Axis::default()
                    .title(metric_name(metric))
                    .bounds(y_bounds)
                    .labels(
                        y_labels
                            .into_iter()
                            .map(|l| Span::styled(l, bold_style))
                            .collect::<Vec<_>>(),
                    ),
            )
            .render(chunks[1], buf);

        let counts = format!(
            "{} sessions   {} excluded   {} buckets",
            output.kept.len(),
            output.excluded.len(),
            output.buckets.len()
        );
        Paragraph::new(Span::styled(counts, bold_style))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        Paragraph::new(Span::styled(
            "(s)catter / (e)xcluded / (tab) table / (esc)ape",
            italic_style,
        ))
        .render(chunks[3], buf);
    }
}
