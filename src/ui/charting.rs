use chrono::TimeDelta;
use itertools::Itertools;

use crate::aggregate::{bucket_epoch, GroupBy};
use crate::time_series::ChartPoint;

/// Axis bounds covering every point, padded so markers are not drawn on the frame
pub fn compute_bounds<'a, I>(points: I) -> ([f64; 2], [f64; 2])
where
    I: IntoIterator<Item = &'a ChartPoint>,
{
    let mut x = [f64::INFINITY, f64::NEG_INFINITY];
    let mut y = [f64::INFINITY, f64::NEG_INFINITY];
    for p in points {
        x = [x[0].min(p.x), x[1].max(p.x)];
        y = [y[0].min(p.y), y[1].max(p.y)];
    }
    (pad(x), pad(y))
}

fn pad(bounds: [f64; 2]) -> [f64; 2] {
    if !bounds[0].is_finite() || !bounds[1].is_finite() {
        return [0.0, 1.0];
    }
    let span = bounds[1] - bounds[0];
    let margin = if span > 0.0 { span * 0.05 } else { 0.5 };
    [bounds[0] - margin, bounds[1] + margin]
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}

/// Label for a position on the x axis
pub fn x_label(val: f64, group_by: GroupBy) -> String {
    match group_by {
        GroupBy::Level => format_label(val),
        GroupBy::TimeBucket { .. } => TimeDelta::try_seconds((val * 86_400.0) as i64)
            .and_then(|offset| bucket_epoch().checked_add_signed(offset))
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    }
}

/// Widest level range still labelled one level at a time
const MAX_LEVEL_SLOTS: usize = 25;

/// X axis for a level chart: one slot per whole level from one below the lowest
/// to one above the highest, labelled only where a level was played.
/// None for fractional levels, or levels too spread out to label singly.
pub fn level_axis(levels: &[f64]) -> Option<([f64; 2], Vec<String>)> {
    let distinct: Vec<f64> = levels
        .iter()
        .copied()
        .filter(|l| l.is_finite())
        .sorted_by(f64::total_cmp)
        .dedup()
        .collect();
    let (&lowest, &highest) = (distinct.first()?, distinct.last()?);
    if distinct.iter().any(|l| l.fract() != 0.0) {
        return None;
    }
    let (lo, hi) = (lowest - 1.0, highest + 1.0);
    let slots = (hi - lo) as usize + 1;
    if slots > MAX_LEVEL_SLOTS {
        return None;
    }
    let labels = (0..slots)
        .map(|i| lo + i as f64)
        .map(|v| {
            if distinct.contains(&v) {
                format_label(v)
            } else {
                String::new()
            }
        })
        .collect();
    Some(([lo, hi], labels))
}

/// Evenly spaced axis labels from `bounds[0]` to `bounds[1]`
pub fn axis_labels<F>(bounds: [f64; 2], count: usize, label: F) -> Vec<String>
where
    F: Fn(f64) -> String,
{
    let count = count.max(2);
    let step = (bounds[1] - bounds[0]) / (count - 1) as f64;
    (0..count)
        .map(|i| label(bounds[0] + step * i as f64))
        .collect()
}
