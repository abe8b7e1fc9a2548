use crate::aggregate::{days_since_epoch, AggregateBucket, GroupBy};
use crate::record::SessionRecord;

/// A point on a chart axis pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

impl ChartPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for ChartPoint {
    fn from(v: (f64, f64)) -> Self {
        ChartPoint { x: v.0, y: v.1 }
    }
}

impl From<ChartPoint> for (f64, f64) {
    fn from(p: ChartPoint) -> Self {
        (p.x, p.y)
    }
}

/// X position of a single record: its level, or its day offset on time charts.
/// Undated records have no place on a time axis.
pub fn record_x(record: &SessionRecord, group_by: GroupBy) -> Option<f64> {
    match group_by {
        GroupBy::Level => Some(record.level.value()),
        GroupBy::TimeBucket { .. } => record.timestamp.map(days_since_epoch),
    }
}

pub fn scatter_points<'a, I, F>(records: I, group_by: GroupBy, y: F) -> Vec<ChartPoint>
where
    I: IntoIterator<Item = &'a SessionRecord>,
    F: Fn(&SessionRecord) -> f64,
{
    records
        .into_iter()
        .filter_map(|r| record_x(r, group_by).map(|x| ChartPoint::new(x, y(r))))
        .collect()
}

pub fn trend_points(buckets: &[AggregateBucket]) -> Vec<ChartPoint> {
    buckets
        .iter()
        .map(|b| ChartPoint::new(b.key.as_x(), b.mean))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate, Metric};
    use crate::record::Level;
    use chrono::NaiveDate;

    fn record(level: f64, day: Option<u32>) -> SessionRecord {
        SessionRecord {
            timestamp: day.map(|d| {
                NaiveDate::from_ymd_opt(1970, 1, d)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            }),
            score: 500_000.0,
            accuracy: 0.5,
            grade: "B".into(),
            level: Level(level),
            player: "p".into(),
        }
    }

    #[test]
    fn level_charts_place_every_record() {
        let records = [record(3.0, None), record(4.0, Some(5))];
        let points = scatter_points(&records, GroupBy::Level, |r| r.accuracy);
        assert_eq!(points, vec![ChartPoint::new(3.0, 0.5), ChartPoint::new(4.0, 0.5)]);
    }

    #[test]
    fn time_charts_skip_undated_records() {
        let records = [record(3.0, None), record(4.0, Some(5))];
        let points = scatter_points(&records, GroupBy::biweekly(), |r| r.level.value());
        assert_eq!(points, vec![ChartPoint::new(1.0, 4.0)]);
    }

    #[test]
    fn trend_follows_bucket_order() {
        let records = [record(9.0, None), record(3.0, None)];
        let buckets = aggregate(&records, GroupBy::Level, Metric::Accuracy, false);
        let xs: Vec<f64> = trend_points(&buckets).iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![3.0, 9.0]);
    }

    #[test]
    fn tuple_conversions() {
        let p: ChartPoint = (1.0, 2.0).into();
        let t: (f64, f64) = p.into();
        assert_eq!(t, (1.0, 2.0));
    }
}
