use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use itertools::Itertools;

use crate::record::{Level, SessionRecord};

/// Default width of a time bucket
pub const DEFAULT_BUCKET_DAYS: i64 = 14;

/// Time buckets are counted from this instant (a Sunday)
pub fn bucket_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1970, 1, 4)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Start of the fixed-width period containing `ts`, or None when that start
/// falls outside the representable date range
pub fn bucket_start(ts: NaiveDateTime, width: TimeDelta) -> Option<NaiveDateTime> {
    let epoch = bucket_epoch();
    let span = width.num_seconds().max(1);
    let offset = (ts - epoch).num_seconds();
    let floored = offset.div_euclid(span).checked_mul(span)?;
    epoch.checked_add_signed(TimeDelta::try_seconds(floored)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Level,
    TimeBucket { width: TimeDelta },
}

impl GroupBy {
    pub fn biweekly() -> Self {
        GroupBy::TimeBucket {
            width: TimeDelta::days(DEFAULT_BUCKET_DAYS),
        }
    }

    fn key(&self, record: &SessionRecord) -> Option<BucketKey> {
        match self {
            GroupBy::Level => Some(BucketKey::Level(record.level)),
            GroupBy::TimeBucket { width } => record
                .timestamp
                .and_then(|ts| bucket_start(ts, *width))
                .map(BucketKey::Period),
        }
    }
}

/// Which field gets averaged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Accuracy,
    Level,
}

impl Metric {
    pub fn value(&self, record: &SessionRecord) -> f64 {
        match self {
            Metric::Accuracy => record.accuracy,
            Metric::Level => record.level.value(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BucketKey {
    Level(Level),
    Period(NaiveDateTime),
}

impl BucketKey {
    /// Position on a numeric chart axis: the level itself, or days since the bucket epoch
    pub fn as_x(&self) -> f64 {
        match self {
            BucketKey::Level(level) => level.value(),
            BucketKey::Period(start) => days_since_epoch(*start),
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKey::Level(level) => write!(f, "{level}"),
            BucketKey::Period(start) => write!(f, "{}", start.format("%Y-%m-%d")),
        }
    }
}

pub fn days_since_epoch(ts: NaiveDateTime) -> f64 {
    (ts - bucket_epoch()).num_seconds() as f64 / 86_400.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateBucket {
    pub key: BucketKey,
    pub player: Option<String>,
    pub mean: f64,
    pub count: usize,
}

pub fn mean(data: &[f64]) -> Option<f64> {
    match data.len() {
        0 => None,
        count => Some(data.iter().sum::<f64>() / count as f64),
    }
}

/// Mean of `metric` per group, ascending by key then by player in first-seen order.
/// Records that have no key (undated or unbucketable, when bucketing by time) are skipped.
pub fn aggregate(
    records: &[SessionRecord],
    group_by: GroupBy,
    metric: Metric,
    split_by_player: bool,
) -> Vec<AggregateBucket> {
    let players: Vec<&str> = records.iter().map(|r| r.player.as_str()).unique().collect();

    let mut groups: BTreeMap<(BucketKey, Option<usize>), Vec<f64>> = BTreeMap::new();
    for record in records {
        let Some(key) = group_by.key(record) else {
            continue;
        };
        let player_idx = if split_by_player {
            players.iter().position(|p| *p == record.player)
        } else {
            None
        };
        groups
            .entry((key, player_idx))
            .or_default()
            .push(metric.value(record));
    }

    groups
        .into_iter()
        .filter_map(|((key, player_idx), values)| {
            mean(&values).map(|mean| AggregateBucket {
                key,
                player: player_idx.map(|idx| players[idx].to_string()),
                mean,
                count: values.len(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn record(player: &str, level: f64, accuracy: f64, ts: Option<NaiveDateTime>) -> SessionRecord {
        SessionRecord {
            timestamp: ts,
            score: accuracy * 1_000_000.0,
            accuracy,
            grade: "A".to_string(),
            level: Level(level),
            player: player.to_string(),
        }
    }

    #[test]
    fn test_mean() {
        let m = mean(&[0.9, 0.95, 0.8]).unwrap();
        assert!((m - 0.883_333_333_333).abs() < 1e-9);
        assert_eq!(mean(&[42.0]), Some(42.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn groups_by_level_in_ascending_order() {
        let records = vec![
            record("a", 10.0, 0.8, None),
            record("a", 2.0, 0.9, None),
            record("a", 10.0, 0.9, None),
        ];
        let buckets = aggregate(&records, GroupBy::Level, Metric::Accuracy, false);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].key, BucketKey::Level(Level(2.0)));
        assert_eq!(buckets[0].mean, 0.9);
        assert_eq!(buckets[1].key, BucketKey::Level(Level(10.0)));
        assert!((buckets[1].mean - 0.85).abs() < 1e-12);
        assert_eq!(buckets[1].count, 2);
    }

    #[test]
    fn empty_input_has_no_buckets() {
        assert!(aggregate(&[], GroupBy::Level, Metric::Accuracy, true).is_empty());
    }

    #[test]
    fn split_by_player_keeps_first_seen_order() {
        let records = vec![
            record("zed", 1.0, 0.7, None),
            record("amy", 1.0, 0.9, None),
            record("zed", 2.0, 0.8, None),
        ];
        let buckets = aggregate(&records, GroupBy::Level, Metric::Accuracy, true);
        let keys: Vec<_> = buckets
            .iter()
            .map(|b| (b.key.to_string(), b.player.clone().unwrap()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("1".to_string(), "zed".to_string()),
                ("1".to_string(), "amy".to_string()),
                ("2".to_string(), "zed".to_string()),
            ]
        );
    }

    #[test]
    fn bucket_boundaries_are_deterministic() {
        let width = TimeDelta::days(14);
        let start = bucket_start(at(2024, 2, 15), width).unwrap();
        assert_eq!(bucket_start(start, width), Some(start));
        assert_eq!((start - bucket_epoch()).num_days() % 14, 0);
        assert!(start <= at(2024, 2, 15));
        assert!(at(2024, 2, 15) - start < width);
    }

    #[test]
    fn thirteen_days_apart_without_boundary_share_a_bucket() {
        let width = TimeDelta::days(14);
        let start = bucket_start(at(2024, 2, 15), width).unwrap();
        let later = start + TimeDelta::days(13);
        assert_eq!(bucket_start(start, width), bucket_start(later, width));
    }

    #[test]
    fn fifteen_days_apart_never_share_a_bucket() {
        let width = TimeDelta::days(14);
        for offset in 0..14 {
            let first = at(2024, 1, 1) + TimeDelta::days(offset);
            let second = first + TimeDelta::days(15);
            assert_ne!(bucket_start(first, width), bucket_start(second, width));
        }
    }

    #[test]
    fn time_buckets_skip_undated_records() {
        let records = vec![
            record("a", 3.0, 0.9, Some(at(2024, 2, 15))),
            record("a", 5.0, 0.8, None),
        ];
        let buckets = aggregate(&records, GroupBy::biweekly(), Metric::Level, false);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].mean, 3.0);
        assert_eq!(buckets[0].count, 1);
    }

    #[test]
    fn time_buckets_ascend() {
        let records = vec![
            record("a", 3.0, 0.9, Some(at(2024, 3, 15))),
            record("a", 5.0, 0.8, Some(at(2024, 1, 2))),
        ];
        let buckets = aggregate(&records, GroupBy::biweekly(), Metric::Accuracy, false);
        assert_eq!(buckets.len(), 2);
        assert!(buckets[0].key < buckets[1].key);
        assert_eq!(buckets[0].mean, 0.8);
    }

    #[test]
    fn dates_before_the_epoch_still_bucket() {
        let width = TimeDelta::days(14);
        let start = bucket_start(at(1969, 12, 31), width).unwrap();
        assert!(start <= at(1969, 12, 31));
        assert_eq!((bucket_epoch() - start).num_days() % 14, 0);
    }

    #[test]
    fn buckets_past_the_date_range_are_skipped() {
        let width = TimeDelta::days(100_000_000);
        assert_eq!(bucket_start(at(1969, 12, 31), width), None);

        let records = vec![
            record("a", 3.0, 0.9, Some(at(1969, 12, 31))),
            record("a", 5.0, 0.8, Some(at(2024, 2, 15))),
        ];
        let buckets = aggregate(
            &records,
            GroupBy::TimeBucket { width },
            Metric::Accuracy,
            false,
        );
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].key, BucketKey::Period(bucket_epoch()));
        assert_eq!(buckets[0].mean, 0.8);
    }
}
