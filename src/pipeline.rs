use std::path::Path;

use chrono::{NaiveDateTime, TimeDelta};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, AggregateBucket, GroupBy, Metric};
use crate::error::Result;
use crate::filter::{partition_failing, within_window, Recency};
use crate::loader::{load, player_from_path};
use crate::normalize::{normalize, TimestampFormat};
use crate::record::SessionRecord;

/// The charts the tool knows how to draw
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ChartKind {
    #[default]
    AccuracyByLevel,
    AccuracyOverTime,
    LevelOverTime,
}

impl ChartKind {
    pub fn group_by(&self, bucket_width: TimeDelta) -> GroupBy {
        match self {
            ChartKind::AccuracyByLevel => GroupBy::Level,
            ChartKind::AccuracyOverTime | ChartKind::LevelOverTime => GroupBy::TimeBucket {
                width: bucket_width,
            },
        }
    }

    pub fn metric(&self) -> Metric {
        match self {
            ChartKind::AccuracyByLevel | ChartKind::AccuracyOverTime => Metric::Accuracy,
            ChartKind::LevelOverTime => Metric::Level,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::AccuracyByLevel => "Accuracy Over Difficulty Level",
            ChartKind::AccuracyOverTime => "Average Accuracy Over Time",
            ChartKind::LevelOverTime => "Average Difficulty Level Over Time",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub group_by: GroupBy,
    pub metric: Metric,
    pub split_by_player: bool,
    pub exclude_failing: bool,
    pub recency: Option<Recency>,
}

impl PipelineConfig {
    /// Defaults for a chart: biweekly buckets, split by player, fails held out of the means
    pub fn for_chart(chart: ChartKind) -> Self {
        Self {
            group_by: chart.group_by(TimeDelta::days(crate::aggregate::DEFAULT_BUCKET_DAYS)),
            metric: chart.metric(),
            split_by_player: true,
            exclude_failing: true,
            recency: None,
        }
    }
}

/// One trend line: the buckets of a single player, or of everyone
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub player: Option<String>,
    pub buckets: Vec<AggregateBucket>,
}

/// Everything a renderer needs
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Records that went into the aggregation
    pub kept: Vec<SessionRecord>,
    /// Failing attempts held back from the aggregation, for highlighting
    pub excluded: Vec<SessionRecord>,
    pub buckets: Vec<AggregateBucket>,
    pub series: Vec<Series>,
}

fn into_series(buckets: &[AggregateBucket]) -> Vec<Series> {
    let players: Vec<Option<String>> = buckets
        .iter()
        .map(|b| b.player.clone())
        .unique()
        .collect();
    players
        .into_iter()
        .map(|player| Series {
            buckets: buckets
                .iter()
                .filter(|b| b.player == player)
                .cloned()
                .collect(),
            player,
        })
        .collect()
}

/// Load and normalize every log, each file tagged with its own player name
pub fn load_records<P: AsRef<Path>>(
    paths: &[P],
    format: &TimestampFormat,
) -> Result<Vec<SessionRecord>> {
    let mut records = Vec::new();
    for path in paths {
        let player = player_from_path(path);
        let loaded = load(path, &player)?;
        records.extend(normalize(&loaded, format)?);
    }
    Ok(records)
}

/// Filter and aggregate already-normalized records.
/// `now` is only consulted by a recency window anchored at the wall clock.
pub fn run(
    records: Vec<SessionRecord>,
    config: &PipelineConfig,
    now: NaiveDateTime,
) -> PipelineOutput {
    let total = records.len();
    let cutoff = config.recency.map(|r| r.cutoff(now, &records));

    let (kept, excluded) = if config.exclude_failing {
        partition_failing(records)
    } else {
        (records, Vec::new())
    };

    let (kept, excluded) = match cutoff {
        Some(cutoff) => (within_window(kept, cutoff), within_window(excluded, cutoff)),
        None => (kept, excluded),
    };

    log::debug!(
        "{total} records: {} kept, {} excluded as failing",
        kept.len(),
        excluded.len()
    );

    let buckets = aggregate(&kept, config.group_by, config.metric, config.split_by_player);
    let series = into_series(&buckets);

    log::debug!("{} buckets across {} series", buckets.len(), series.len());

    PipelineOutput {
        kept,
        excluded,
        buckets,
        series,
    }
}
