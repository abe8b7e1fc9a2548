use chrono::{Months, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::record::SessionRecord;

/// Where a trailing window is measured back from
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecencyAnchor {
    /// Wall clock at run time
    Now,
    /// Newest timestamp in the loaded data
    Latest,
}

/// Keep only sessions from the last `months` calendar months
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recency {
    pub months: u32,
    pub anchor: RecencyAnchor,
}

impl Recency {
    pub fn last_month(anchor: RecencyAnchor) -> Self {
        Self { months: 1, anchor }
    }

    /// Earliest timestamp still inside the window. None when the window
    /// cannot be placed (no dated records for `Latest`), which keeps nothing.
    pub fn cutoff(&self, now: NaiveDateTime, records: &[SessionRecord]) -> Option<NaiveDateTime> {
        let anchor = match self.anchor {
            RecencyAnchor::Now => Some(now),
            RecencyAnchor::Latest => records.iter().filter_map(|r| r.timestamp).max(),
        }?;
        anchor.checked_sub_months(Months::new(self.months))
    }
}

/// Split into (kept, failing). Together they are exactly the input.
pub fn partition_failing(records: Vec<SessionRecord>) -> (Vec<SessionRecord>, Vec<SessionRecord>) {
    records.into_iter().partition(|r| !r.is_failing())
}

/// Drop records outside the window, including undated ones
pub fn within_window(
    records: Vec<SessionRecord>,
    cutoff: Option<NaiveDateTime>,
) -> Vec<SessionRecord> {
    let Some(cutoff) = cutoff else {
        return Vec::new();
    };
    records
        .into_iter()
        .filter(|r| r.timestamp.is_some_and(|t| t >= cutoff))
        .collect()
}
