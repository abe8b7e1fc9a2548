use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;

/// Scores are reported out of one million
pub const SCORE_SCALE: f64 = 1_000_000.0;

/// The only grade with special handling: a failed attempt
pub const FAILING_GRADE: &str = "E";

/// Difficulty tier of a chart. Ordered by numeric value so it can key a BTreeMap.
#[derive(Debug, Clone, Copy)]
pub struct Level(pub f64);

impl Level {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Level {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Level {}

impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Level {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// One normalized play attempt
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub timestamp: Option<NaiveDateTime>,
    pub score: f64,
    pub accuracy: f64,
    pub grade: String,
    pub level: Level,
    pub player: String,
}

impl SessionRecord {
    pub fn is_failing(&self) -> bool {
        self.grade == FAILING_GRADE
    }
}
