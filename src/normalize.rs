use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::DataFormatError;
use crate::loader::{LoadedLog, RawRow};
use crate::record::{Level, SessionRecord, SCORE_SCALE};

/// Format the game exports timestamps in, e.g. `2024-02-15 09:30 PM`
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %I:%M %p";

const LENIENT_DATETIME_FORMATS: &[&str] = &[
    EXPORT_TIMESTAMP_FORMAT,
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M",
];

const LENIENT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// How the `Timestamp` column is interpreted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TimestampFormat {
    /// Exactly one strftime format
    Strict(String),
    /// The export format first, then a handful of common alternatives
    #[default]
    Lenient,
}

impl TimestampFormat {
    pub fn export() -> Self {
        TimestampFormat::Strict(EXPORT_TIMESTAMP_FORMAT.to_string())
    }

    /// Parse a timestamp, or None when it does not match
    pub fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        match self {
            TimestampFormat::Strict(fmt) => NaiveDateTime::parse_from_str(text, fmt).ok(),
            TimestampFormat::Lenient => LENIENT_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .or_else(|| {
                    DateTime::parse_from_rfc3339(text)
                        .ok()
                        .map(|dt| dt.naive_local())
                })
                .or_else(|| {
                    LENIENT_DATE_FORMATS.iter().find_map(|fmt| {
                        NaiveDate::parse_from_str(text, fmt)
                            .ok()
                            .and_then(|d| d.and_hms_opt(0, 0, 0))
                    })
                }),
        }
    }
}

/// Strip thousands separators and convert to a number
pub fn parse_score(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|score| score.is_finite() && *score >= 0.0)
}

/// Parse a difficulty level; `-0` is folded into `0` so both land in one bucket
fn parse_level(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|l| l.is_finite())
        .map(|l| if l == 0.0 { 0.0 } else { l })
}

/// Turn one raw row into a record. `row` is 1-based and only used for error messages.
pub fn normalize_row(
    raw: &RawRow,
    row: usize,
    source_name: &str,
    player: &str,
    format: &TimestampFormat,
) -> Result<SessionRecord, DataFormatError> {
    let score = parse_score(&raw.score).ok_or_else(|| DataFormatError::InvalidScore {
        source_name: source_name.to_string(),
        row,
        value: raw.score.clone(),
    })?;
    let level = parse_level(&raw.level).ok_or_else(|| DataFormatError::InvalidLevel {
        source_name: source_name.to_string(),
        row,
        value: raw.level.clone(),
    })?;

    Ok(SessionRecord {
        timestamp: format.parse(&raw.timestamp),
        score,
        accuracy: score / SCORE_SCALE,
        grade: raw.grade.trim().to_string(),
        level: Level(level),
        player: player.to_string(),
    })
}

pub fn normalize(
    loaded: &LoadedLog,
    format: &TimestampFormat,
) -> Result<Vec<SessionRecord>, DataFormatError> {
    let records = loaded
        .rows
        .iter()
        .enumerate()
        .map(|(idx, raw)| {
            normalize_row(raw, idx + 1, &loaded.source_name, &loaded.player, format)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let undated = records.iter().filter(|r| r.timestamp.is_none()).count();
    if undated > 0 {
        log::warn!(
            "{}: {undated} of {} timestamps could not be parsed",
            loaded.source_name,
            records.len()
        );
    }

    Ok(records)
}
