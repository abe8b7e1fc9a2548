use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{DataFormatError, Error, Result};

pub const REQUIRED_COLUMNS: [&str; 4] = ["Timestamp", "Score", "Grade", "Difficulty Level"];

/// A score log row exactly as it appears in the file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Score")]
    pub score: String,
    #[serde(rename = "Grade")]
    pub grade: String,
    #[serde(rename = "Difficulty Level")]
    pub level: String,
}

/// Rows read from one source, tagged with the player they belong to
#[derive(Debug, Clone)]
pub struct LoadedLog {
    pub source_name: String,
    pub player: String,
    pub rows: Vec<RawRow>,
}

/// Player name for a log file: its base name without the extension
pub fn player_from_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "player".to_string())
}

/// Read a score log from disk. The file is closed before this returns.
pub fn load<P: AsRef<Path>>(path: P, player: &str) -> Result<LoadedLog> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_reader(file, &path.display().to_string(), player)
}

pub fn load_reader<R: Read>(reader: R, source_name: &str, player: &str) -> Result<LoadedLog> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if let Some(column) = REQUIRED_COLUMNS
        .iter()
        .find(|c| !headers.iter().any(|h| h == **c))
    {
        return Err(DataFormatError::MissingColumn {
            source_name: source_name.to_string(),
            column: *column,
        }
        .into());
    }

    let rows = rdr
        .deserialize::<RawRow>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    log::debug!("loaded {} rows from {source_name} for {player}", rows.len());

    Ok(LoadedLog {
        source_name: source_name.to_string(),
        player: player.to_string(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const LOG: &str = "\
Timestamp,Song,Score,Grade,Difficulty Level
2024-02-15 09:30 PM,Alpha,\"987,654\",S,12
2024-02-16 10:00 AM,Beta,\"512,000\",E,14
";

    #[test]
    fn reads_rows_and_ignores_extra_columns() {
        let log = load_reader(LOG.as_bytes(), "alice.csv", "alice").unwrap();
        assert_eq!(log.player, "alice");
        assert_eq!(log.rows.len(), 2);
        assert_eq!(log.rows[0].score, "987,654");
        assert_eq!(log.rows[1].grade, "E");
        assert_eq!(log.rows[1].level, "14");
    }

    #[test]
    fn missing_column_is_a_data_format_error() {
        let csv = "Timestamp,Score,Grade\n2024-02-15 09:30 PM,1,S\n";
        let err = load_reader(csv.as_bytes(), "bob.csv", "bob").unwrap_err();
        assert_matches!(
            err,
            Error::DataFormat(DataFormatError::MissingColumn { column: "Difficulty Level", .. })
        );
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let csv = "Timestamp,Score,Grade,Difficulty Level\n";
        let log = load_reader(csv.as_bytes(), "empty.csv", "empty").unwrap();
        assert!(log.rows.is_empty());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load("/definitely/not/here.csv", "here").unwrap_err();
        assert_matches!(err, Error::Io { .. });
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }

    #[test]
    fn player_name_is_file_stem() {
        assert_eq!(player_from_path("logs/alice.csv"), "alice");
        assert_eq!(player_from_path("bob"), "bob");
        assert_eq!(player_from_path("/tmp/scores.v2.csv"), "scores.v2");
    }
}
