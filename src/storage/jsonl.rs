//! JSONL (JSON Lines) storage.
//!
//! `matches.jsonl` is the source of truth for the match log and the campaign
//! archive is kept the same way. Each line is one JSON object.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::models::MatchRecord;

use super::{StorageConfig, StorageError};

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single line to the file.
    pub fn append(&self, entity: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let json = serde_json::to_string(entity)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        debug!("Appended line to {:?}", self.path);
        Ok(())
    }

    /// Replace the file contents.
    ///
    /// Lines go to a sibling `.tmp` file first, which is then renamed over the
    /// original, so a failed rewrite leaves the old file intact.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let tmp_path = self.path.with_extension("jsonl.tmp");
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
        }
        writer.flush()?;
        drop(writer);

        fs::rename(&tmp_path, &self.path)?;
        info!("Wrote {} lines to {:?}", entities.len(), self.path);
        Ok(entities.len())
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read every parseable line. A missing file reads as empty; malformed
    /// lines are logged and skipped.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut entities = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!(
                        "Skipping line {} in {:?}: {}",
                        index + 1,
                        self.path,
                        e
                    );
                }
            }
        }

        debug!("Read {} lines from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

/// Read the match log.
pub fn read_matches(config: &StorageConfig) -> Result<Vec<MatchRecord>, StorageError> {
    JsonlReader::new(config.matches_path()).read_all()
}

/// Append one match to the log.
pub fn append_match(config: &StorageConfig, record: &MatchRecord) -> Result<(), StorageError> {
    JsonlWriter::new(config.matches_path()).append(record)
}

/// Rewrite the match log, ordered by creation time.
pub fn write_matches(
    config: &StorageConfig,
    matches: &mut [MatchRecord],
) -> Result<usize, StorageError> {
    matches.sort_by_key(|m| m.created_at);
    JsonlWriter::new(config.matches_path()).write_all(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchResult;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Line {
        id: u32,
        label: String,
    }

    fn line(id: u32, label: &str) -> Line {
        Line {
            id,
            label: label.to_string(),
        }
    }

    fn record(day: i64) -> MatchRecord {
        MatchRecord::new(
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap() + Duration::days(day),
            MatchResult::Win,
            Utc.with_ymd_and_hms(2025, 4, 1, 19, 0, 0).unwrap() + Duration::days(day),
        )
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lines.jsonl");

        let writer: JsonlWriter<Line> = JsonlWriter::new(path.clone());
        assert_eq!(writer.write_all(&[line(1, "a"), line(2, "b")]).unwrap(), 2);

        let reader: JsonlReader<Line> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap(), vec![line(1, "a"), line(2, "b")]);
    }

    #[test]
    fn test_append_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("deeper").join("log.jsonl");

        let writer: JsonlWriter<Line> = JsonlWriter::new(path.clone());
        writer.append(&line(1, "first")).unwrap();
        writer.append(&line(2, "second")).unwrap();

        let reader: JsonlReader<Line> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let reader: JsonlReader<Line> = JsonlReader::new(temp_dir.path().join("none.jsonl"));
        assert!(!reader.exists());
        assert!(reader.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_write_all_replaces_and_leaves_no_tmp() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("replace.jsonl");

        let writer: JsonlWriter<Line> = JsonlWriter::new(path.clone());
        writer.write_all(&[line(1, "old")]).unwrap();
        writer.write_all(&[line(2, "new"), line(3, "newer")]).unwrap();

        let reader: JsonlReader<Line> = JsonlReader::new(path.clone());
        let read = reader.read_all().unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[0].label, "new");
        assert!(!path.with_extension("jsonl.tmp").exists());
    }

    #[test]
    fn test_read_all_skips_bad_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.jsonl");
        std::fs::write(
            &path,
            "{\"id\":1,\"label\":\"good\"}\nnot-json\n\n{\"id\":2,\"label\":\"fine\"}\n",
        )
        .unwrap();

        let reader: JsonlReader<Line> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap(), vec![line(1, "good"), line(2, "fine")]);
    }

    #[test]
    fn test_match_log_round_trip_in_creation_order() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());

        append_match(&config, &record(0)).unwrap();
        assert_eq!(read_matches(&config).unwrap(), vec![record(0)]);

        let mut matches = vec![record(2), record(0), record(1)];
        write_matches(&config, &mut matches).unwrap();

        let read = read_matches(&config).unwrap();
        let days: Vec<_> = read.iter().map(|m| m.date.format("%d").to_string()).collect();
        assert_eq!(days, vec!["01", "02", "03"]);
    }
}
