use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::dates::normalize_date;
use crate::error::AnalysisError;
use crate::models::{DayKey, LoadStats};

/// How the values collected for one (user, date) key collapse into one number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Mean,
    Last,
}

/// How the date column is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateHandling {
    /// Timestamps are cut down to a date; a missing timestamp keys as "".
    Normalize,
    /// The column already holds a date and must be present.
    Verbatim,
}

/// A CSV file of per-user daily values, described by its header names.
#[derive(Debug, Clone)]
pub struct DailySource {
    pub user_column: String,
    pub date_column: String,
    pub value_column: String,
    pub dates: DateHandling,
    pub reduction: Reduction,
}

impl DailySource {
    /// Heart-rate samples, averaged per user per day.
    pub fn heart_rate() -> Self {
        Self {
            user_column: "Id".to_string(),
            date_column: "SecondsTime".to_string(),
            value_column: "HeartRate".to_string(),
            dates: DateHandling::Normalize,
            reduction: Reduction::Mean,
        }
    }

    /// Daily step totals, one row per user per day.
    pub fn steps() -> Self {
        Self {
            user_column: "Id".to_string(),
            date_column: "ActivityDate".to_string(),
            value_column: "TotalSteps".to_string(),
            dates: DateHandling::Verbatim,
            reduction: Reduction::Last,
        }
    }

    pub fn load_path(&self, path: &Path) -> anyhow::Result<Loaded> {
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        self.load_reader(file)
            .with_context(|| format!("failed to read {}", path.display()))
    }

    pub fn load_reader<R: Read>(&self, reader: R) -> anyhow::Result<Loaded> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        // A repeated header name resolves to its last column.
        let position = |name: &str| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, header)| *header == name)
                .map(|(idx, _)| idx)
                .last()
        };
        let user_idx = position(&self.user_column);
        let date_idx = position(&self.date_column);
        let value_idx = position(&self.value_column);

        let mut buckets = DailyBuckets::default();
        let mut stats = LoadStats::default();

        for result in reader.records() {
            let record = result?;
            stats.rows += 1;

            let field = |idx: Option<usize>| {
                idx.and_then(|i| record.get(i))
                    .filter(|value| !value.is_empty())
            };

            let Some(user_id) = field(user_idx) else {
                stats.skipped += 1;
                continue;
            };
            let Some(raw_value) = field(value_idx) else {
                stats.skipped += 1;
                continue;
            };
            let date = match (self.dates, field(date_idx)) {
                (DateHandling::Normalize, raw) => normalize_date(raw.unwrap_or_default()),
                (DateHandling::Verbatim, Some(raw)) => raw.to_string(),
                (DateHandling::Verbatim, None) => {
                    stats.skipped += 1;
                    continue;
                }
            };
            let Some(value) = parse_number(raw_value) else {
                stats.skipped += 1;
                continue;
            };

            buckets.push(DayKey::new(user_id, date), value);
            stats.kept += 1;
        }

        let table = buckets.reduce(self.reduction);
        stats.keys = table.len();
        Ok(Loaded { table, stats })
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

#[derive(Debug, Clone)]
pub struct Loaded {
    pub table: DailyTable,
    pub stats: LoadStats,
}

#[derive(Debug, Default)]
struct DailyBuckets {
    keys: Vec<DayKey>,
    values: Vec<Vec<f64>>,
    index: HashMap<DayKey, usize>,
}

impl DailyBuckets {
    fn push(&mut self, key: DayKey, value: f64) {
        match self.index.get(&key) {
            Some(&slot) => self.values[slot].push(value),
            None => {
                self.index.insert(key.clone(), self.keys.len());
                self.keys.push(key);
                self.values.push(vec![value]);
            }
        }
    }

    fn reduce(self, reduction: Reduction) -> DailyTable {
        self.keys
            .into_iter()
            .zip(self.values)
            .filter_map(|(key, values)| {
                let value = match reduction {
                    Reduction::Mean if values.is_empty() => return None,
                    Reduction::Mean => values.iter().sum::<f64>() / values.len() as f64,
                    Reduction::Last => *values.last()?,
                };
                Some((key, value))
            })
            .collect()
    }
}

/// One value per (user, date), iterated in first-seen key order.
#[derive(Debug, Clone, Default)]
pub struct DailyTable {
    entries: Vec<(DayKey, f64)>,
    index: HashMap<DayKey, usize>,
}

impl DailyTable {
    /// Stores `value` at `key`. A repeated key takes the new value but keeps
    /// its original position.
    pub fn insert(&mut self, key: DayKey, value: f64) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &DayKey) -> Option<f64> {
        self.index.get(key).map(|&slot| self.entries[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DayKey, f64)> {
        self.entries.iter().map(|(key, value)| (key, *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(DayKey, f64)> for DailyTable {
    fn from_iter<I: IntoIterator<Item = (DayKey, f64)>>(iter: I) -> Self {
        let mut table = DailyTable::default();
        for (key, value) in iter {
            table.insert(key, value);
        }
        table
    }
}

pub fn load_heart_rate(path: &Path) -> anyhow::Result<Loaded> {
    DailySource::heart_rate().load_path(path)
}

/// Loads the first step file in `candidates` that exists.
///
/// Only a missing file moves on to the next candidate; any other failure is
/// returned as is.
pub fn load_steps(candidates: &[PathBuf]) -> anyhow::Result<(PathBuf, Loaded)> {
    let source = DailySource::steps();

    for path in candidates {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(err) => {
                return Err(err).with_context(|| format!("failed to open {}", path.display()))
            }
        };
        let loaded = source
            .load_reader(file)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return Ok((path.clone(), loaded));
    }

    Err(AnalysisError::NoStepFile {
        tried: candidates.to_vec(),
    }
    .into())
}
