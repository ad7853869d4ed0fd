//! Row source reader
//!
//! Opens a headered CSV file and yields fixed-size row batches in file
//! order. Each call to `chunks` opens a fresh reader, so the sequence is
//! restartable per call. The row-count probe is a separate full pass over
//! the file and feeds the progress display only.

use crate::error::Result;
use crate::store::Cell;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Estimated chunk count for a load.
///
/// Integer-division estimate carried over from the original pipeline: one
/// high when `total_rows` is an exact multiple of `chunksize`.
pub fn total_chunks(total_rows: usize, chunksize: usize) -> usize {
    total_rows / chunksize + 1
}

/// One batch of up to `chunksize` rows, with its 0-based sequence index.
#[derive(Clone, Debug)]
pub struct Chunk {
    pub index: usize,
    pub rows: Vec<Vec<Cell>>,
}

pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Count data rows: total line count minus the header line.
    pub fn count_rows(&self) -> Result<usize> {
        let file = File::open(&self.path)?;
        let mut lines = 0usize;
        for line in BufReader::new(file).lines() {
            line?;
            lines += 1;
        }
        Ok(lines.saturating_sub(1))
    }

    /// Stream the file as row batches of up to `chunksize` rows.
    pub fn chunks(&self, chunksize: usize) -> Result<Chunks> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        Ok(Chunks {
            records: reader.into_records(),
            columns,
            chunksize,
            index: 0,
            done: false,
        })
    }
}

pub struct Chunks {
    records: csv::StringRecordsIntoIter<File>,
    columns: Vec<String>,
    chunksize: usize,
    index: usize,
    done: bool,
}

impl Chunks {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl Iterator for Chunks {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut rows = Vec::new();
        while rows.len() < self.chunksize {
            match self.records.next() {
                Some(Ok(record)) => {
                    let row = (0..self.columns.len())
                        .map(|i| coerce_cell(record.get(i).unwrap_or("")))
                        .collect();
                    rows.push(row);
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }

        if rows.is_empty() {
            return None;
        }
        let chunk = Chunk {
            index: self.index,
            rows,
        };
        self.index += 1;
        Some(Ok(chunk))
    }
}

/// Coerce one CSV cell into a typed value: empty → null, then bool, i64,
/// f64, else text.
fn coerce_cell(s: &str) -> Cell {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Cell::Null;
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return Cell::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Cell::Bool(false);
    }

    if let Ok(i) = trimmed.parse::<i64>() {
        return Cell::Int(i);
    }

    if let Ok(f) = trimmed.parse::<f64>() {
        return Cell::Float(f);
    }

    Cell::Text(trimmed.to_string())
}
