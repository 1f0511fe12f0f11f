//! Whole-file CSV table helpers shared by every repository.
//!
//! Tables are small, so every mutation reads the full table, edits it in
//! memory and writes it back through a temp file followed by a rename.

use anyhow::{Context, Result};
use csv::{ByteRecord, ReaderBuilder, WriterBuilder};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Raw rows of a table that could not be parsed
///
/// A rewrite writes them back unchanged after the parsed rows, so an
/// unrelated update never erases data a reader chose to skip.
#[derive(Debug, Clone, Default)]
pub struct Unparsed {
    headers: Option<ByteRecord>,
    records: Vec<ByteRecord>,
}

impl Unparsed {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// A table read from disk, each parsed row paired with its raw record
pub struct Table<R> {
    rows: Vec<(ByteRecord, R)>,
    unparsed: Unparsed,
}

impl<R> Table<R> {
    /// Convert every row, moving rows that fail conversion to the unparsed set
    pub fn convert<T, F>(self, table: &str, mut convert: F) -> (Vec<T>, Unparsed)
    where
        F: FnMut(R) -> Result<T>,
    {
        let mut unparsed = self.unparsed;
        let mut records = Vec::with_capacity(self.rows.len());

        for (raw, row) in self.rows {
            match convert(row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Failed to parse {} row: {}. Skipping.", table, e);
                    unparsed.records.push(raw);
                }
            }
        }

        (records, unparsed)
    }
}

/// Read a table, keeping the raw form of rows that fail to deserialize
pub fn read_table<R: DeserializeOwned>(path: &Path) -> Result<Table<R>> {
    if !path.exists() {
        return Ok(Table { rows: Vec::new(), unparsed: Unparsed::default() });
    }

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers = reader.byte_headers()?.clone();
    let mut rows = Vec::new();
    let mut unparsed = Unparsed {
        headers: (!headers.is_empty()).then(|| headers.clone()),
        records: Vec::new(),
    };

    for (index, result) in reader.byte_records().enumerate() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Unreadable row {} in {}: {}", index + 1, path.display(), e);
                continue;
            }
        };
        match raw.deserialize::<R>(Some(&headers)) {
            Ok(row) => rows.push((raw, row)),
            Err(e) => {
                warn!("Skipping malformed row {} in {}: {}", index + 1, path.display(), e);
                unparsed.records.push(raw);
            }
        }
    }

    Ok(Table { rows, unparsed })
}

/// Read every row of a table, skipping rows that fail to parse
pub fn read_rows<R: DeserializeOwned>(path: &Path) -> Result<Vec<R>> {
    let table = read_table(path)?;
    Ok(table.rows.into_iter().map(|(_, row)| row).collect())
}

/// Replace the whole table atomically
///
/// Rows in `unparsed` follow the parsed rows byte for byte. When no parsed
/// row is left the original header line is kept so they stay readable.
pub fn write_rows<R: Serialize>(path: &Path, rows: &[R], unparsed: &Unparsed) -> Result<()> {
    let temp_path = path.with_extension("csv.tmp");

    {
        let temp_file = File::create(&temp_path)
            .with_context(|| format!("Failed to create {}", temp_path.display()))?;
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .from_writer(BufWriter::new(temp_file));
        for row in rows {
            writer.serialize(row)?;
        }
        if !unparsed.is_empty() {
            if rows.is_empty() {
                if let Some(headers) = &unparsed.headers {
                    writer.write_byte_record(headers)?;
                }
            }
            for record in &unparsed.records {
                writer.write_byte_record(record)?;
            }
        }
        writer.flush()?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    debug!(
        "Wrote {} rows to {} ({} kept unparsed)",
        rows.len(),
        path.display(),
        unparsed.len()
    );
    Ok(())
}

/// Append one row, writing the header first when the table is empty
pub fn append_row<R: Serialize>(path: &Path, row: &R) -> Result<()> {
    let needs_header = fs::metadata(path).map(|meta| meta.len() == 0).unwrap_or(true);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {} for append", path.display()))?;

    let mut writer = WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);
    writer.serialize(row)?;
    writer.flush()?;

    debug!("Appended row to {}", path.display());
    Ok(())
}
