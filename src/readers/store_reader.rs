use crate::error::{ProcessingError, Result};
use crate::models::Observation;
use crate::utils::constants::{ACCEPTED_TIMESTAMP_FORMATS, STORE_HEADER};
use crate::utils::parse_reading;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Raw rows of the store in append order. Station labels are as written;
/// normalization happens in the series builder.
#[derive(Debug, Clone, Default)]
pub struct StoreContents {
    pub rows: Vec<Observation>,
    /// Rows dropped for a bad field count or unparseable timestamp
    pub skipped_rows: usize,
    /// Rows kept with a missing value because `temp` was not numeric
    pub invalid_values: usize,
}

pub struct StoreReader {
    strict: bool,
}

impl StoreReader {
    pub fn new() -> Self {
        Self { strict: false }
    }

    /// In strict mode any unreadable row fails the whole read
    pub fn with_strict(strict: bool) -> Self {
        Self { strict }
    }

    /// Read every row under a shared lock on the store file
    pub fn read(&self, path: &Path) -> Result<StoreContents> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ProcessingError::StoreNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        file.lock_shared()?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(&file);

        let header = reader.headers()?;
        let header_fields: Vec<&str> = header.iter().map(|h| h.trim()).collect();
        if header_fields != STORE_HEADER {
            return Err(ProcessingError::MalformedHeader {
                path: path.to_path_buf(),
                found: header_fields.join(","),
            });
        }

        let mut contents = StoreContents::default();
        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    self.skip(&mut contents, format!("unreadable row: {}", e))?;
                    continue;
                }
            };
            let line = record.position().map_or(0, |p| p.line());

            if record.len() != STORE_HEADER.len() {
                self.skip(
                    &mut contents,
                    format!("line {} has {} fields", line, record.len()),
                )?;
                continue;
            }

            let Some(timestamp) = parse_store_timestamp(&record[0]) else {
                self.skip(
                    &mut contents,
                    format!("line {} has unparseable timestamp '{}'", line, &record[0]),
                )?;
                continue;
            };

            let value = parse_reading(&record[2]);
            if value.is_none() {
                contents.invalid_values += 1;
            }

            contents
                .rows
                .push(Observation::new(timestamp, record[1].to_string(), value));
        }

        file.unlock()?;
        debug!(
            "Read {} rows from {} ({} skipped)",
            contents.rows.len(),
            path.display(),
            contents.skipped_rows
        );

        Ok(contents)
    }

    fn skip(&self, contents: &mut StoreContents, reason: String) -> Result<()> {
        if self.strict {
            return Err(ProcessingError::InvalidFormat(reason));
        }
        warn!("Skipping store row: {}", reason);
        contents.skipped_rows += 1;
        Ok(())
    }
}

impl Default for StoreReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a stored timestamp in any of the layouts producers have written.
/// A bare date means midnight.
pub fn parse_store_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ACCEPTED_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
