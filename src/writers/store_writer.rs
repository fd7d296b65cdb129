use crate::error::Result;
use crate::models::Observation;
use crate::utils::constants::STORE_HEADER;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Appends observations to the long-format store.
///
/// Existing bytes are never rewritten. Duplicates are not resolved here;
/// readers apply last-write-wins.
pub struct StoreWriter {
    path: PathBuf,
}

impl StoreWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append `rows` under an exclusive lock, writing the header first when
    /// the store is new or empty. Returns the number of rows written.
    pub fn merge(&self, rows: &[Observation]) -> Result<usize> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;
        file.lock()?;

        let len = file.metadata()?.len();
        if len == 0 {
            debug!("Creating store {}", self.path.display());
        } else if !ends_with_newline(&mut file, len)? {
            // An earlier append died mid-line; keep the torn row on its own line
            warn!("Store {} ends with a partial row", self.path.display());
            file.write_all(b"\n")?;
        }

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&file);

            if len == 0 {
                writer.write_record(STORE_HEADER)?;
            }
            for row in rows {
                writer.write_record(row.to_store_record())?;
            }
            writer.flush()?;
        }

        file.sync_data()?;
        file.unlock()?;

        info!("Appended {} rows to {}", rows.len(), self.path.display());
        Ok(rows.len())
    }
}

fn ends_with_newline(file: &mut File, len: u64) -> Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
