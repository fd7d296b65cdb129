use crate::error::Result;
use crate::models::{Observation, StationAliases, WideTimeSeries};
use crate::readers::StoreReader;
use crate::utils::normalize_station;
use chrono::NaiveDateTime;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// What happened while rebuilding the series from the store
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub empty_stations: usize,
    pub duplicates_resolved: usize,
    pub invalid_values: usize,
    pub aliases: StationAliases,
}

/// Rebuilds the wide per-station series from the long store on every call.
pub struct SeriesBuilder {
    reader: StoreReader,
}

impl SeriesBuilder {
    pub fn new() -> Self {
        Self {
            reader: StoreReader::new(),
        }
    }

    pub fn with_reader(reader: StoreReader) -> Self {
        Self { reader }
    }

    /// Load, re-normalize, deduplicate and pivot the store. A missing or
    /// malformed store is an error, never an empty series.
    pub fn build(&self, store_path: &Path) -> Result<(WideTimeSeries, BuildReport)> {
        let contents = self.reader.read(store_path)?;

        let (series, mut report) = self.build_from_rows(contents.rows);
        report.rows_skipped = contents.skipped_rows;
        report.invalid_values = contents.invalid_values;

        Ok((series, report))
    }

    /// Same as [`build`](Self::build) for rows already in memory, in append order
    pub fn build_from_rows(&self, rows: Vec<Observation>) -> (WideTimeSeries, BuildReport) {
        let mut report = BuildReport {
            rows_read: rows.len(),
            invalid_values: rows.iter().filter(|r| r.value.is_none()).count(),
            ..Default::default()
        };

        let normalized = self.normalize_rows(rows, &mut report);
        let (deduped, duplicates) = dedup_last_wins(normalized);
        report.duplicates_resolved = duplicates;

        for (station, spellings) in report.aliases.collisions() {
            let spellings: Vec<&str> = spellings.iter().map(String::as_str).collect();
            info!("Station '{}' merges labels: {}", station, spellings.join(" | "));
        }

        let series = WideTimeSeries::pivot(&deduped);
        debug!(
            "Built series: {} timestamps x {} stations ({} duplicates resolved)",
            series.len(),
            series.station_count(),
            report.duplicates_resolved
        );

        (series, report)
    }

    fn normalize_rows(&self, rows: Vec<Observation>, report: &mut BuildReport) -> Vec<Observation> {
        // Stores repeat the same few labels, so normalize each once
        let mut canonical: HashMap<String, String> = HashMap::new();
        let mut normalized = Vec::with_capacity(rows.len());

        for mut row in rows {
            let station = canonical
                .entry(row.station.clone())
                .or_insert_with(|| normalize_station(&row.station))
                .clone();

            if station.is_empty() {
                report.empty_stations += 1;
                continue;
            }

            report.aliases.record(&row.station, &station);
            row.station = station;
            normalized.push(row);
        }

        normalized
    }
}

impl Default for SeriesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep one row per `(timestamp, station)`: the last one in input order.
/// Output keeps first-seen key order. Returns the rows and how many were
/// superseded.
pub fn dedup_last_wins(rows: Vec<Observation>) -> (Vec<Observation>, usize) {
    let mut position: HashMap<(NaiveDateTime, String), usize> = HashMap::with_capacity(rows.len());
    let mut deduped: Vec<Observation> = Vec::with_capacity(rows.len());
    let mut superseded = 0;

    for row in rows {
        match position.entry((row.timestamp, row.station.clone())) {
            Entry::Occupied(slot) => {
                deduped[*slot.get()] = row;
                superseded += 1;
            }
            Entry::Vacant(slot) => {
                slot.insert(deduped.len());
                deduped.push(row);
            }
        }
    }

    (deduped, superseded)
}
