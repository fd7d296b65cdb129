use crate::error::{ProcessingError, Result};
use crate::models::{Observation, StationAliases, WideTable};
use crate::utils::constants::{MAX_PLAUSIBLE_TEMP, MIN_PLAUSIBLE_TEMP};
use crate::utils::{normalize_station, parse_reading};
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Long-format rows produced from one wide snapshot
#[derive(Debug, Clone, Default)]
pub struct ParsedSnapshot {
    pub observations: Vec<Observation>,
    pub aliases: StationAliases,
    /// Cells that held no usable number
    pub dropped_cells: usize,
}

/// Turns a station × hour table into observations for a single day.
pub struct SnapshotParser {
    date: NaiveDate,
}

impl SnapshotParser {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Parser stamping observations with today's local date
    pub fn for_today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Melt the table into observations.
    ///
    /// A header that is not an hour of day is fatal; a cell that is not a
    /// number is dropped.
    pub fn parse(&self, table: &WideTable) -> Result<ParsedSnapshot> {
        if table.column_count() < 2 {
            return Err(ProcessingError::InvalidSnapshot(
                "snapshot has no hour columns".to_string(),
            ));
        }

        let hours = table.headers[1..]
            .iter()
            .map(|h| self.hour_timestamp(h))
            .collect::<Result<Vec<_>>>()?;

        let mut snapshot = ParsedSnapshot::default();
        // Raw label that last produced each key, to flag same-run conflicts
        let mut key_owner: HashMap<(NaiveDateTime, String), String> = HashMap::new();

        for row in &table.rows {
            let Some((label, cells)) = row.split_first() else {
                continue;
            };

            let station = normalize_station(label);
            if station.is_empty() {
                debug!("Skipping row with empty station label {:?}", label);
                continue;
            }

            if snapshot.aliases.record(label, &station) {
                info!("Label '{}' folded into existing station '{}'", label.trim(), station);
            }

            for (timestamp, cell) in hours.iter().zip(cells) {
                let Some(value) = parse_reading(cell) else {
                    snapshot.dropped_cells += 1;
                    continue;
                };

                if !(MIN_PLAUSIBLE_TEMP..=MAX_PLAUSIBLE_TEMP).contains(&value) {
                    warn!("Implausible reading {} for {} at {}", value, station, timestamp);
                }

                if let Some(previous) =
                    key_owner.insert((*timestamp, station.clone()), label.trim().to_string())
                {
                    if previous != label.trim() {
                        warn!(
                            "Labels '{}' and '{}' both map to '{}' at {}; the later row wins",
                            previous,
                            label.trim(),
                            station,
                            timestamp
                        );
                    }
                }

                snapshot
                    .observations
                    .push(Observation::new(*timestamp, station.clone(), Some(value)));
            }
        }

        debug!(
            "Parsed {} observations for {} ({} cells dropped)",
            snapshot.observations.len(),
            self.date,
            snapshot.dropped_cells
        );

        Ok(snapshot)
    }

    /// Header such as "7", "07", "7h" or "07:00" as a timestamp on the parse date
    fn hour_timestamp(&self, header: &str) -> Result<NaiveDateTime> {
        let trimmed = header.trim();
        let digits = trimmed
            .strip_suffix(":00")
            .or_else(|| trimmed.strip_suffix(['h', 'H']))
            .unwrap_or(trimmed)
            .trim();

        digits
            .parse::<u32>()
            .ok()
            .and_then(|hour| self.date.and_hms_opt(hour, 0, 0))
            .ok_or_else(|| {
                ProcessingError::InvalidSnapshot(format!("'{}' is not an hour of day", header))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(headers: &[&str], rows: &[&[&str]]) -> WideTable {
        WideTable::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_snapshot() -> Result<()> {
        let parser = SnapshotParser::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        let snapshot = parser.parse(&table(
            &["Postaja", "7", "14"],
            &[&["Sv. Ana", "18.2", "-"], &["Poreč", "19,1", "20.4"]],
        ))?;

        assert_eq!(
            snapshot.observations,
            vec![
                Observation::new(at(7), "Sveti Ana".to_string(), Some(18.2)),
                Observation::new(at(7), "Porec".to_string(), Some(19.1)),
                Observation::new(at(14), "Porec".to_string(), Some(20.4)),
            ]
        );
        assert_eq!(snapshot.dropped_cells, 1);

        Ok(())
    }

    #[test]
    fn test_dash_cell_produces_no_observation() -> Result<()> {
        let parser = SnapshotParser::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        let snapshot = parser.parse(&table(&["Postaja", "14"], &[&["Split", "-"]]))?;

        assert!(snapshot.observations.is_empty());
        assert_eq!(snapshot.dropped_cells, 1);

        Ok(())
    }

    #[test]
    fn test_hour_header_forms() -> Result<()> {
        let parser = SnapshotParser::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());

        assert_eq!(parser.hour_timestamp("7")?, at(7));
        assert_eq!(parser.hour_timestamp("07")?, at(7));
        assert_eq!(parser.hour_timestamp("07:00")?, at(7));
        assert_eq!(parser.hour_timestamp("14h")?, at(14));
        assert!(parser.hour_timestamp("24").is_err());
        assert!(parser.hour_timestamp("Tmax").is_err());

        Ok(())
    }

    #[test]
    fn test_bad_header_is_fatal() {
        let parser = SnapshotParser::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        let result = parser.parse(&table(&["Postaja", "7", "note"], &[&["Split", "18.0", "x"]]));

        assert!(matches!(result, Err(ProcessingError::InvalidSnapshot(_))));
    }

    #[test]
    fn test_no_numeric_cells_is_empty_not_error() -> Result<()> {
        let parser = SnapshotParser::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        let snapshot = parser.parse(&table(
            &["Postaja", "7", "14"],
            &[&["Split", "-", "-"], &["   ", "17.0", "17.1"]],
        ))?;

        assert!(snapshot.observations.is_empty());
        // The blank label is discarded; "Split" is still a known station
        assert_eq!(snapshot.aliases.len(), 1);
        assert_eq!(snapshot.dropped_cells, 2);

        Ok(())
    }

    #[test]
    fn test_qualifier_rows_fold_into_primary() -> Result<()> {
        let parser = SnapshotParser::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        let snapshot = parser.parse(&table(
            &["Postaja", "14"],
            &[&["Sv. Ana", "18.2"], &["sv. ana A", "18.5"]],
        ))?;

        assert_eq!(snapshot.observations.len(), 2);
        assert!(snapshot.observations.iter().all(|o| o.station == "Sveti Ana"));
        assert_eq!(snapshot.aliases.collisions().count(), 1);

        Ok(())
    }
}
