use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::Observation;

/// Content of one (timestamp, station) cell of the wide table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Cell {
    /// No observation for this key
    Missing,
    /// A row exists but its value was not a number
    Invalid,
    Value(f64),
}

impl Cell {
    pub fn value(&self) -> Option<f64> {
        match self {
            Cell::Value(v) => Some(*v),
            Cell::Missing | Cell::Invalid => None,
        }
    }
}

/// Per-station time series: unique timestamps ascending, one column per
/// canonical station identifier (sorted).
#[derive(Debug, Clone, Default)]
pub struct WideTimeSeries {
    timestamps: Vec<NaiveDateTime>,
    stations: Vec<String>,
    // columns[station][timestamp]
    columns: Vec<Vec<Cell>>,
}

impl WideTimeSeries {
    /// Pivot long rows into the wide shape. Keys must already be unique;
    /// if they are not, the later row wins.
    pub fn pivot(observations: &[Observation]) -> Self {
        let timestamps: Vec<NaiveDateTime> = observations
            .iter()
            .map(|o| o.timestamp)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let stations: Vec<String> = observations
            .iter()
            .map(|o| o.station.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let ts_index: BTreeMap<NaiveDateTime, usize> =
            timestamps.iter().enumerate().map(|(i, ts)| (*ts, i)).collect();
        let station_index: BTreeMap<&str, usize> = stations
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), i))
            .collect();

        let mut columns = vec![vec![Cell::Missing; timestamps.len()]; stations.len()];
        for obs in observations {
            let col = station_index[obs.station.as_str()];
            let row = ts_index[&obs.timestamp];
            columns[col][row] = match obs.value {
                Some(v) => Cell::Value(v),
                None => Cell::Invalid,
            };
        }

        Self {
            timestamps,
            stations,
            columns,
        }
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    pub fn has_station(&self, station: &str) -> bool {
        self.station_position(station).is_some()
    }

    pub fn cell(&self, timestamp: NaiveDateTime, station: &str) -> Cell {
        match (self.timestamp_position(timestamp), self.station_position(station)) {
            (Some(row), Some(col)) => self.columns[col][row],
            _ => Cell::Missing,
        }
    }

    pub fn value(&self, timestamp: NaiveDateTime, station: &str) -> Option<f64> {
        self.cell(timestamp, station).value()
    }

    /// True when a row existed for the key, even one with an invalid value
    pub fn contains(&self, timestamp: NaiveDateTime, station: &str) -> bool {
        self.cell(timestamp, station) != Cell::Missing
    }

    pub fn column(&self, station: &str) -> Option<StationSeries> {
        let col = self.station_position(station)?;
        let points = self
            .timestamps
            .iter()
            .zip(&self.columns[col])
            .map(|(ts, cell)| (*ts, cell.value()))
            .collect();

        Some(StationSeries {
            station: self.stations[col].clone(),
            points,
        })
    }

    /// Number of timestamps (rows)
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    fn timestamp_position(&self, timestamp: NaiveDateTime) -> Option<usize> {
        self.timestamps.binary_search(&timestamp).ok()
    }

    fn station_position(&self, station: &str) -> Option<usize> {
        self.stations
            .binary_search_by(|s| s.as_str().cmp(station))
            .ok()
    }
}

/// One column of a [`WideTimeSeries`], ordered by timestamp
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationSeries {
    pub station: String,
    pub points: Vec<(NaiveDateTime, Option<f64>)>,
}

impl StationSeries {
    /// Points that carry a value
    pub fn present(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|(ts, v)| v.map(|v| (*ts, v)))
    }

    /// Runs of consecutive present values, split wherever a value is missing
    pub fn segments(&self) -> Vec<Vec<(NaiveDateTime, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();

        for (ts, value) in &self.points {
            match value {
                Some(v) => current.push((*ts, *v)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }

        segments
    }

    pub fn min(&self) -> Option<f64> {
        self.present().map(|(_, v)| v).reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.present().map(|(_, v)| v).reduce(f64::max)
    }

    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.present().next()?.0;
        let last = self.present().last()?.0;
        Some((first, last))
    }
}
