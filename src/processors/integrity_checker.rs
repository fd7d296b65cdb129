use crate::models::{Cell, WideTimeSeries};
use crate::processors::BuildReport;
use crate::utils::constants::{MAX_PLAUSIBLE_JUMP, MAX_PLAUSIBLE_TEMP, MIN_PLAUSIBLE_TEMP};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    pub violations: Vec<ValueViolation>,
    pub station_statistics: BTreeMap<String, StationStatistics>,
}

#[derive(Debug, Clone)]
pub struct ValueViolation {
    pub station: String,
    pub timestamp: NaiveDateTime,
    pub violation_type: ViolationType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationType {
    OutOfRange,
    SuspiciousJump,
}

#[derive(Debug, Clone, Default)]
pub struct StationStatistics {
    pub observations: usize,
    pub invalid_values: usize,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub mean_temp: Option<f64>,
    pub first: Option<NaiveDateTime>,
    pub last: Option<NaiveDateTime>,
}

/// Flags implausible readings in a built series and summarizes each station.
///
/// Nothing here alters data; it only reports.
pub struct IntegrityChecker {
    jump_threshold: f64,
}

impl IntegrityChecker {
    pub fn new() -> Self {
        Self {
            jump_threshold: MAX_PLAUSIBLE_JUMP,
        }
    }

    pub fn check(&self, series: &WideTimeSeries) -> IntegrityReport {
        let mut report = IntegrityReport::default();

        for station in series.stations() {
            let mut stats = StationStatistics::default();
            let mut sum = 0.0;
            let mut previous: Option<(NaiveDateTime, f64)> = None;

            for &timestamp in series.timestamps() {
                let value = match series.cell(timestamp, station) {
                    Cell::Missing => continue,
                    Cell::Invalid => {
                        stats.observations += 1;
                        stats.invalid_values += 1;
                        continue;
                    }
                    Cell::Value(v) => v,
                };

                stats.observations += 1;
                stats.first.get_or_insert(timestamp);
                stats.last = Some(timestamp);
                stats.min_temp = Some(stats.min_temp.map_or(value, |t| t.min(value)));
                stats.max_temp = Some(stats.max_temp.map_or(value, |t| t.max(value)));
                sum += value;

                if !(MIN_PLAUSIBLE_TEMP..=MAX_PLAUSIBLE_TEMP).contains(&value) {
                    report.violations.push(ValueViolation {
                        station: station.clone(),
                        timestamp,
                        violation_type: ViolationType::OutOfRange,
                        details: format!(
                            "{:.1}°C is outside [{}, {}]",
                            value, MIN_PLAUSIBLE_TEMP, MAX_PLAUSIBLE_TEMP
                        ),
                    });
                }

                if let Some((prev_ts, prev_value)) = previous {
                    let jump = (value - prev_value).abs();
                    if jump > self.jump_threshold {
                        report.violations.push(ValueViolation {
                            station: station.clone(),
                            timestamp,
                            violation_type: ViolationType::SuspiciousJump,
                            details: format!(
                                "jumped {:.1}°C since {}",
                                jump,
                                prev_ts.format("%Y-%m-%d %H:%M")
                            ),
                        });
                    }
                }
                previous = Some((timestamp, value));
            }

            let valued = stats.observations - stats.invalid_values;
            if valued > 0 {
                stats.mean_temp = Some(sum / valued as f64);
            }
            report.station_statistics.insert(station.clone(), stats);
        }

        report
    }

    /// Human-readable station listing plus build and integrity findings
    pub fn generate_summary(&self, report: &IntegrityReport, build: &BuildReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Stations ===\n");
        for (station, stats) in &report.station_statistics {
            let range = match (stats.min_temp, stats.mean_temp, stats.max_temp) {
                (Some(min), Some(mean), Some(max)) => {
                    format!("min={:.1}°C avg={:.1}°C max={:.1}°C", min, mean, max)
                }
                _ => "no readings".to_string(),
            };
            let span = match (stats.first, stats.last) {
                (Some(first), Some(last)) => format!(
                    "{} .. {}",
                    first.format("%Y-%m-%d %H:%M"),
                    last.format("%Y-%m-%d %H:%M")
                ),
                _ => "-".to_string(),
            };
            summary.push_str(&format!(
                "  {:<28} {:>6} obs  {}  [{}]\n",
                station, stats.observations, range, span
            ));

            if let Some(spellings) = build.aliases.spellings(station) {
                if spellings.len() > 1 {
                    let labels: Vec<&str> = spellings.iter().map(String::as_str).collect();
                    summary.push_str(&format!("      labels: {}\n", labels.join(" | ")));
                }
            }
        }

        summary.push_str("\n=== Store ===\n");
        summary.push_str(&format!("Rows read: {}\n", build.rows_read));
        summary.push_str(&format!("Rows skipped: {}\n", build.rows_skipped));
        summary.push_str(&format!("Duplicates resolved: {}\n", build.duplicates_resolved));
        summary.push_str(&format!("Invalid values: {}\n", build.invalid_values));
        summary.push_str(&format!(
            "Merged identifiers: {}\n",
            build.aliases.collisions().count()
        ));
        summary.push_str(&format!("\nValue Violations: {}\n", report.violations.len()));

        if !report.violations.is_empty() {
            summary.push_str("\nTop 10 Violations:\n");
            for (i, violation) in report.violations.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. {} at {}: {}\n",
                    i + 1,
                    violation.station,
                    violation.timestamp.format("%Y-%m-%d %H:%M"),
                    violation.details
                ));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}
