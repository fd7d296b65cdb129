use crate::utils::constants::CHART_FILE_SUFFIX;
use std::path::{Path, PathBuf};

/// Chart path for a station: {output_dir}/{station_lowercased}_timeseries.svg
pub fn chart_filename(output_dir: &Path, station: &str) -> PathBuf {
    let stem = station.replace(' ', "_").to_lowercase();
    output_dir.join(format!("{}{}", stem, CHART_FILE_SUFFIX))
}
