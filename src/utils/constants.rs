/// Store layout
pub const STORE_HEADER: [&str; 3] = ["datetime", "station", "temp"];
pub const STORE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp layouts accepted when reading the store, most common first
pub const ACCEPTED_TIMESTAMP_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d.%m.%Y %H:%M",
    "%d/%m/%Y %H:%M",
];

/// Snapshot cell values meaning "no reading"
pub const NO_READING_SENTINELS: [&str; 5] = ["", "-", "--", "\u{2014}", "n/a"];

/// Settings defaults
pub const DEFAULT_STORE_FILE: &str = "sea_temps.csv";
pub const DEFAULT_OUTPUT_DIR: &str = ".";
pub const DEFAULT_SOURCE_URL: &str =
    "https://meteo.hr/podaci.php?section=podaci_vrijeme&param=more_n";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const CONFIG_FILE_STEM: &str = "sea-temps";
pub const ENV_PREFIX: &str = "SEA_TEMPS";

/// A snapshot needs a label column and at least one hour column
pub const MIN_TABLE_COLUMNS: usize = 2;

/// Plausible sea-water range, used only for warnings
pub const MIN_PLAUSIBLE_TEMP: f64 = -3.0;
pub const MAX_PLAUSIBLE_TEMP: f64 = 40.0;
/// °C between consecutive readings of one station before it is flagged
pub const MAX_PLAUSIBLE_JUMP: f64 = 5.0;

/// Chart defaults
pub const CHART_WIDTH: u32 = 1024;
pub const CHART_HEIGHT: u32 = 768;
pub const CHART_FILE_SUFFIX: &str = "_timeseries.svg";
