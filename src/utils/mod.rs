pub mod constants;
pub mod filename;
pub mod progress;
pub mod reading;
pub mod station_name;

pub use constants::*;
pub use filename::chart_filename;
pub use progress::ProgressReporter;
pub use reading::parse_reading;
pub use station_name::normalize_station;
