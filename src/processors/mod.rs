pub mod integrity_checker;
pub mod series_builder;
pub mod station_selector;

pub use integrity_checker::{
    IntegrityChecker, IntegrityReport, StationStatistics, ValueViolation, ViolationType,
};
pub use series_builder::{dedup_last_wins, BuildReport, SeriesBuilder};
pub use station_selector::Selection;
