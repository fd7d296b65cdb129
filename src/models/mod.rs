pub mod observation;
pub mod series;
pub mod snapshot;
pub mod station;

pub use observation::Observation;
pub use series::{Cell, StationSeries, WideTimeSeries};
pub use snapshot::WideTable;
pub use station::StationAliases;
