pub mod chart_writer;
pub mod store_writer;

pub use chart_writer::ChartWriter;
pub use store_writer::StoreWriter;
