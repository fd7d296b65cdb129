pub mod html_table_reader;
pub mod snapshot_fetcher;
pub mod snapshot_parser;
pub mod store_reader;

pub use html_table_reader::HtmlTableReader;
pub use snapshot_fetcher::{decode_html, read_html_file, SnapshotFetcher};
pub use snapshot_parser::{ParsedSnapshot, SnapshotParser};
pub use store_reader::{parse_store_timestamp, StoreContents, StoreReader};
