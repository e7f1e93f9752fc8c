//! Trail data: the record type, loading and parsing, and the in-memory catalog.
//!
//! - [`model`] - `Trail`, `Difficulty`, `FavoriteEntry` and the built-in records
//! - [`parser`] - lenient JSON array decoding with a skip count
//! - [`source`] - network or file load with a fixed fallback
//! - [`catalog`] - the loaded set, the displayed subset and card rendering data

mod catalog;
mod model;
mod parser;
mod source;

pub use catalog::{CatalogView, TrailCard, TrailCatalog, SNIPPET_WIDTH};
pub use model::{
    fallback_trails, featured_trail, format_number, Difficulty, FavoriteEntry, Trail,
};
pub use parser::{parse_trails, ParseError, ParseResult};
pub use source::{
    DataLocation, FetchError, LoadOrigin, LoadOutcome, TrailSource, DEFAULT_TIMEOUT,
    MAX_TRAILS_SIZE,
};
