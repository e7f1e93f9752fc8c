//! Text helpers shared by the catalog, the detail modal and the UI.
//!
//! - **Sanitising**: trail data is external input; strip terminal control
//!   sequences before rendering it
//! - **Width**: Unicode-aware measuring and truncation for card snippets

mod text;

pub use text::{display_width, single_line, strip_control_chars, truncate_to_width};

/// Longest search query the filter bar accepts.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
