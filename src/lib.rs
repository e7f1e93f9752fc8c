//! trailhead: a terminal trail browser.
//!
//! Loads a JSON trail dataset over HTTP or from disk, filters it by
//! difficulty, location, length and free-text search, shows trail details,
//! keeps a trip preparation checklist, and stores saved filters, favorites
//! and checklist state in a local SQLite database.

pub mod app;
pub mod checklist;
pub mod config;
pub mod filter;
pub mod modal;
pub mod page;
pub mod preferences;
pub mod schedule;
pub mod storage;
pub mod theme;
pub mod trails;
pub mod ui;
pub mod util;
