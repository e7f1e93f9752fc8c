//! SQLite-backed key/value storage for user preferences.
//!
//! Values are opaque strings at this layer; the typed JSON view lives in
//! [`crate::preferences`].

mod preferences;
mod schema;
mod types;

pub use schema::Database;
pub use types::DatabaseError;
