pub mod models;
pub mod source;

pub use source::{GameSource, SqliteSource};
