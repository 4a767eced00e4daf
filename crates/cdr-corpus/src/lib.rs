//! cdr-corpus
//!
//! Parses the markdown rule corpus into a typed catalog of categories and
//! rules, and serves lookups and the compact catalog index from it.

pub mod catalog;
pub mod categories;
pub mod error;
pub mod keywords;
pub mod parser;

pub use catalog::{Catalog, CatalogLoader};
pub use parser::{parse, CorpusParser};
