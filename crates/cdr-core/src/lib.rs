//! cdr-core
//!
//! Pure domain types and storage key conventions for the clinical decision
//! rule engine, with no parsing, scoring, or AWS dependency. This is the shared
//! vocabulary of the other crates.

pub mod error;
pub mod models;
pub mod s3_keys;
