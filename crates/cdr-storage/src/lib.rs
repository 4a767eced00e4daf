//! cdr-storage
//!
//! Document store for structured rule definitions and the corpus source.
//! Thin wrapper around the AWS S3 SDK.

pub mod client;
pub mod documents;
pub mod error;
pub mod objects;
