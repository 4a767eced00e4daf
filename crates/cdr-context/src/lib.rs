//! cdr-context
//!
//! Chooses the decision rules relevant to a presentation and packs them,
//! with the catalog index and usage instructions, into a bounded text block
//! for a downstream prompt.

pub mod assemble;
pub mod rank;

pub use assemble::{assemble, fixed_overhead, DEFAULT_MAX_CHARS};
pub use rank::{rank, Ranked};
