pub mod presentation;
pub mod rule;
