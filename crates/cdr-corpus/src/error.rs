use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort catalog construction.
///
/// Malformed headers are not errors; they are dropped by the parser. The only
/// fatal condition is not being able to read the corpus at all.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
