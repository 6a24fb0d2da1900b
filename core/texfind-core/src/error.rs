//! Error types for texfind-core

use std::path::PathBuf;

use thiserror::Error;

/// Errors that end a single traversal.
///
/// Problems below the root (an unlistable subdirectory, an entry that vanished
/// mid-walk) are not represented here: the walker logs and skips them.
#[derive(Error, Debug)]
pub enum WalkError {
    /// The root could not be opened or listed.
    #[error("cannot read search root {}: {source}", root.display())]
    RootUnreadable {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The root exists but is a file, not a directory.
    #[error("search root is not a directory: {}", root.display())]
    NotADirectory { root: PathBuf },
}

/// Errors surfaced by the search coordinator.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("query name is empty")]
    EmptyQuery,

    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error("failed to build search thread pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
