//! Depth-first traversal with early exit.
//!
//! The walker offers every regular file below a root to a callback, in the
//! order the operating system lists directory entries. That order is not
//! sorted unless [`TreeWalker::sorted`] is enabled. The callback decides
//! whether the walk goes on; once it answers [`Flow::Stop`] nothing else under
//! the root is read.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::cancel::CancellationToken;
use crate::error::WalkError;

/// Callback verdict for a visited file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// How a walk ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    /// Every file under the root was offered to the callback.
    Completed,
    /// The callback returned [`Flow::Stop`].
    StoppedEarly,
    /// The cancellation token fired before the walk finished.
    Cancelled,
}

/// Recursive walker over a single root.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    root: PathBuf,
    follow_symlinks: bool,
    sorted: bool,
}

impl TreeWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_symlinks: false,
            sorted: false,
        }
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Sort each directory's entries by file name before visiting them.
    pub fn sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Walk the tree, calling `on_file(path, file_name)` for each regular file.
    ///
    /// Only a bad root is an error. Entries below the root that cannot be
    /// read are logged and skipped.
    pub fn walk<F>(
        &self,
        cancel: &CancellationToken,
        mut on_file: F,
    ) -> Result<WalkOutcome, WalkError>
    where
        F: FnMut(&Path, &str) -> Flow,
    {
        let meta = fs::metadata(&self.root).map_err(|source| WalkError::RootUnreadable {
            root: self.root.clone(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(WalkError::NotADirectory {
                root: self.root.clone(),
            });
        }

        let mut walker = WalkDir::new(&self.root).follow_links(self.follow_symlinks);
        if self.sorted {
            walker = walker.sort_by_file_name();
        }

        for entry in walker {
            if cancel.is_cancelled() {
                log::debug!("walk of {} cancelled", self.root.display());
                return Ok(WalkOutcome::Cancelled);
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(WalkError::RootUnreadable {
                        root: self.root.clone(),
                        source: err.into(),
                    });
                }
                Err(err) => {
                    log::warn!("skipping unreadable entry: {err}");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if on_file(entry.path(), &name) == Flow::Stop {
                return Ok(WalkOutcome::StoppedEarly);
            }
        }

        Ok(WalkOutcome::Completed)
    }
}

/// Walk `root` with default options and no cancellation.
pub fn walk<F>(root: impl Into<PathBuf>, on_file: F) -> Result<WalkOutcome, WalkError>
where
    F: FnMut(&Path, &str) -> Flow,
{
    TreeWalker::new(root).walk(&CancellationToken::new(), on_file)
}
