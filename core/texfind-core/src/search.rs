//! Package and documentation search, raced against each other.
//!
//! A package query starts two walks at once: one over the package tree
//! matching file names that *contain* the query, one over the documentation
//! tree matching names that *start with* the query's stem. The first walk to
//! find something decides the answer and the other is cancelled. When both
//! walks run out of files the answer is [`SearchResult::NotFound`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};

use crate::cancel::CancellationToken;
use crate::config::TexRoots;
use crate::error::{SearchError, WalkError};
use crate::metadata::read_package_meta;
use crate::walk::{Flow, TreeWalker};

/// A package file together with the header fields found in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub author: String,
    pub version: String,
}

impl fmt::Display for FileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "path: {}", self.path.display())?;
        writeln!(f, "author: {}", self.author)?;
        write!(f, "version: {}", self.version)
    }
}

/// Outcome of a raced package query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SearchResult {
    PackageFound(FileRecord),
    DocFound(PathBuf),
    NotFound,
}

#[derive(Debug, Default, Clone)]
pub struct SearchOptions {
    pub follow_symlinks: bool,
    /// Visit directory entries in file-name order instead of listing order.
    pub sorted: bool,
    /// Threads for the race pool. Never fewer than the number of raced tasks.
    pub jobs: Option<usize>,
    /// Give up on a race after this long and report [`SearchResult::NotFound`].
    pub timeout: Option<Duration>,
}

impl SearchOptions {
    pub(crate) fn walker(&self, root: &Path) -> TreeWalker {
        TreeWalker::new(root)
            .follow_symlinks(self.follow_symlinks)
            .sorted(self.sorted)
    }
}

/// One side of a race. Returns `Ok(None)` once its tree is exhausted.
pub type SearchTask =
    Box<dyn FnOnce(&CancellationToken) -> Result<Option<SearchResult>, WalkError> + Send>;

/// Box a closure as a [`SearchTask`].
pub fn search_task<F>(f: F) -> SearchTask
where
    F: FnOnce(&CancellationToken) -> Result<Option<SearchResult>, WalkError> + Send + 'static,
{
    Box::new(f)
}

/// Terminal message every task sends exactly once.
enum Signal {
    Found(SearchResult),
    Exhausted,
    Failed(WalkError),
}

/// Package file names match when they contain the query anywhere.
pub fn package_matches(file_name: &str, query: &str) -> bool {
    file_name.contains(query)
}

/// The query up to its first `.`, so `amsmath.sty` looks for `amsmath*` docs.
pub fn doc_stem(query: &str) -> &str {
    query.split('.').next().unwrap_or_default()
}

/// Documentation file names match when they start with the stem.
pub fn doc_matches(file_name: &str, stem: &str) -> bool {
    file_name.starts_with(stem)
}

/// Walk `root` for the first package file whose name contains `name`.
pub fn find_package(
    root: &Path,
    name: &str,
    opts: &SearchOptions,
    cancel: &CancellationToken,
) -> Result<Option<FileRecord>, WalkError> {
    let mut found = None;

    opts.walker(root).walk(cancel, |path, file_name| {
        if !package_matches(file_name, name) {
            return Flow::Continue;
        }
        let meta = read_package_meta(path);
        found = Some(FileRecord {
            path: path.to_path_buf(),
            author: meta.author,
            version: meta.version,
        });
        Flow::Stop
    })?;

    Ok(found)
}

/// Walk `root` for the first documentation file named after `name`'s stem.
///
/// A query without a stem (such as `.sty`) finds nothing rather than
/// matching every file.
pub fn find_doc(
    root: &Path,
    name: &str,
    opts: &SearchOptions,
    cancel: &CancellationToken,
) -> Result<Option<PathBuf>, WalkError> {
    let stem = doc_stem(name);
    if stem.is_empty() {
        return Ok(None);
    }

    let mut found = None;
    opts.walker(root).walk(cancel, |path, file_name| {
        if doc_matches(file_name, stem) {
            found = Some(path.to_path_buf());
            Flow::Stop
        } else {
            Flow::Continue
        }
    })?;

    Ok(found)
}

/// Race the package search against the documentation search for `name`.
pub fn search_by_name(
    roots: &TexRoots,
    name: &str,
    opts: &SearchOptions,
) -> Result<SearchResult, SearchError> {
    if name.is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    let package_task = {
        let root = roots.package_root.clone();
        let name = name.to_string();
        let opts = opts.clone();
        search_task(move |cancel| {
            Ok(find_package(&root, &name, &opts, cancel)?.map(SearchResult::PackageFound))
        })
    };

    let doc_task = {
        let root = roots.doc_root.clone();
        let name = name.to_string();
        let opts = opts.clone();
        search_task(move |cancel| {
            Ok(find_doc(&root, &name, &opts, cancel)?.map(SearchResult::DocFound))
        })
    };

    race(vec![package_task, doc_task], opts)
}

/// Run every task in parallel and return the first result any of them finds.
///
/// Tasks run on a dedicated pool with at least one thread per task, never on
/// rayon's global pool.
///
/// Losing tasks are cancelled once a winner is known. If all tasks exhaust
/// their trees the result is [`SearchResult::NotFound`]; if all of them fail
/// the first failure is returned. A configured timeout also yields
/// `NotFound` after cancelling the remaining tasks.
pub fn race(tasks: Vec<SearchTask>, opts: &SearchOptions) -> Result<SearchResult, SearchError> {
    let total = tasks.len();
    if total == 0 {
        return Ok(SearchResult::NotFound);
    }

    // Every task needs its own thread or a blocked walk holds up the others.
    let threads = opts.jobs.unwrap_or(total).max(total);
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("texfind-search-{i}"))
        .build()?;

    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::channel();

    for task in tasks {
        let tx = tx.clone();
        let cancel = cancel.clone();
        let job = move || {
            let signal = match task(&cancel) {
                Ok(Some(result)) => Signal::Found(result),
                Ok(None) => Signal::Exhausted,
                Err(err) => Signal::Failed(err),
            };
            // The receiver is gone once a winner has been returned.
            let _ = tx.send(signal);
        };
        pool.spawn(job);
    }
    drop(tx);

    let deadline = opts.timeout.map(|timeout| Instant::now() + timeout);
    let mut finished = 0;
    let mut failures = Vec::new();

    while finished < total {
        let signal = match deadline {
            Some(deadline) => {
                match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                    Ok(signal) => signal,
                    Err(RecvTimeoutError::Timeout) => {
                        log::warn!(
                            "search timed out after {:?}",
                            opts.timeout.unwrap_or_default()
                        );
                        cancel.cancel();
                        return Ok(SearchResult::NotFound);
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(signal) => signal,
                Err(_) => break,
            },
        };
        finished += 1;

        match signal {
            Signal::Found(result) => {
                cancel.cancel();
                return Ok(result);
            }
            Signal::Exhausted => {}
            Signal::Failed(err) => {
                log::warn!("search abandoned: {err}");
                failures.push(err);
            }
        }
    }

    if failures.len() == total {
        if let Some(err) = failures.into_iter().next() {
            return Err(err.into());
        }
    }
    Ok(SearchResult::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn package_and_doc_predicates_differ() {
        assert!(package_matches("foo-bar.sty", "bar"));
        assert!(package_matches("foobaristo.sty", "bar"));
        assert!(package_matches("barista.sty", "bar"));

        let stem = doc_stem("bar");
        assert!(doc_matches("barista.sty", stem));
        assert!(!doc_matches("foobaristo.sty", stem));
    }

    #[test]
    fn doc_stem_cuts_at_first_dot() {
        assert_eq!(doc_stem("amsmath.sty"), "amsmath");
        assert_eq!(doc_stem("pgf.code.tex"), "pgf");
        assert_eq!(doc_stem("geometry"), "geometry");
        assert_eq!(doc_stem(".sty"), "");
    }

    #[test]
    fn file_record_renders_fields_on_lines() {
        let record = FileRecord {
            path: PathBuf::from("/tex/latex/foo/foo.sty"),
            author: "Alice".to_string(),
            version: String::new(),
        };
        assert_eq!(
            record.to_string(),
            "path: /tex/latex/foo/foo.sty\nauthor: Alice\nversion: "
        );
    }

    #[test]
    fn empty_race_is_not_found() {
        let result = race(Vec::new(), &SearchOptions::default()).expect("race");
        assert_eq!(result, SearchResult::NotFound);
    }

    #[test]
    fn race_returns_only_finder() {
        let tasks = vec![
            search_task(|_| Ok(None)),
            search_task(|_| Ok(Some(SearchResult::DocFound(PathBuf::from("/doc/x.pdf"))))),
            search_task(|_| Ok(None)),
        ];
        let result = race(tasks, &SearchOptions::default()).expect("race");
        assert_eq!(result, SearchResult::DocFound(PathBuf::from("/doc/x.pdf")));
    }

    #[test]
    fn race_times_out_and_cancels_stragglers() {
        let tasks = vec![search_task(|cancel| {
            while !cancel.is_cancelled() {
                std::thread::sleep(Duration::from_millis(5));
            }
            Ok(None)
        })];
        let opts = SearchOptions {
            timeout: Some(Duration::from_millis(50)),
            ..SearchOptions::default()
        };
        let result = race(tasks, &opts).expect("race");
        assert_eq!(result, SearchResult::NotFound);
    }

    #[test]
    fn blocked_side_does_not_delay_finder() {
        let tasks = vec![
            search_task(|cancel| {
                while !cancel.is_cancelled() {
                    std::thread::sleep(Duration::from_millis(5));
                }
                Ok(None)
            }),
            search_task(|_| Ok(Some(SearchResult::DocFound(PathBuf::from("/doc/x.pdf"))))),
        ];
        let opts = SearchOptions {
            timeout: Some(Duration::from_secs(5)),
            ..SearchOptions::default()
        };
        let result = race(tasks, &opts).expect("race");
        assert_eq!(result, SearchResult::DocFound(PathBuf::from("/doc/x.pdf")));
    }

    #[test]
    fn blocked_side_does_not_delay_finder_with_one_job() {
        let tasks = vec![
            search_task(|cancel| {
                while !cancel.is_cancelled() {
                    std::thread::sleep(Duration::from_millis(5));
                }
                Ok(None)
            }),
            search_task(|_| Ok(Some(SearchResult::DocFound(PathBuf::from("/doc/z.pdf"))))),
        ];
        let opts = SearchOptions {
            jobs: Some(1),
            timeout: Some(Duration::from_secs(5)),
            ..SearchOptions::default()
        };
        let result = race(tasks, &opts).expect("race");
        assert_eq!(result, SearchResult::DocFound(PathBuf::from("/doc/z.pdf")));
    }

    #[test]
    fn loser_is_cancelled_after_winner() {
        let loser_stopped = Arc::new(AtomicBool::new(false));
        let tasks = vec![
            {
                let loser_stopped = Arc::clone(&loser_stopped);
                search_task(move |cancel| {
                    while !cancel.is_cancelled() {
                        std::thread::sleep(Duration::from_millis(5));
                    }
                    loser_stopped.store(true, Ordering::SeqCst);
                    Ok(None)
                })
            },
            search_task(|_| Ok(Some(SearchResult::DocFound(PathBuf::from("/doc/w.pdf"))))),
        ];

        let result = race(tasks, &SearchOptions::default()).expect("race");
        assert_eq!(result, SearchResult::DocFound(PathBuf::from("/doc/w.pdf")));

        let deadline = Instant::now() + Duration::from_secs(2);
        while !loser_stopped.load(Ordering::SeqCst) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(loser_stopped.load(Ordering::SeqCst));
    }

    #[test]
    fn failing_side_does_not_hide_other_side() {
        let tasks = vec![
            search_task(|_| {
                Err(WalkError::NotADirectory {
                    root: PathBuf::from("/tex"),
                })
            }),
            search_task(|_| Ok(Some(SearchResult::DocFound(PathBuf::from("/doc/y.pdf"))))),
        ];
        let opts = SearchOptions {
            jobs: Some(1),
            ..SearchOptions::default()
        };
        let result = race(tasks, &opts).expect("race");
        assert_eq!(result, SearchResult::DocFound(PathBuf::from("/doc/y.pdf")));
    }

    #[test]
    fn all_sides_failing_is_an_error() {
        let tasks = vec![
            search_task(|_| {
                Err(WalkError::NotADirectory {
                    root: PathBuf::from("/tex"),
                })
            }),
            search_task(|_| {
                Err(WalkError::NotADirectory {
                    root: PathBuf::from("/doc"),
                })
            }),
        ];
        let err = race(tasks, &SearchOptions::default()).unwrap_err();
        assert!(matches!(err, SearchError::Walk(WalkError::NotADirectory { .. })));
    }
}
