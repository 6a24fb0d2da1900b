//! texfind-core: locate files in a TeX Live tree.
//!
//! The crate answers three questions about an installed `texmf-dist` tree:
//!
//! - **Where is this package, and who wrote it?** [`search::search_by_name`]
//!   walks the package tree and the documentation tree at the same time. The
//!   first walk to hit something wins; the other is cancelled. A package hit
//!   carries the author and version parsed from its header by [`metadata`].
//! - **Where is this font file?** [`font::find_font`] does one case-insensitive
//!   walk of the font tree.
//! - **Where is the documentation?** [`search::find_doc`] on its own.
//!
//! Nothing is indexed or cached: every call walks the tree afresh and stops as
//! soon as it has an answer.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use texfind_core::config::TexRoots;
//! use texfind_core::search::{search_by_name, SearchOptions, SearchResult};
//!
//! let roots = TexRoots::from_texmf_dist(Path::new("/usr/local/texlive/2024/texmf-dist"));
//! match search_by_name(&roots, "geometry.sty", &SearchOptions::default())? {
//!     SearchResult::PackageFound(record) => println!("{record}"),
//!     SearchResult::DocFound(path) => println!("doc: {}", path.display()),
//!     SearchResult::NotFound => println!("nothing"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod font;
pub mod metadata;
pub mod output;
pub mod search;
pub mod walk;
