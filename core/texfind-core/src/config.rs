//! Search root configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The three directory trees texfind searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TexRoots {
    pub package_root: PathBuf,
    pub font_root: PathBuf,
    pub doc_root: PathBuf,
}

impl TexRoots {
    pub fn new(
        package_root: impl Into<PathBuf>,
        font_root: impl Into<PathBuf>,
        doc_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            package_root: package_root.into(),
            font_root: font_root.into(),
            doc_root: doc_root.into(),
        }
    }

    /// Roots of a TeX Live `texmf-dist` tree: `tex/`, `fonts/` and `doc/`.
    pub fn from_texmf_dist(texmf_dist: &Path) -> Self {
        Self::new(
            texmf_dist.join("tex"),
            texmf_dist.join("fonts"),
            texmf_dist.join("doc"),
        )
    }

    pub fn with_package_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.package_root = root.into();
        self
    }

    pub fn with_font_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.font_root = root.into();
        self
    }

    pub fn with_doc_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.doc_root = root.into();
        self
    }
}
