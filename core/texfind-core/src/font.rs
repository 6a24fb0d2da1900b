//! Font file lookup: one synchronous walk of the font tree.

use std::path::{Path, PathBuf};

use crate::cancel::CancellationToken;
use crate::error::WalkError;
use crate::search::SearchOptions;
use crate::walk::Flow;

/// Find the first file under `root` whose name equals `font_name`, ignoring case.
pub fn find_font(
    root: &Path,
    font_name: &str,
    opts: &SearchOptions,
) -> Result<Option<PathBuf>, WalkError> {
    let mut found = None;

    opts.walker(root).walk(&CancellationToken::new(), |path, name| {
        if name.eq_ignore_ascii_case(font_name) {
            found = Some(path.to_path_buf());
            Flow::Stop
        } else {
            Flow::Continue
        }
    })?;

    if let Some(path) = &found {
        log::debug!("font {font_name} found at {}", path.display());
    }
    Ok(found)
}
