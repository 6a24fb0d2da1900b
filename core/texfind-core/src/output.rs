//! Output helpers for search results.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::search::SearchResult;

/// Result of a single-root lookup (font or documentation) as emitted in JSON.
#[derive(Debug, Serialize)]
pub struct PathLookup<'a> {
    pub query: &'a str,
    pub path: Option<&'a Path>,
}

/// Write any serialisable value as prettified JSON followed by a newline.
pub fn write_json_pretty<T: Serialize + ?Sized>(value: &T, mut w: impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    w.write_all(json.as_bytes())?;
    w.write_all(b"\n")?;
    Ok(())
}

/// Plain text for a raced package query.
pub fn write_search_result(result: &SearchResult, query: &str, mut w: impl Write) -> Result<()> {
    match result {
        SearchResult::PackageFound(record) => writeln!(w, "{record}")?,
        SearchResult::DocFound(path) => writeln!(w, "path: {}", path.display())?,
        SearchResult::NotFound => writeln!(w, "not found: {query}")?,
    }
    Ok(())
}

/// Plain text for a font or documentation lookup.
pub fn write_lookup(lookup: &PathLookup<'_>, mut w: impl Write) -> Result<()> {
    match lookup.path {
        Some(path) => writeln!(w, "path: {}", path.display())?,
        None => writeln!(w, "not found: {}", lookup.query)?,
    }
    Ok(())
}
