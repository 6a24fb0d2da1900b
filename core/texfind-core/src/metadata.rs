//! Package header extraction.
//!
//! LaTeX packages announce themselves with `\ProvidesPackage{name}[version]`
//! and usually carry one or more `% Copyright (C) <years> <holder>` lines.
//! Both are optional in practice, so extraction never fails: a field that
//! cannot be found comes back empty.
//!
//! Many packages in a TeX Live tree are still latin-1, so the patterns match
//! raw bytes inside the captured fields and invalid UTF-8 is replaced with
//! U+FFFD when the field is turned into a string.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::bytes::Regex;
use serde::{Deserialize, Serialize};

/// Author and version pulled from a package header. Either may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMeta {
    pub author: String,
    pub version: String,
}

fn provides_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\\ProvidesPackage\{((?-u:[^}])+)\}\[((?-u:[^\]])+)\]")
            .expect("valid ProvidesPackage regex")
    })
}

fn copyright_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)%*[ \t]*Copyright[ \t]*\(C\)[ \t]*[\d+\-, \t]+[ \t]((?-u:[^\r\n])+)")
            .expect("valid copyright regex")
    })
}

/// Extract author and version from raw file contents.
pub fn extract(contents: &[u8]) -> PackageMeta {
    PackageMeta {
        author: extract_author(contents),
        version: extract_version(contents),
    }
}

/// Version text of the first `\ProvidesPackage{..}[..]` declaration.
pub fn extract_version(contents: &[u8]) -> String {
    provides_re()
        .captures(contents)
        .and_then(|caps| caps.get(2))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).trim().to_string())
        .unwrap_or_default()
}

/// Holder named by the last copyright notice in the file.
pub fn extract_author(contents: &[u8]) -> String {
    copyright_re()
        .captures_iter(contents)
        .filter_map(|caps| caps.get(1))
        .last()
        .map(|m| String::from_utf8_lossy(m.as_bytes()).trim().to_string())
        .unwrap_or_default()
}

/// Read `path` and extract its header. An unreadable file gives empty metadata.
pub fn read_package_meta(path: &Path) -> PackageMeta {
    match fs::read(path) {
        Ok(contents) => extract(&contents),
        Err(err) => {
            log::warn!("cannot read package {}: {err}", path.display());
            PackageMeta::default()
        }
    }
}
