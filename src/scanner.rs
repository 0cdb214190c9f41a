//! Binary string scanning.
//!
//! Locates the bundle's main executable by convention and runs two external
//! inspections against it: `r2` queried for embedded property-list markers,
//! and `strings` filtered down to slash-bearing lines. Surviving strings are
//! classified per line; no sorting or deduplication.

use crate::error::{Result, TriageError};
use crate::tool::ToolInvoker;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Deep-link association marker highlighted in property-list output.
pub const LINK_MARKER: &str = "applinks:";

/// Known-noisy substrings dropped from `strings` output before
/// classification.
pub fn default_exclusions() -> Vec<String> {
    ["https://", "/Users/", "/Volumes/", "http://", "BuildRoot/"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Per-line classification of filtered string output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Matches a two-segment slash-delimited pattern.
    PathLike,
    Plain,
}

#[derive(Debug, Clone)]
pub struct ScanLine {
    pub text: String,
    pub class: LineClass,
}

pub struct BinaryScanner<'a> {
    invoker: &'a dyn ToolInvoker,
    exclusions: Vec<String>,
    path_pattern: Regex,
}

impl<'a> BinaryScanner<'a> {
    pub fn new(invoker: &'a dyn ToolInvoker, exclusions: Vec<String>) -> Self {
        Self {
            invoker,
            exclusions,
            path_pattern: Regex::new(r"/[^/\s]+/[^/\s]+").expect("path pattern is valid"),
        }
    }

    /// The main executable carries the bundle directory's base name with the
    /// `.app` extension stripped, directly inside the bundle directory.
    pub fn main_binary_path(app_dir: &Path) -> PathBuf {
        match app_dir.file_stem() {
            Some(stem) => app_dir.join(stem),
            None => app_dir.to_path_buf(),
        }
    }

    /// Run `r2` against the bundle's main executable, listing strings that
    /// match a serialized-property-list marker. Returns the tool's raw text
    /// output; `applinks:` occurrences are marked at render time.
    pub fn inspect_plist_markers(&self, app_dir: &Path) -> Result<String> {
        let binary = Self::main_binary_path(app_dir);
        if !binary.exists() {
            return Err(TriageError::path_not_found(binary));
        }

        debug!("Inspecting {} for property-list markers", binary.display());
        let binary_str = binary.to_string_lossy();
        let output = self
            .invoker
            .invoke("r2", &["-qc", "izz~PropertyList", &binary_str])?;
        if !output.success {
            return Err(TriageError::tool_failure(
                "r2",
                format!("inspecting {}: {}", binary.display(), output.combined()),
            ));
        }
        Ok(output.stdout)
    }

    /// Run `strings` over `binary`, keep only slash-bearing lines, then drop
    /// excluded lines and classify the survivors.
    pub fn extract_strings(&self, binary: &Path) -> Result<Vec<ScanLine>> {
        if !binary.exists() {
            return Err(TriageError::path_not_found(binary));
        }

        debug!("Extracting strings from {}", binary.display());
        let binary_str = binary.to_string_lossy();
        let output = self.invoker.invoke("strings", &[&binary_str])?;
        if !output.success {
            return Err(TriageError::tool_failure(
                "strings",
                format!("extracting from {}: {}", binary.display(), output.combined()),
            ));
        }

        Ok(self.classify_lines(output.stdout.lines().filter(|line| line.contains('/'))))
    }

    /// Drop lines containing any exclusion pattern; classify the rest in
    /// input order. Classification is independent per line.
    pub fn classify_lines<'s, I>(&self, lines: I) -> Vec<ScanLine>
    where
        I: IntoIterator<Item = &'s str>,
    {
        lines
            .into_iter()
            .filter(|line| !self.exclusions.iter().any(|pattern| line.contains(pattern.as_str())))
            .map(|line| ScanLine {
                text: line.to_string(),
                class: if self.path_pattern.is_match(line) {
                    LineClass::PathLike
                } else {
                    LineClass::Plain
                },
            })
            .collect()
    }
}
