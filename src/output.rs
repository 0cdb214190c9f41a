//! Terminal rendering of triage results.
//!
//! Analysis content goes to stdout; status and diagnostics go to stderr.

use crate::archive::ExtractionReport;
use crate::error::TriageError;
use crate::highlight::{HighlightCategory, HighlightedLine};
use crate::manifest::MANIFEST_FILE_NAME;
use crate::pipeline::Reporter;
use crate::scanner::{LineClass, ScanLine, LINK_MARKER};
use colored::{ColoredString, Colorize};
use std::path::Path;

/// Print the tool banner to stderr.
pub fn print_banner() {
    eprintln!(
        "{}",
        format!("ipatriage v{}", env!("CARGO_PKG_VERSION")).yellow()
    );
    eprintln!("{}", "Static triage for iOS application packages".yellow());
    eprintln!();
}

/// Color a manifest line according to its highlight category.
fn colorize_manifest_line(text: &str, category: HighlightCategory) -> ColoredString {
    match category {
        HighlightCategory::UrlSchemes => text.cyan(),
        HighlightCategory::UrlName => text.green(),
        HighlightCategory::TypeRole => text.yellow(),
        HighlightCategory::UrlComponents => text.magenta(),
        HighlightCategory::ComponentPath => text.red(),
        HighlightCategory::QueryItems => text.blue(),
    }
}

/// Rebuild a line with every `marker` occurrence colored green.
pub fn mark_occurrences(line: &str, marker: &str) -> String {
    if !line.contains(marker) {
        return line.to_string();
    }
    let highlighted = marker.green().to_string();
    line.split(marker).collect::<Vec<_>>().join(&highlighted)
}

/// Colored terminal implementation of the pipeline's [`Reporter`].
pub struct TerminalReporter;

impl Reporter for TerminalReporter {
    fn archive_staged(&mut self, zip_path: &Path) {
        eprintln!(
            "{}",
            format!("File copied and renamed to: {}", zip_path.display()).green()
        );
    }

    fn extraction_finished(&mut self, report: &ExtractionReport) {
        for path in &report.manifest_paths {
            eprintln!(
                "{}",
                format!("{} found at: {}", MANIFEST_FILE_NAME, path.display()).green()
            );
        }
        if !report.manifest_found() {
            eprintln!(
                "{}",
                format!("{} not found within the archive.", MANIFEST_FILE_NAME).red()
            );
        }
    }

    fn manifest_normalized(&mut self, path: &Path) {
        eprintln!(
            "{}",
            format!("Converted {} to XML format.", path.display()).green()
        );
    }

    fn manifest_lines(&mut self, lines: &[HighlightedLine]) {
        for line in lines {
            match line.category {
                Some(category) => println!("{}", colorize_manifest_line(&line.text, category)),
                None => println!("{}", line.text),
            }
        }
    }

    fn stage_error(&mut self, stage: &str, error: &TriageError) {
        eprintln!("{}", format!("{stage} stage failed: {error}").red());
    }

    fn bundle_inspection(&mut self, bundle: &str, raw: &str) {
        println!("Property-list strings in {bundle}:");
        for line in raw.lines() {
            println!("{}", mark_occurrences(line, LINK_MARKER));
        }
    }

    fn bundle_strings(&mut self, bundle: &str, lines: &[ScanLine]) {
        println!("Filtered strings with slashes in {bundle}:");
        for line in lines {
            match line.class {
                LineClass::PathLike => println!("{}", line.text.green()),
                LineClass::Plain => println!("{}", line.text.red()),
            }
        }
    }

    fn finished(&mut self, dest: &Path) {
        eprintln!(
            "{}",
            format!("Extraction complete, artifacts left in: {}", dest.display()).green()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_occurrences_without_marker() {
        assert_eq!(mark_occurrences("plain line", LINK_MARKER), "plain line");
    }

    #[test]
    fn test_mark_occurrences_preserves_surrounding_text() {
        // Force colors off so the test is stable regardless of tty
        colored::control::set_override(false);
        let marked = mark_occurrences("see applinks:example.com and applinks:other.org", "applinks:");
        assert_eq!(marked, "see applinks:example.com and applinks:other.org");
        colored::control::unset_override();
    }
}
