//! Keyed highlighting of normalized manifest text.
//!
//! Scans the XML manifest line by line and tags lines containing any of the
//! recognized security-relevant keys. Rules are plain data handed to the
//! component; the defaults cover the deep-link surface of a bundle.

use crate::error::Result;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Semantic tag for a matched manifest key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightCategory {
    UrlSchemes,
    UrlName,
    TypeRole,
    UrlComponents,
    ComponentPath,
    QueryItems,
}

/// A literal key mapped to its highlight category.
#[derive(Debug, Clone)]
pub struct HighlightRule {
    pub key: String,
    pub category: HighlightCategory,
}

impl HighlightRule {
    pub fn new<S: Into<String>>(key: S, category: HighlightCategory) -> Self {
        Self { key: key.into(), category }
    }
}

/// The recognized manifest keys. Keys are domain-distinct, so rule order only
/// decides ties that do not occur in practice.
pub fn default_rules() -> Vec<HighlightRule> {
    vec![
        HighlightRule::new("CFBundleURLSchemes", HighlightCategory::UrlSchemes),
        HighlightRule::new("CFBundleURLName", HighlightCategory::UrlName),
        HighlightRule::new("CFBundleTypeRole", HighlightCategory::TypeRole),
        HighlightRule::new("CFBundleURLComponents", HighlightCategory::UrlComponents),
        HighlightRule::new("CFBundleComponentPath", HighlightCategory::ComponentPath),
        HighlightRule::new("CFBundleURLComponentQueryItems", HighlightCategory::QueryItems),
    ]
}

/// A manifest line, tagged when it contained a recognized key.
#[derive(Debug, Clone)]
pub struct HighlightedLine {
    pub text: String,
    pub category: Option<HighlightCategory>,
}

pub struct Highlighter {
    rules: Vec<HighlightRule>,
}

impl Highlighter {
    pub fn new(rules: Vec<HighlightRule>) -> Self {
        Self { rules }
    }

    /// First matching rule wins.
    pub fn categorize(&self, line: &str) -> Option<HighlightCategory> {
        self.rules
            .iter()
            .find(|rule| line.contains(&rule.key))
            .map(|rule| rule.category)
    }

    /// Read `path` line by line, preserving order and text, tagging matches.
    pub fn highlight_file(&self, path: &Path) -> Result<Vec<HighlightedLine>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut lines = Vec::new();
        for line in reader.lines() {
            let text = line?;
            let category = self.categorize(&text);
            lines.push(HighlightedLine { text, category });
        }
        Ok(lines)
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(default_rules())
    }
}
