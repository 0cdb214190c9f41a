//! End-to-end triage pipeline.
//!
//! Sequences the stages per archive: validate-input → extract →
//! normalize-manifest → highlight-manifest → discover-bundles →
//! scan-bundle(×N). Execution is single-threaded and strictly sequential;
//! every external invocation blocks until the child terminates.
//!
//! Stage results are handed to a [`Reporter`] as structured data; the
//! pipeline itself prints nothing.

use crate::archive::{self, ExtractionReport};
use crate::error::{Result, TriageError};
use crate::highlight::{HighlightedLine, Highlighter};
use crate::manifest::{PlistNormalizer, MANIFEST_FILE_NAME};
use crate::scanner::{BinaryScanner, ScanLine};
use crate::tool::ToolInvoker;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Expected extension of the input package.
pub const PACKAGE_EXTENSION: &str = "ipa";

/// Conventional container directory holding application bundles.
const PAYLOAD_DIR: &str = "Payload";

/// Receives structured stage results for rendering.
///
/// The pipeline treats presentation as an external collaborator; rendering
/// decisions (colors, streams) live entirely in the implementation.
pub trait Reporter {
    /// The input was copied into the destination and renamed to `.zip`.
    fn archive_staged(&mut self, zip_path: &Path);
    /// Extraction finished; the report carries the manifest-detection signal.
    fn extraction_finished(&mut self, report: &ExtractionReport);
    /// The working copy of the manifest was converted to XML at `path`.
    fn manifest_normalized(&mut self, path: &Path);
    /// Tagged manifest lines, in original order.
    fn manifest_lines(&mut self, lines: &[HighlightedLine]);
    /// A non-fatal stage failed; the run continues but exits non-zero.
    fn stage_error(&mut self, stage: &str, error: &TriageError);
    /// Raw property-list inspection output for one bundle.
    fn bundle_inspection(&mut self, bundle: &str, raw: &str);
    /// Filtered, classified string lines for one bundle.
    fn bundle_strings(&mut self, bundle: &str, lines: &[ScanLine]);
    /// The run completed; extracted artifacts remain under `dest`.
    fn finished(&mut self, dest: &Path);
}

pub struct Pipeline<'a> {
    invoker: &'a dyn ToolInvoker,
    highlighter: Highlighter,
    scanner: BinaryScanner<'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(invoker: &'a dyn ToolInvoker) -> Self {
        Self {
            invoker,
            highlighter: Highlighter::default(),
            scanner: BinaryScanner::new(invoker, crate::scanner::default_exclusions()),
        }
    }

    pub fn with_highlighter(mut self, highlighter: Highlighter) -> Self {
        self.highlighter = highlighter;
        self
    }

    pub fn with_scanner(mut self, scanner: BinaryScanner<'a>) -> Self {
        self.scanner = scanner;
        self
    }

    /// Run the full pipeline for one archive.
    ///
    /// Preconditions are validated before any side effect. On failure,
    /// extracted files are left on disk for inspection; nothing is rolled
    /// back. A manifest-path failure is reported and carried to the exit
    /// status, but bundle scanning still runs; a bundle-scan failure aborts
    /// the remaining bundles.
    pub fn run(&self, archive_path: &Path, reporter: &mut dyn Reporter) -> Result<()> {
        let dest = self.validate(archive_path)?;

        fs::create_dir(&dest)?;
        let zip_path = self.stage_archive(archive_path, &dest)?;
        reporter.archive_staged(&zip_path);

        let report = archive::extract_archive(&zip_path, &dest)?;
        reporter.extraction_finished(&report);

        // Manifest inspection and binary scanning are independent paths; a
        // failure here is deferred so the bundles still get scanned.
        let manifest_result = self.inspect_manifest(&dest, reporter);
        if let Err(err) = &manifest_result {
            reporter.stage_error("manifest", err);
        }

        self.scan_bundles(&dest, reporter)?;

        reporter.finished(&dest);
        manifest_result
    }

    /// Input must exist with the package extension; the destination
    /// directory derived from its name must not exist yet.
    fn validate(&self, archive_path: &Path) -> Result<PathBuf> {
        if archive_path.extension() != Some(OsStr::new(PACKAGE_EXTENSION)) {
            return Err(TriageError::invalid_input(format!(
                "{} does not have an '.{}' extension",
                archive_path.display(),
                PACKAGE_EXTENSION
            )));
        }
        if !archive_path.is_file() {
            return Err(TriageError::path_not_found(archive_path));
        }

        let dest = archive_path.with_extension("");
        if dest.exists() {
            return Err(TriageError::destination_exists(dest));
        }
        Ok(dest)
    }

    /// Copy the input into the destination and rename the copy to `.zip`.
    /// The original package is never touched.
    fn stage_archive(&self, archive_path: &Path, dest: &Path) -> Result<PathBuf> {
        let file_name = archive_path
            .file_name()
            .ok_or_else(|| TriageError::invalid_input("input path has no file name"))?;
        let copied = dest.join(file_name);
        fs::copy(archive_path, &copied)?;

        let zip_path = copied.with_extension("zip");
        fs::rename(&copied, &zip_path)?;
        debug!("Staged archive at {}", zip_path.display());
        Ok(zip_path)
    }

    fn inspect_manifest(&self, dest: &Path, reporter: &mut dyn Reporter) -> Result<()> {
        let manifest = self.discover_manifest(dest)?;
        let normalized = PlistNormalizer::new(self.invoker).normalize(&manifest, dest)?;
        reporter.manifest_normalized(&normalized);

        let lines = self.highlighter.highlight_file(&normalized)?;
        reporter.manifest_lines(&lines);
        Ok(())
    }

    /// First `Payload/*.app/Info.plist` in lexical order.
    fn discover_manifest(&self, dest: &Path) -> Result<PathBuf> {
        self.discover_bundles(dest)?
            .into_iter()
            .map(|app_dir| app_dir.join(MANIFEST_FILE_NAME))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| TriageError::manifest_not_found(dest))
    }

    /// All `Payload/*.app` directories in lexical order.
    fn discover_bundles(&self, dest: &Path) -> Result<Vec<PathBuf>> {
        let payload = dest.join(PAYLOAD_DIR);
        if !payload.is_dir() {
            return Err(TriageError::no_bundles(dest.to_path_buf()));
        }

        let bundles: Vec<PathBuf> = walkdir::WalkDir::new(&payload)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .filter(|e| e.path().extension() == Some(OsStr::new("app")))
            .map(|e| e.into_path())
            .collect();

        if bundles.is_empty() {
            return Err(TriageError::no_bundles(dest.to_path_buf()));
        }
        Ok(bundles)
    }

    /// Scan bundles one at a time in lexical order. The first failure aborts
    /// the remaining bundles.
    fn scan_bundles(&self, dest: &Path, reporter: &mut dyn Reporter) -> Result<()> {
        for app_dir in self.discover_bundles(dest)? {
            let bundle = app_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            debug!("Scanning bundle {bundle}");

            let inspection = self.scanner.inspect_plist_markers(&app_dir)?;
            reporter.bundle_inspection(&bundle, &inspection);

            let binary = BinaryScanner::main_binary_path(&app_dir);
            let lines = self.scanner.extract_strings(&binary)?;
            if lines.is_empty() {
                warn!("No string lines survived filtering for {bundle}");
            }
            reporter.bundle_strings(&bundle, &lines);
        }
        Ok(())
    }
}
