//! Zip archive extraction with manifest detection.
//!
//! Extracts every entry of an `.ipa` (zip) archive under a destination
//! directory, preserving directory structure and unix file modes. While
//! iterating, records any entry whose path ends with the manifest filename
//! so the caller learns about a missing `Info.plist` without the extraction
//! failing.

use crate::error::{Result, TriageError};
use crate::manifest::MANIFEST_FILE_NAME;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Outcome of a single extraction pass.
#[derive(Debug, Default)]
pub struct ExtractionReport {
    /// Number of file entries written (directories excluded).
    pub files_extracted: usize,
    /// Destination paths of entries ending in the manifest filename,
    /// in archive entry order. Empty means no manifest was seen.
    pub manifest_paths: Vec<PathBuf>,
}

impl ExtractionReport {
    pub fn manifest_found(&self) -> bool {
        !self.manifest_paths.is_empty()
    }
}

/// Extract `zip_path` under `dest`.
///
/// Entry paths must stay inside `dest`; an escaping entry aborts the
/// extraction. Duplicate paths overwrite with truncate-create semantics.
/// There is no rollback: on error, already-written files remain on disk.
pub fn extract_archive(zip_path: &Path, dest: &Path) -> Result<ExtractionReport> {
    debug!("Extracting archive {} to {}", zip_path.display(), dest.display());

    let file = File::open(zip_path).map_err(|e| {
        TriageError::archive_extraction(format!("failed to open {}: {e}", zip_path.display()))
    })?;

    let mut archive = zip::ZipArchive::new(file).map_err(|e| {
        TriageError::archive_extraction(format!("failed to read {}: {e}", zip_path.display()))
    })?;

    let mut report = ExtractionReport::default();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| {
            TriageError::archive_extraction(format!("failed to access entry {i}: {e}"))
        })?;

        let Some(relative) = entry.enclosed_name() else {
            return Err(TriageError::archive_extraction(format!(
                "entry '{}' escapes the destination directory",
                entry.name()
            )));
        };
        let out_path = dest.join(relative);

        if entry.name().ends_with(MANIFEST_FILE_NAME) {
            debug!("Manifest entry found: {}", out_path.display());
            report.manifest_paths.push(out_path.clone());
        }

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| {
                TriageError::archive_extraction(format!(
                    "failed to create directory {}: {e}",
                    out_path.display()
                ))
            })?;
            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&out_path, fs::Permissions::from_mode(mode)).map_err(|e| {
                    TriageError::archive_extraction(format!(
                        "failed to set mode on {}: {e}",
                        out_path.display()
                    ))
                })?;
            }
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                TriageError::archive_extraction(format!(
                    "failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let mut out_file = File::create(&out_path).map_err(|e| {
            TriageError::archive_extraction(format!(
                "failed to create file {}: {e}",
                out_path.display()
            ))
        })?;

        std::io::copy(&mut entry, &mut out_file).map_err(|e| {
            TriageError::archive_extraction(format!(
                "failed to extract {}: {e}",
                out_path.display()
            ))
        })?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out_path, fs::Permissions::from_mode(mode)).map_err(|e| {
                TriageError::archive_extraction(format!(
                    "failed to set mode on {}: {e}",
                    out_path.display()
                ))
            })?;
        }

        report.files_extracted += 1;
    }

    if !report.manifest_found() {
        warn!("No {} entry found in {}", MANIFEST_FILE_NAME, zip_path.display());
    }

    debug!("Extraction finished: {} files", report.files_extracted);
    Ok(report)
}
