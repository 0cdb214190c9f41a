//! Manifest normalization.
//!
//! The manifest ships as a binary plist. A working copy is placed at the top
//! of the destination directory and rewritten in place to XML by `plutil`;
//! the extracted original is never mutated.

use crate::error::{Result, TriageError};
use crate::tool::ToolInvoker;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Conventional manifest filename inside an application bundle.
pub const MANIFEST_FILE_NAME: &str = "Info.plist";

/// Converter invoked to rewrite a binary plist as XML.
const CONVERTER: &str = "plutil";

pub struct PlistNormalizer<'a> {
    invoker: &'a dyn ToolInvoker,
}

impl<'a> PlistNormalizer<'a> {
    pub fn new(invoker: &'a dyn ToolInvoker) -> Self {
        Self { invoker }
    }

    /// Copy `manifest` into `dest` under the canonical filename and convert
    /// the copy from binary to XML serialization in place.
    pub fn normalize(&self, manifest: &Path, dest: &Path) -> Result<PathBuf> {
        let target = dest.join(MANIFEST_FILE_NAME);

        fs::copy(manifest, &target).map_err(|e| {
            TriageError::manifest_conversion(format!(
                "failed to copy {} to {}: {e}",
                manifest.display(),
                target.display()
            ))
        })?;
        debug!("Copied manifest to {}", target.display());

        let target_str = target.to_string_lossy();
        let output = self
            .invoker
            .invoke(CONVERTER, &["-convert", "xml1", &target_str])?;
        if !output.success {
            return Err(TriageError::tool_failure(
                CONVERTER,
                format!("converting {}: {}", target.display(), output.combined()),
            ));
        }

        debug!("Converted {} to XML", target.display());
        Ok(target)
    }
}
