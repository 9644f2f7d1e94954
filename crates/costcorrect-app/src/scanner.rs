//! Plan file validation

use costcorrect_types::{Error, Result};
use std::path::Path;

/// Supported plan extensions
pub const PLAN_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg"];

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Check if a path has a supported plan extension
pub fn is_supported_plan(path: &Path) -> bool {
    extension_of(path)
        .map(|ext| PLAN_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Validate a plan file exists, is a file, and has a supported type
pub fn validate_plan(path: &Path) -> Result<()> {
    if !is_supported_plan(path) {
        let extension = extension_of(path)
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();
        let allowed = PLAN_EXTENSIONS
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(Error::UnsupportedFileType { extension, allowed });
    }

    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }

    if !path.is_file() {
        return Err(Error::FileNotFound(format!(
            "{} is not a file",
            path.display()
        )));
    }

    Ok(())
}

/// File name shown in the BOQ, falling back to "upload"
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string()
}
