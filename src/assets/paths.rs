use std::path::{Path, PathBuf};

use crate::foundation::error::{GongjuError, GongjuResult};

/// Canonical `/`-separated form of a job-relative path.
///
/// Backslashes count as separators and `.` segments are dropped. Absolute paths, drive prefixes
/// and `..` segments are rejected so inputs cannot leave the job directory.
pub fn normalize_rel_path(source: &str) -> GongjuResult<String> {
    let unified = source.replace('\\', "/");
    if is_absolute(&unified) {
        return Err(GongjuError::validation(format!(
            "path '{source}' must be relative to the job file"
        )));
    }
    let segments = unified
        .split('/')
        .filter(|seg| !matches!(*seg, "" | "."))
        .map(|seg| match seg {
            ".." => Err(GongjuError::validation(format!(
                "path '{source}' must stay inside the job directory"
            ))),
            seg => Ok(seg),
        })
        .collect::<GongjuResult<Vec<_>>>()?;
    if segments.is_empty() {
        return Err(GongjuError::validation(format!("path '{source}' names no file")));
    }
    Ok(segments.join("/"))
}

/// Join a validated relative path onto `root`.
pub fn resolve_under(root: &Path, source: &str) -> GongjuResult<PathBuf> {
    Ok(root.join(normalize_rel_path(source)?))
}

fn is_absolute(path: &str) -> bool {
    let drive_prefixed = matches!(path.as_bytes(), [d, b':', ..] if d.is_ascii_alphabetic());
    path.starts_with('/') || drive_prefixed
}
