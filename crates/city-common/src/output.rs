//! Atomic JSON output.
//!
//! Documents are serialized in full before anything touches the
//! destination, then written to a temporary file in the same directory and
//! renamed over the target. A failed run therefore leaves either the previous
//! file or nothing, never a truncated document.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{CommonError, CommonResult};

/// Layout of the written JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// Single line, no extra whitespace
    #[default]
    Compact,
    /// Two-space indentation
    Pretty,
}

/// Serialize `value` as UTF-8 JSON and atomically replace `path` with it.
///
/// Non-ASCII text is written as-is rather than `\u` escaped.
pub fn write_json_atomic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    style: JsonStyle,
) -> CommonResult<u64> {
    let bytes = match style {
        JsonStyle::Compact => serde_json::to_vec(value)?,
        JsonStyle::Pretty => serde_json::to_vec_pretty(value)?,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.is_dir() {
        return Err(CommonError::MissingOutputDir(dir.to_path_buf()));
    }

    let write_err = |source| CommonError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    debug!(temp = %temp.path().display(), "Writing JSON to temporary file");
    temp.write_all(&bytes).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;
    temp.persist(path).map_err(|e| write_err(e.error))?;

    info!(path = %path.display(), bytes = bytes.len(), "Saved JSON output");
    Ok(bytes.len() as u64)
}
