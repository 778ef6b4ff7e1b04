//! Writing rendered artifacts to disk.

use crate::result::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes `text` to `path` through a sibling temporary file and a rename, so
/// `path` either keeps its old content or holds the complete new artifact.
pub fn write_artifact(path: &Path, text: &str) -> Result<()> {
    write_artifacts(&[(path, text)])
}

/// Writes several artifacts as one unit.
///
/// Every file is staged next to its destination before any destination is
/// touched. If staging fails nothing is replaced; if a rename fails the
/// artifacts already moved into place are removed again.
pub fn write_artifacts(files: &[(&Path, &str)]) -> Result<()> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(files.len());
    for (slot, &(path, text)) in files.iter().enumerate() {
        let staging = staging_path(path, slot);
        if let Err(err) = fs::write(&staging, text) {
            let _ = fs::remove_file(&staging);
            discard(staged.iter().map(|(staging, _)| staging.as_path()));
            return Err(err.into());
        }
        staged.push((staging, path));
    }

    for (done, (staging, path)) in staged.iter().enumerate() {
        if let Err(err) = fs::rename(staging, path) {
            discard(staged[..done].iter().map(|&(_, path)| path));
            discard(staged[done..].iter().map(|(staging, _)| staging.as_path()));
            return Err(err.into());
        }
    }

    for &(path, text) in files {
        debug!(path = %path.display(), bytes = text.len(), "wrote artifact");
    }
    Ok(())
}

fn discard<'a>(paths: impl Iterator<Item = &'a Path>) {
    for path in paths {
        let _ = fs::remove_file(path);
    }
}

fn staging_path(path: &Path, slot: usize) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    path.with_file_name(format!(".{name}.{}.{slot}.tmp", std::process::id()))
}
