//! Directory expansion for front ends that accept folders.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively collect shreddable files under `root`.
///
/// Returns regular files that are not read-only, sorted by path.
/// Unreadable entries are skipped; symlinks are not followed.
pub fn collect_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::NotFound(root.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .metadata()
                .map(|m| !m.permissions().readonly())
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    Ok(files)
}

/// Expand a mix of file and directory arguments into a flat file list.
///
/// Files (and paths that do not exist) pass through unchanged so the shredder
/// can report them; directories are expanded when `recursive` is set and
/// otherwise passed through as well.
pub fn expand_paths(inputs: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::with_capacity(inputs.len());
    for input in inputs {
        if recursive && input.is_dir() {
            files.extend(collect_files(input)?);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}
