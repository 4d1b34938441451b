use jwalk::WalkDir;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::FileInfo;

/// Scans the source path and collects file information.
///
/// Returns the files sorted by relative path with their global stream
/// offsets assigned, plus the total content size. Probe-time failures
/// (missing or unreadable source) surface as [`Error::InvalidInput`].
pub fn scan_files(source: &Path, output_file: Option<&Path>) -> Result<(Vec<FileInfo>, u64)> {
    let source = source
        .canonicalize()
        .map_err(|e| Error::invalid_input(format!("{}: {}", source.display(), e)))?;

    let output_canonical = output_file.and_then(|p| p.canonicalize().ok());

    let mut files = Vec::new();
    let mut total_size = 0u64;

    if source.is_file() {
        let metadata = source
            .metadata()
            .map_err(|e| Error::invalid_input(format!("{}: {}", source.display(), e)))?;
        let len = metadata.len();

        files.push(FileInfo {
            path: source
                .file_name()
                .ok_or_else(|| Error::invalid_input("source has no file name"))?
                .into(),
            full_path: source.clone(),
            len,
            start_offset: 0,
        });
        total_size = len;
    } else {
        for entry in WalkDir::new(&source) {
            let entry =
                entry.map_err(|e| Error::invalid_input(format!("{}: {}", source.display(), e)))?;
            if entry.file_type().is_dir() {
                continue;
            }
            let entry_path = entry.path();

            // Skip the output artifact if it sits inside the source directory
            if let Some(ref output) = output_canonical {
                if entry_path == output.as_path() {
                    continue;
                }
            }

            // `source` was canonicalized above, so jwalk yields absolute paths
            let relative_path = entry_path
                .strip_prefix(&source)
                .map_err(|e| Error::invalid_input(format!("{}: {}", entry_path.display(), e)))?;

            let metadata = entry
                .metadata()
                .map_err(|e| Error::invalid_input(format!("{}: {}", entry_path.display(), e)))?;
            let len = metadata.len();

            files.push(FileInfo {
                path: relative_path.to_path_buf(),
                full_path: entry_path.to_path_buf(),
                len,
                start_offset: 0,
            });
            total_size += len;
        }
    }

    // Sort by path for a stable piece stream, then assign offsets
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let mut current_offset = 0u64;
    for file in &mut files {
        file.start_offset = current_offset;
        current_offset += file.len;
    }

    Ok((files, total_size))
}
