use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};
use walkdir::WalkDir;

use crate::constants::SELECTION_PREVIEW_COUNT;
use crate::error::{UploadError, UploadResult};
use crate::models::{CollectedFile, SelectedFile};

/// A folder picked through a folder-selection dialog.
///
/// Every file carries a browser-style relative path that starts with the
/// selected folder's own name. The folder name is taken from the first
/// file's path and that root segment is removed before archiving.
#[derive(Debug, Clone)]
pub struct SelectedFolder {
    name: String,
    files: Vec<SelectedFile>,
}

impl SelectedFolder {
    pub fn from_files(files: Vec<SelectedFile>) -> UploadResult<Self> {
        let first = files
            .first()
            .ok_or_else(|| UploadError::InvalidSelection("no files selected".to_string()))?;

        let name = derive_folder_name(&first.relative_path).ok_or_else(|| {
            UploadError::InvalidSelection(format!(
                "{} has no folder segment",
                first.relative_path
            ))
        })?;

        for file in &files {
            if derive_folder_name(&file.relative_path).as_deref() != Some(name.as_str()) {
                warn!("{} is outside selected folder {}", file.relative_path, name);
            }
        }

        debug!("Selected folder {} with {} files", name, files.len());
        Ok(SelectedFolder { name, files })
    }

    /// Build a selection from a local directory, producing the same relative
    /// paths a browser folder picker would
    pub fn from_local_dir(dir: &Path) -> Result<Self> {
        let root = dir
            .canonicalize()
            .context(format!("Failed to resolve {}", dir.display()))?;
        let root_name = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| anyhow::anyhow!("Cannot select {}", root.display()))?;

        let mut files = Vec::new();
        for entry in WalkDir::new(&root).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let rel = entry
                .path()
                .strip_prefix(&root)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .replace('\\', "/");

            match std::fs::read(entry.path()) {
                Ok(content) => files.push(SelectedFile::new(format!("{}/{}", root_name, rel), content)),
                Err(e) => warn!("Failed to read {}: {}", entry.path().display(), e),
            }
        }

        Ok(SelectedFolder::from_files(files)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    /// Files with the root segment stripped from their paths.
    ///
    /// A file sitting directly at the selection root with nothing left after
    /// stripping has no usable archive name and is dropped.
    pub fn into_collected(self) -> Vec<CollectedFile> {
        self.files
            .into_iter()
            .filter_map(|file| {
                let stripped = strip_root_segment(&file.relative_path);
                if stripped.is_empty() {
                    warn!("Dropping {}: empty path after removing folder name", file.relative_path);
                    None
                } else {
                    Some(CollectedFile {
                        relative_path: stripped,
                        content: file.content,
                    })
                }
            })
            .collect()
    }

    /// Short listing: folder name with count, the first `max` file names,
    /// then a count of the rest
    pub fn preview(&self, max: usize) -> Vec<String> {
        let mut lines = vec![format!("{} ({} files)", self.name, self.files.len())];
        lines.extend(self.files.iter().take(max).map(|f| format!("- {}", f.file_name())));
        if self.files.len() > max {
            lines.push(format!("... and {} more", self.files.len() - max));
        }
        lines
    }

    pub fn default_preview(&self) -> Vec<String> {
        self.preview(SELECTION_PREVIEW_COUNT)
    }
}

/// First segment of a browser-style relative path
pub fn derive_folder_name(relative_path: &str) -> Option<String> {
    let normalized = relative_path.replace('\\', "/");
    let mut segments = normalized.split('/').filter(|s| !s.is_empty());
    let first = segments.next()?;
    // A bare file name has no folder segment
    segments.next()?;
    Some(first.to_string())
}

/// Remove the first segment of a relative path
pub fn strip_root_segment(relative_path: &str) -> String {
    let normalized = relative_path.replace('\\', "/");
    let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
    segments.iter().skip(1).copied().collect::<Vec<_>>().join("/")
}
