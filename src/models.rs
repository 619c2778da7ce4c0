use bytes::Bytes;
use serde::{Serialize, Deserialize};

/// A file gathered by a walk, keyed by its path below the walked folder.
///
/// `relative_path` is `/`-separated and never starts or ends with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedFile {
    pub relative_path: String,
    pub content: Bytes,
}

impl CollectedFile {
    pub fn new(relative_path: impl Into<String>, content: impl Into<Bytes>) -> Self {
        CollectedFile {
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// A file from a folder selection, with the root folder name still in its path
/// (`photos/sub/x.png`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub relative_path: String,
    pub content: Bytes,
}

impl SelectedFile {
    pub fn new(relative_path: impl Into<String>, content: impl Into<Bytes>) -> Self {
        SelectedFile {
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }

    /// Last path segment
    pub fn file_name(&self) -> &str {
        self.relative_path
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(&self.relative_path)
    }
}

/// A named blob for the direct multi-file upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBlob {
    pub name: String,
    pub content: Bytes,
}

impl NamedBlob {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        NamedBlob {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Counters for one walk
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub files: usize,
    pub directories: usize,
    pub skipped_files: usize,
    pub skipped_directories: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_file_name() {
        assert_eq!(SelectedFile::new("a/sub/c.png", "x").file_name(), "c.png");
        assert_eq!(SelectedFile::new("c.png", "x").file_name(), "c.png");
        assert_eq!(SelectedFile::new("a\\c.png", "x").file_name(), "c.png");
    }

    #[test]
    fn test_collected_file_size() {
        let file = CollectedFile::new("x.png", vec![0u8; 12]);
        assert_eq!(file.size(), 12);
    }
}
