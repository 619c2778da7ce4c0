use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use log::{debug, warn};

use crate::collectors::entry::{DirectoryEntry, EntryBatches, EntryNode, FileEntry};
use crate::constants::LOCAL_ENTRY_BATCH_SIZE;

/// A file on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalFile {
    name: String,
    path: PathBuf,
}

impl LocalFile {
    pub fn new(path: &Path) -> Result<Self> {
        Ok(LocalFile {
            name: entry_name(path)?,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl FileEntry for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> Result<Bytes> {
        let data = tokio::fs::read(&self.path)
            .await
            .context(format!("Failed to read {}", self.path.display()))?;
        Ok(Bytes::from(data))
    }
}

/// A directory on the local filesystem.
///
/// Children are sorted by name and handed out `batch_size` at a time so that
/// repeated walks of an unchanged tree produce the same order. Symlinks are
/// followed, except a directory that resolves to itself or one of its
/// ancestors, which is skipped.
#[derive(Debug, Clone)]
pub struct LocalDirectory {
    name: String,
    path: PathBuf,
    batch_size: usize,
    /// Canonical paths of the directories above this one
    ancestors: Vec<PathBuf>,
}

impl LocalDirectory {
    pub fn new(path: &Path) -> Result<Self> {
        Ok(LocalDirectory {
            name: entry_name(path)?,
            path: path.to_path_buf(),
            batch_size: LOCAL_ENTRY_BATCH_SIZE,
            ancestors: Vec::new(),
        })
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn child(&self, name: String, path: PathBuf, ancestors: Vec<PathBuf>) -> LocalDirectory {
        LocalDirectory {
            name,
            path,
            batch_size: self.batch_size,
            ancestors,
        }
    }
}

#[async_trait::async_trait]
impl DirectoryEntry for LocalDirectory {
    fn name(&self) -> &str {
        &self.name
    }

    async fn open(&self) -> Result<Box<dyn EntryBatches>> {
        let read_dir = tokio::fs::read_dir(&self.path)
            .await
            .context(format!("Failed to read directory: {}", self.path.display()))?;

        let canonical = tokio::fs::canonicalize(&self.path)
            .await
            .context(format!("Failed to resolve directory: {}", self.path.display()))?;
        let mut chain = self.ancestors.clone();
        chain.push(canonical);

        Ok(Box::new(LocalBatches {
            parent: self.clone(),
            chain,
            read_dir: Some(read_dir),
            pending: VecDeque::new(),
        }))
    }
}

struct LocalBatches {
    parent: LocalDirectory,
    /// Canonical paths from the walk root down to `parent`
    chain: Vec<PathBuf>,
    read_dir: Option<tokio::fs::ReadDir>,
    pending: VecDeque<EntryNode>,
}

impl LocalBatches {
    async fn load(&mut self, mut read_dir: tokio::fs::ReadDir) -> Result<()> {
        let mut children = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .context(format!("Failed to read directory entry in {}", self.parent.path.display()))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            let path = entry.path();

            // Follow symlinks; entries whose metadata can't be read are
            // treated as files so the failure surfaces at read time
            let is_dir = match tokio::fs::metadata(&path).await {
                Ok(metadata) => metadata.is_dir(),
                Err(e) => {
                    debug!("Failed to stat {}: {}", path.display(), e);
                    false
                }
            };
            children.push((name, path, is_dir));
        }

        children.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, path, is_dir) in children {
            let node = if is_dir {
                if let Ok(target) = tokio::fs::canonicalize(&path).await {
                    if self.chain.contains(&target) {
                        warn!("Skipping {}: links back to {}", path.display(), target.display());
                        continue;
                    }
                }
                EntryNode::directory(self.parent.child(name, path, self.chain.clone()))
            } else {
                EntryNode::file(LocalFile { name, path })
            };
            self.pending.push_back(node);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl EntryBatches for LocalBatches {
    async fn next_batch(&mut self) -> Result<Vec<EntryNode>> {
        if let Some(read_dir) = self.read_dir.take() {
            self.load(read_dir).await?;
        }

        let count = self.parent.batch_size.min(self.pending.len());
        Ok(self.pending.drain(..count).collect())
    }
}

/// Turn a user-supplied path into a top-level entry
pub async fn local_entry(path: &Path) -> Result<EntryNode> {
    local_entry_with_batch_size(path, LOCAL_ENTRY_BATCH_SIZE).await
}

/// Like [`local_entry`], with directories listing `batch_size` children per batch
pub async fn local_entry_with_batch_size(path: &Path, batch_size: usize) -> Result<EntryNode> {
    let metadata = tokio::fs::metadata(path)
        .await
        .context(format!("Failed to access {}", path.display()))?;

    // Canonicalize so paths like "." still have a usable name
    let resolved = tokio::fs::canonicalize(path)
        .await
        .unwrap_or_else(|_| path.to_path_buf());

    if metadata.is_dir() {
        Ok(EntryNode::directory(LocalDirectory::new(&resolved)?.with_batch_size(batch_size)))
    } else {
        Ok(EntryNode::file(LocalFile::new(&resolved)?))
    }
}

fn entry_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| anyhow!("Path has no final component: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_local_batches_split_and_sorted() -> Result<()> {
        let temp_dir = TempDir::new()?;
        for name in ["c.png", "a.png", "b.png"] {
            fs::write(temp_dir.path().join(name), name)?;
        }
        fs::create_dir(temp_dir.path().join("sub"))?;

        let dir = LocalDirectory::new(temp_dir.path())?.with_batch_size(2);
        let mut batches = dir.open().await?;

        let first = batches.next_batch().await?;
        let second = batches.next_batch().await?;
        let third = batches.next_batch().await?;

        let names: Vec<_> = first.iter().chain(second.iter()).map(|e| e.name().to_string()).collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.png", "sub"]);
        assert!(second[1].is_directory());
        assert!(third.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_open_missing_directory_fails() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let dir = LocalDirectory::new(&temp_dir.path().join("missing"))?;
        assert!(dir.open().await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_local_entry_kinds() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("x.png");
        fs::write(&file_path, b"png")?;

        let file = local_entry(&file_path).await?;
        assert!(!file.is_directory());
        assert_eq!(file.name(), "x.png");

        let dir = local_entry(temp_dir.path()).await?;
        assert!(dir.is_directory());

        if let EntryNode::File(file) = file {
            assert_eq!(file.read().await?, Bytes::from_static(b"png"));
        }
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_cycles_are_skipped() -> Result<()> {
        use crate::collectors::walker::DirectoryWalker;
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().join("photos");
        fs::create_dir_all(root.join("sub"))?;
        fs::write(root.join("x.png"), b"x")?;
        fs::write(root.join("sub").join("y.png"), b"y")?;
        symlink(&root, root.join("loop"))?;
        symlink(&root, root.join("sub").join("up"))?;
        symlink(root.join("sub"), root.join("sub").join("self"))?;

        let dir = LocalDirectory::new(&root)?;
        let files = DirectoryWalker::new().walk(&dir, "").await?;

        let mut paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        paths.sort();
        assert_eq!(paths, vec!["sub/y.png", "x.png"]);
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_to_sibling_is_followed() -> Result<()> {
        use crate::collectors::walker::DirectoryWalker;
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().join("photos");
        let shared = temp_dir.path().join("shared");
        fs::create_dir_all(&root)?;
        fs::create_dir_all(&shared)?;
        fs::write(shared.join("z.png"), b"z")?;
        symlink(&shared, root.join("linked"))?;

        let files = DirectoryWalker::new().walk(&LocalDirectory::new(&root)?, "").await?;
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "linked/z.png");
        Ok(())
    }
}
