use std::collections::HashSet;

use bytes::Bytes;
use futures::future::{BoxFuture, FutureExt};
use log::{debug, warn};

use crate::collectors::entry::{is_valid_segment, join_relative, DirectoryEntry, EntryNode};
use crate::error::{UploadError, UploadResult};
use crate::models::{CollectedFile, WalkStats};

/// Directory walker that flattens a directory tree into `CollectedFile`s.
///
/// Failures below the root are isolated: an unreadable file or subtree is
/// logged and skipped while its siblings are still collected. Only a root
/// directory that cannot be opened fails the walk.
#[derive(Debug, Clone, Default)]
pub struct DirectoryWalker;

struct WalkState {
    files: Vec<CollectedFile>,
    seen: HashSet<String>,
    stats: WalkStats,
}

impl WalkState {
    fn push(&mut self, relative_path: String, content: Bytes) {
        if !self.seen.insert(relative_path.clone()) {
            warn!("Duplicate entry {} returned by provider, keeping the first", relative_path);
            self.stats.skipped_files += 1;
            return;
        }
        self.stats.files += 1;
        self.files.push(CollectedFile { relative_path, content });
    }
}

impl DirectoryWalker {
    pub fn new() -> Self {
        DirectoryWalker
    }

    /// Walk `root`, prefixing every collected path with `prefix` (may be empty)
    pub async fn walk(&self, root: &dyn DirectoryEntry, prefix: &str) -> UploadResult<Vec<CollectedFile>> {
        let (files, _) = self.walk_with_stats(root, prefix).await?;
        Ok(files)
    }

    /// Walk `root` and also return the walk counters
    pub async fn walk_with_stats(
        &self,
        root: &dyn DirectoryEntry,
        prefix: &str,
    ) -> UploadResult<(Vec<CollectedFile>, WalkStats)> {
        let mut state = WalkState {
            files: Vec::new(),
            seen: HashSet::new(),
            stats: WalkStats::default(),
        };

        self.walk_directory(root, prefix.trim_matches('/').to_string(), &mut state)
            .await?;

        debug!(
            "Walked {}: {} files, {} directories, {} files skipped, {} directories skipped",
            root.name(),
            state.stats.files,
            state.stats.directories,
            state.stats.skipped_files,
            state.stats.skipped_directories
        );

        Ok((state.files, state.stats))
    }

    /// Recursively walk a directory and collect its files
    fn walk_directory<'a>(
        &'a self,
        dir: &'a dyn DirectoryEntry,
        prefix: String,
        state: &'a mut WalkState,
    ) -> BoxFuture<'a, UploadResult<()>> {
        async move {
            let location = if prefix.is_empty() { dir.name().to_string() } else { prefix.clone() };

            let mut batches = dir
                .open()
                .await
                .map_err(|e| UploadError::enumeration(location.as_str(), e))?;

            // Keep requesting until the provider returns an empty batch
            loop {
                let batch = match batches.next_batch().await {
                    Ok(batch) => batch,
                    Err(e) => {
                        warn!("{}", UploadError::enumeration(location.as_str(), e));
                        break;
                    }
                };

                if batch.is_empty() {
                    break;
                }

                debug!("Found {} entries in {}", batch.len(), location);

                for child in batch {
                    if !is_valid_segment(child.name()) {
                        warn!("Skipping entry with unusable name {:?} in {}", child.name(), location);
                        match child {
                            EntryNode::File(_) => state.stats.skipped_files += 1,
                            EntryNode::Directory(_) => state.stats.skipped_directories += 1,
                        }
                        continue;
                    }

                    let path = join_relative(&prefix, child.name());

                    match child {
                        EntryNode::File(file) => match file.read().await {
                            Ok(content) => state.push(path, content),
                            Err(e) => {
                                warn!("{}", UploadError::file_read(path, e));
                                state.stats.skipped_files += 1;
                            }
                        },
                        EntryNode::Directory(sub) => {
                            match self.walk_directory(sub.as_ref(), path.clone(), state).await {
                                Ok(()) => state.stats.directories += 1,
                                Err(e) => {
                                    warn!("Skipping subtree {}: {}", path, e);
                                    state.stats.skipped_directories += 1;
                                }
                            }
                        }
                    }
                }
            }

            Ok(())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::memory::MemoryDirectory;

    fn paths(files: &[CollectedFile]) -> Vec<&str> {
        files.iter().map(|f| f.relative_path.as_str()).collect()
    }

    #[tokio::test]
    async fn test_walk_nested_tree() {
        let root = MemoryDirectory::new("photos")
            .with_file("x.png", "x")
            .with_dir(
                MemoryDirectory::new("sub")
                    .with_file("y.png", "y")
                    .with_dir(MemoryDirectory::new("deep").with_file("z.png", "z")),
            );

        let (files, stats) = DirectoryWalker::new().walk_with_stats(&root, "").await.unwrap();
        assert_eq!(paths(&files), vec!["x.png", "sub/y.png", "sub/deep/z.png"]);
        assert_eq!(files[2].content, Bytes::from_static(b"z"));
        assert_eq!(stats.files, 3);
        assert_eq!(stats.directories, 2);
    }

    #[tokio::test]
    async fn test_walk_with_prefix() {
        let root = MemoryDirectory::new("photos").with_file("x.png", "x");
        let files = DirectoryWalker::new().walk(&root, "base/").await.unwrap();
        assert_eq!(paths(&files), vec!["base/x.png"]);
    }

    #[tokio::test]
    async fn test_unreadable_file_is_skipped() {
        let root = MemoryDirectory::new("photos")
            .with_file("a.png", "a")
            .with_unreadable_file("broken.png")
            .with_file("b.png", "b");

        let (files, stats) = DirectoryWalker::new().walk_with_stats(&root, "").await.unwrap();
        assert_eq!(paths(&files), vec!["a.png", "b.png"]);
        assert_eq!(stats.skipped_files, 1);
    }

    #[tokio::test]
    async fn test_root_open_failure_fails_walk() {
        let root = MemoryDirectory::new("photos").with_file("a.png", "a").failing_open();
        let err = DirectoryWalker::new().walk(&root, "").await.unwrap_err();
        assert!(matches!(err, UploadError::EnumerationFailure { ref path, .. } if path == "photos"));
    }

    #[tokio::test]
    async fn test_later_batch_failure_keeps_earlier_entries() {
        let root = MemoryDirectory::new("photos")
            .with_file("a.png", "a")
            .with_file("b.png", "b")
            .with_file("c.png", "c")
            .with_batch_size(2)
            .failing_after_batches(1);

        let files = DirectoryWalker::new().walk(&root, "").await.unwrap();
        assert_eq!(paths(&files), vec!["a.png", "b.png"]);
    }

    #[tokio::test]
    async fn test_invalid_names_are_skipped() {
        let root = MemoryDirectory::new("photos")
            .with_file("", "empty")
            .with_file("a/b.png", "slash")
            .with_file("ok.png", "ok");

        let (files, stats) = DirectoryWalker::new().walk_with_stats(&root, "").await.unwrap();
        assert_eq!(paths(&files), vec!["ok.png"]);
        assert_eq!(stats.skipped_files, 2);
    }

    #[tokio::test]
    async fn test_duplicate_paths_keep_first() {
        let root = MemoryDirectory::new("photos")
            .with_file("a.png", "first")
            .with_file("a.png", "second");

        let files = DirectoryWalker::new().walk(&root, "").await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].content, Bytes::from_static(b"first"));
    }

    #[tokio::test]
    async fn test_empty_directory_yields_nothing() {
        let root = MemoryDirectory::new("empty").with_dir(MemoryDirectory::new("also-empty"));
        let files = DirectoryWalker::new().walk(&root, "").await.unwrap();
        assert!(files.is_empty());
    }
}
