use std::collections::VecDeque;

use anyhow::{anyhow, bail, Result};
use bytes::Bytes;

use crate::collectors::entry::{DirectoryEntry, EntryBatches, EntryNode, FileEntry};

/// A file held in memory. A file without content fails when read.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    content: Option<Bytes>,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        MemoryFile {
            name: name.into(),
            content: Some(content.into()),
        }
    }

    pub fn unreadable(name: impl Into<String>) -> Self {
        MemoryFile {
            name: name.into(),
            content: None,
        }
    }
}

#[async_trait::async_trait]
impl FileEntry for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&self) -> Result<Bytes> {
        self.content
            .clone()
            .ok_or_else(|| anyhow!("{} is not readable", self.name))
    }
}

#[derive(Debug, Clone)]
enum MemoryNode {
    File(MemoryFile),
    Directory(MemoryDirectory),
}

impl MemoryNode {
    fn to_entry(&self) -> EntryNode {
        match self {
            MemoryNode::File(file) => EntryNode::file(file.clone()),
            MemoryNode::Directory(dir) => EntryNode::directory(dir.clone()),
        }
    }
}

/// An in-memory directory tree.
///
/// Children are listed in insertion order, `batch_size` at a time. Open and
/// batch failures can be injected to exercise partial-failure handling.
#[derive(Debug, Clone)]
pub struct MemoryDirectory {
    name: String,
    children: Vec<MemoryNode>,
    batch_size: usize,
    fail_open: bool,
    fail_after_batches: Option<usize>,
}

impl MemoryDirectory {
    pub fn new(name: impl Into<String>) -> Self {
        MemoryDirectory {
            name: name.into(),
            children: Vec::new(),
            batch_size: usize::MAX,
            fail_open: false,
            fail_after_batches: None,
        }
    }

    /// Build a tree from `/`-separated paths
    pub fn from_paths<P, C>(name: impl Into<String>, files: impl IntoIterator<Item = (P, C)>) -> Result<Self>
    where
        P: AsRef<str>,
        C: Into<Bytes>,
    {
        let mut root = MemoryDirectory::new(name);
        for (path, content) in files {
            let segments: Vec<&str> = path.as_ref().split('/').collect();
            if segments.iter().any(|s| s.is_empty()) {
                bail!("Invalid path: {}", path.as_ref());
            }
            root.insert(&segments, content.into())?;
        }
        Ok(root)
    }

    fn insert(&mut self, segments: &[&str], content: Bytes) -> Result<()> {
        match segments {
            [] => bail!("Empty path"),
            [file_name] => {
                if self.children.iter().any(|c| node_name(c) == *file_name) {
                    bail!("Duplicate entry: {}", file_name);
                }
                self.children.push(MemoryNode::File(MemoryFile::new(*file_name, content)));
                Ok(())
            }
            [dir_name, rest @ ..] => {
                let existing = self.children.iter_mut().find_map(|c| match c {
                    MemoryNode::Directory(d) if d.name == *dir_name => Some(d),
                    _ => None,
                });
                match existing {
                    Some(dir) => dir.insert(rest, content),
                    None => {
                        if self.children.iter().any(|c| node_name(c) == *dir_name) {
                            bail!("{} is a file", dir_name);
                        }
                        let mut dir = MemoryDirectory::new(*dir_name);
                        dir.insert(rest, content)?;
                        self.children.push(MemoryNode::Directory(dir));
                        Ok(())
                    }
                }
            }
        }
    }

    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        self.children.push(MemoryNode::File(MemoryFile::new(name, content)));
        self
    }

    pub fn with_unreadable_file(mut self, name: impl Into<String>) -> Self {
        self.children.push(MemoryNode::File(MemoryFile::unreadable(name)));
        self
    }

    pub fn with_dir(mut self, dir: MemoryDirectory) -> Self {
        self.children.push(MemoryNode::Directory(dir));
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Apply a batch size to this directory and every descendant
    pub fn with_batch_size_recursive(mut self, batch_size: usize) -> Self {
        self.set_batch_size_recursive(batch_size.max(1));
        self
    }

    fn set_batch_size_recursive(&mut self, batch_size: usize) {
        self.batch_size = batch_size;
        for child in &mut self.children {
            if let MemoryNode::Directory(dir) = child {
                dir.set_batch_size_recursive(batch_size);
            }
        }
    }

    /// Make `open` fail
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Make the batch request after `batches` successful ones fail
    pub fn failing_after_batches(mut self, batches: usize) -> Self {
        self.fail_after_batches = Some(batches);
        self
    }
}

fn node_name(node: &MemoryNode) -> &str {
    match node {
        MemoryNode::File(f) => &f.name,
        MemoryNode::Directory(d) => &d.name,
    }
}

#[async_trait::async_trait]
impl DirectoryEntry for MemoryDirectory {
    fn name(&self) -> &str {
        &self.name
    }

    async fn open(&self) -> Result<Box<dyn EntryBatches>> {
        if self.fail_open {
            bail!("Cannot open directory {}", self.name);
        }

        Ok(Box::new(MemoryBatches {
            pending: self.children.iter().map(MemoryNode::to_entry).collect(),
            batch_size: self.batch_size,
            served: 0,
            fail_after: self.fail_after_batches,
        }))
    }
}

struct MemoryBatches {
    pending: VecDeque<EntryNode>,
    batch_size: usize,
    served: usize,
    fail_after: Option<usize>,
}

#[async_trait::async_trait]
impl EntryBatches for MemoryBatches {
    async fn next_batch(&mut self) -> Result<Vec<EntryNode>> {
        if self.fail_after == Some(self.served) {
            bail!("Batch {} unavailable", self.served);
        }
        self.served += 1;

        let count = self.batch_size.min(self.pending.len());
        Ok(self.pending.drain(..count).collect())
    }
}
