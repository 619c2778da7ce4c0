use anyhow::Result;
use bytes::Bytes;

/// A file handle whose content is read lazily
#[async_trait::async_trait]
pub trait FileEntry: Send + Sync {
    fn name(&self) -> &str;
    async fn read(&self) -> Result<Bytes>;
}

/// A directory handle whose children are listed in batches
#[async_trait::async_trait]
pub trait DirectoryEntry: Send + Sync {
    fn name(&self) -> &str;

    /// Start enumerating children
    async fn open(&self) -> Result<Box<dyn EntryBatches>>;
}

/// Paginated listing of a directory's children.
///
/// Entries come back in provider order and may be split across any number of
/// batches. An empty batch means the listing is exhausted.
#[async_trait::async_trait]
pub trait EntryBatches: Send {
    async fn next_batch(&mut self) -> Result<Vec<EntryNode>>;
}

/// A file or directory found during enumeration or handed in by the user
pub enum EntryNode {
    File(Box<dyn FileEntry>),
    Directory(Box<dyn DirectoryEntry>),
}

impl EntryNode {
    pub fn file(entry: impl FileEntry + 'static) -> Self {
        EntryNode::File(Box::new(entry))
    }

    pub fn directory(entry: impl DirectoryEntry + 'static) -> Self {
        EntryNode::Directory(Box::new(entry))
    }

    pub fn name(&self) -> &str {
        match self {
            EntryNode::File(file) => file.name(),
            EntryNode::Directory(dir) => dir.name(),
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, EntryNode::Directory(_))
    }
}

impl std::fmt::Debug for EntryNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryNode::File(file) => write!(f, "File({})", file.name()),
            EntryNode::Directory(dir) => write!(f, "Directory({})", dir.name()),
        }
    }
}

/// Join a walk prefix and an entry name with `/`
pub fn join_relative(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

/// Whether a name can be used as a single path segment
pub fn is_valid_segment(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}
