//! File collection for folder uploads.
//!
//! This module turns whatever the user hands over (dropped entries or a
//! selected folder) into a flat list of [`CollectedFile`](crate::models::CollectedFile)
//! values keyed by their path relative to the top-level folder.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │      Entry sources (entry.rs traits)      │
//! │   ┌──────────────┬──────────────────┐     │
//! │   │ local (disk) │ memory (tests)   │     │
//! │   └──────────────┴──────────────────┘     │
//! ├──────────────────────────────────────────┤
//! │  DirectoryWalker          SelectedFolder  │
//! │  (batched, recursive)     (flat listing)  │
//! ├──────────────────────────────────────────┤
//! │          Vec<CollectedFile>               │
//! └──────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use comfy_uploader::collectors::{local_entry, DirectoryWalker, EntryNode};
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let entry = local_entry(Path::new("/home/user/photos")).await?;
//! if let EntryNode::Directory(dir) = entry {
//!     let files = DirectoryWalker::new().walk(dir.as_ref(), "").await?;
//!     println!("Collected {} files", files.len());
//! }
//! # Ok(())
//! # }
//! ```

/// Entry traits shared by every source
pub mod entry;

/// Entries backed by the local file system
pub mod local;

/// In-memory entries
pub mod memory;

/// Recursive, batch-aware directory walking
pub mod walker;

/// Folder selection as a flat list of files
pub mod selection;

pub use entry::{DirectoryEntry, EntryBatches, EntryNode, FileEntry};
pub use local::{local_entry, local_entry_with_batch_size, LocalDirectory, LocalFile};
pub use memory::{MemoryDirectory, MemoryFile};
pub use selection::SelectedFolder;
pub use walker::DirectoryWalker;
