//! Utility functions for upload processing.
//!
//! ## Components
//!
//! - **Compression**: in-memory ZIP archive creation
//! - **Hashing**: SHA-256 of archive bytes for the upload report
//! - **Summary**: JSON report of an upload run
//!
//! ## Common Use Cases
//!
//! ### Archiving a Folder
//!
//! ```no_run
//! use comfy_uploader::models::CollectedFile;
//! use comfy_uploader::utils::compress::build_archive;
//!
//! # fn example() -> anyhow::Result<()> {
//! let files = vec![
//!     CollectedFile::new("x.png", vec![1u8, 2, 3]),
//!     CollectedFile::new("sub/y.png", vec![4u8, 5]),
//! ];
//! let archive = build_archive(&files)?;
//! println!("{} entries, sha256 {}", archive.entry_count(), archive.sha256());
//! # Ok(())
//! # }
//! ```

/// Upload report generation
pub mod summary;

/// ZIP archive creation
pub mod compress;

/// Cryptographic hash calculation utilities
pub mod hash;
