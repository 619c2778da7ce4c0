use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::time::Instant;

use bytes::Bytes;
use log::{debug, info, warn};
use zip::{write::FileOptions, CompressionMethod, DateTime, ZipWriter};

use crate::constants::{
    COMPRESSED_EXTENSIONS,
    DEFAULT_COMPRESSION_LEVEL,
    FAST_COMPRESSION_LEVEL,
    LARGE_FILE_COMPRESSION_THRESHOLD,
    MAX_ARCHIVE_ENTRY_SIZE,
};
use crate::error::{UploadError, UploadResult};
use crate::models::CollectedFile;
use crate::utils::hash::sha256_hex;

/// A finished ZIP archive held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveBlob {
    bytes: Bytes,
    entry_count: usize,
}

impl ArchiveBlob {
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of file entries written
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn sha256(&self) -> String {
        sha256_hex(&self.bytes)
    }

    pub fn size_mb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0 / 1024.0
    }
}

/// Choose ZIP options for an entry.
///
/// Already-compressed formats (JPEG, PNG, archives) and very large entries
/// use the fastest deflate level. Every entry gets the fixed ZIP epoch as its
/// timestamp so identical input always produces identical bytes.
pub fn compression_options(name: &str, size: u64) -> FileOptions {
    let low_compression = match name.rsplit_once('.') {
        Some((_, ext)) => COMPRESSED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    };

    let level = if low_compression || size > LARGE_FILE_COMPRESSION_THRESHOLD {
        FAST_COMPRESSION_LEVEL
    } else {
        DEFAULT_COMPRESSION_LEVEL
    };

    FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(level))
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644)
}

/// Turns a folder's collected files into one archive
#[async_trait::async_trait]
pub trait Archiver: Send + Sync {
    async fn build(&self, files: &[CollectedFile]) -> UploadResult<ArchiveBlob>;
}

/// Packs collected files into a single ZIP archive.
///
/// Building is all-or-nothing: the first write error aborts the archive.
#[derive(Debug, Clone, Default)]
pub struct ArchiveBuilder;

impl ArchiveBuilder {
    pub fn new() -> Self {
        ArchiveBuilder
    }
}

#[async_trait::async_trait]
impl Archiver for ArchiveBuilder {
    /// Build the archive on the blocking pool
    async fn build(&self, files: &[CollectedFile]) -> UploadResult<ArchiveBlob> {
        let files = files.to_vec();
        tokio::task::spawn_blocking(move || build_archive(&files))
            .await
            .map_err(|e| UploadError::ArchiveBuildFailure(format!("compression task failed: {}", e)))?
    }
}

/// Write every file with a non-empty path as one entry named by that path
pub fn build_archive(files: &[CollectedFile]) -> UploadResult<ArchiveBlob> {
    let start = Instant::now();
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let mut names = HashSet::new();
    let mut entry_count = 0;

    for file in files {
        if file.relative_path.is_empty() {
            warn!("Skipping file with empty archive path ({} bytes)", file.content.len());
            continue;
        }
        if !names.insert(file.relative_path.as_str()) {
            warn!("Skipping duplicate archive entry {}", file.relative_path);
            continue;
        }
        if file.size() > MAX_ARCHIVE_ENTRY_SIZE {
            warn!(
                "{} is {} bytes; the server rejects archives with entries over {} bytes",
                file.relative_path,
                file.size(),
                MAX_ARCHIVE_ENTRY_SIZE
            );
        }

        let options = compression_options(&file.relative_path, file.size());
        zip.start_file(file.relative_path.as_str(), options)?;
        zip.write_all(&file.content)
            .map_err(|e| UploadError::ArchiveBuildFailure(format!("failed to write {}: {}", file.relative_path, e)))?;
        entry_count += 1;

        debug!("Added {} ({} bytes) to archive", file.relative_path, file.content.len());
    }

    let cursor = zip.finish()?;
    let blob = ArchiveBlob {
        bytes: Bytes::from(cursor.into_inner()),
        entry_count,
    };

    info!(
        "Built archive with {} entries ({:.2} MB) in {:?}",
        blob.entry_count,
        blob.size_mb(),
        start.elapsed()
    );
    Ok(blob)
}
