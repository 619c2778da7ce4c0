//! Integration tests for turning folders into upload archives.

mod common;

use std::fs;

use anyhow::Result;
use tempfile::TempDir;

use comfy_uploader::collectors::{DirectoryWalker, MemoryDirectory, SelectedFolder};
use comfy_uploader::collectors::selection::derive_folder_name;
use comfy_uploader::models::CollectedFile;
use comfy_uploader::utils::compress::{build_archive, ArchiveBuilder, Archiver};

use common::read_archive;

/// Walked paths and bytes come back out of the archive unchanged
#[tokio::test]
async fn test_walk_then_archive_round_trip() -> Result<()> {
    let tree = MemoryDirectory::new("photos")
        .with_file("x.png", vec![0x89, b'P', b'N', b'G', 0, 1, 2])
        .with_dir(
            MemoryDirectory::new("sub")
                .with_file("y.png", "yy")
                .with_dir(MemoryDirectory::new("deeper").with_file("notes.txt", "hello")),
        );

    let files = DirectoryWalker::new().walk(&tree, "").await?;
    let archive = ArchiveBuilder::new().build(&files).await?;

    assert_eq!(archive.entry_count(), 3);
    let entries = read_archive(&archive);
    let expected: Vec<(String, Vec<u8>)> = files
        .iter()
        .map(|f| (f.relative_path.clone(), f.content.to_vec()))
        .collect();
    assert_eq!(entries, expected);
    Ok(())
}

#[test]
fn test_archive_is_deterministic() -> Result<()> {
    let files = vec![
        CollectedFile::new("a.png", vec![1u8; 2048]),
        CollectedFile::new("b/c.txt", "text".repeat(100)),
    ];

    let first = build_archive(&files)?;
    let second = build_archive(&files)?;
    assert_eq!(first.bytes(), second.bytes());
    assert_eq!(first.sha256(), second.sha256());
    Ok(())
}

#[test]
fn test_empty_and_duplicate_paths_are_skipped() -> Result<()> {
    let files = vec![
        CollectedFile::new("", "orphan"),
        CollectedFile::new("a.png", "first"),
        CollectedFile::new("a.png", "second"),
    ];

    let archive = build_archive(&files)?;
    assert_eq!(read_archive(&archive), vec![("a.png".to_string(), b"first".to_vec())]);
    Ok(())
}

/// A folder picked from disk archives without its own name as prefix
#[tokio::test]
async fn test_selected_local_folder_archive() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path().join("photos");
    fs::create_dir_all(root.join("sub"))?;
    fs::write(root.join("x.png"), b"x")?;
    fs::write(root.join("sub").join("y.png"), b"y")?;

    let folder = SelectedFolder::from_local_dir(&root)?;
    assert_eq!(folder.name(), "photos");
    assert_eq!(derive_folder_name(&folder.files()[0].relative_path).as_deref(), Some("photos"));

    let archive = ArchiveBuilder::new().build(&folder.into_collected()).await?;
    let names: Vec<String> = read_archive(&archive).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["sub/y.png", "x.png"]);
    Ok(())
}
