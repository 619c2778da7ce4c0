//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::io::{Cursor, Read};
use std::sync::Mutex;

use comfy_uploader::cloud::transport::{
    DirectoryListing, FolderUploadResponse, ImagesUploadResponse, UploadTransport,
};
use comfy_uploader::error::{UploadError, UploadResult};
use comfy_uploader::models::{CollectedFile, NamedBlob};
use comfy_uploader::utils::compress::{ArchiveBlob, ArchiveBuilder, Archiver};

/// One folder upload as seen by the transport
#[derive(Debug, Clone)]
pub struct FolderCall {
    pub folder_name: String,
    pub parent_dir: Option<String>,
    pub entries: Vec<(String, Vec<u8>)>,
}

/// One direct image upload as seen by the transport
#[derive(Debug, Clone)]
pub struct ImagesCall {
    pub target_dir: String,
    pub names: Vec<String>,
}

/// Transport that records every call and answers with canned responses
#[derive(Default)]
pub struct RecordingTransport {
    folders: Mutex<Vec<FolderCall>>,
    images: Mutex<Vec<ImagesCall>>,
    failing_folders: HashSet<String>,
    rejecting_folders: HashSet<String>,
    fail_images: bool,
    directories: Vec<String>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer uploads of `name` with an HTTP 500
    pub fn failing_folder(mut self, name: &str) -> Self {
        self.failing_folders.insert(name.to_string());
        self
    }

    /// Answer uploads of `name` with `success: false`
    pub fn rejecting_folder(mut self, name: &str) -> Self {
        self.rejecting_folders.insert(name.to_string());
        self
    }

    pub fn failing_images(mut self) -> Self {
        self.fail_images = true;
        self
    }

    pub fn with_directories(mut self, dirs: &[&str]) -> Self {
        self.directories = dirs.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn folder_calls(&self) -> Vec<FolderCall> {
        self.folders.lock().unwrap().clone()
    }

    pub fn image_calls(&self) -> Vec<ImagesCall> {
        self.images.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl UploadTransport for RecordingTransport {
    async fn list_directories(&self) -> UploadResult<DirectoryListing> {
        Ok(DirectoryListing {
            directories: self.directories.clone(),
            count: self.directories.len(),
            input_dir: "/srv/comfy/input".to_string(),
        })
    }

    async fn upload_images(&self, target_dir: &str, files: Vec<NamedBlob>) -> UploadResult<ImagesUploadResponse> {
        self.images.lock().unwrap().push(ImagesCall {
            target_dir: target_dir.to_string(),
            names: files.iter().map(|f| f.name.clone()).collect(),
        });

        if self.fail_images {
            return Err(UploadError::TransportFailure {
                status: Some(500),
                body: "disk full".to_string(),
            });
        }

        Ok(ImagesUploadResponse {
            success: Some(true),
            uploaded_files: files.iter().map(|f| f.name.clone()).collect(),
            ..Default::default()
        })
    }

    async fn upload_folder(
        &self,
        archive: ArchiveBlob,
        folder_name: &str,
        parent_dir: Option<&str>,
    ) -> UploadResult<FolderUploadResponse> {
        let entries = read_archive(&archive);
        let extracted = entries.len();
        self.folders.lock().unwrap().push(FolderCall {
            folder_name: folder_name.to_string(),
            parent_dir: parent_dir.map(str::to_string),
            entries,
        });

        if self.failing_folders.contains(folder_name) {
            return Err(UploadError::TransportFailure {
                status: Some(500),
                body: "extraction failed".to_string(),
            });
        }
        if self.rejecting_folders.contains(folder_name) {
            return Ok(FolderUploadResponse {
                success: Some(false),
                message: Some("No valid images found in the zip file".to_string()),
                ..Default::default()
            });
        }

        Ok(FolderUploadResponse {
            success: Some(true),
            extracted_count: extracted,
            ..Default::default()
        })
    }
}

/// Archiver that fails for any folder holding `poison`, and zips the rest
pub struct PoisonedArchiver {
    poison: String,
}

impl PoisonedArchiver {
    pub fn new(poison: &str) -> Self {
        PoisonedArchiver { poison: poison.to_string() }
    }
}

#[async_trait::async_trait]
impl Archiver for PoisonedArchiver {
    async fn build(&self, files: &[CollectedFile]) -> UploadResult<ArchiveBlob> {
        if files.iter().any(|f| f.relative_path == self.poison) {
            return Err(UploadError::ArchiveBuildFailure(format!("cannot compress {}", self.poison)));
        }
        ArchiveBuilder::new().build(files).await
    }
}

/// Entry names and contents of an archive, in archive order
pub fn read_archive(archive: &ArchiveBlob) -> Vec<(String, Vec<u8>)> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive.bytes().to_vec())).unwrap();
    let mut entries = Vec::new();
    for i in 0..zip.len() {
        let mut file = zip.by_index(i).unwrap();
        let mut content = Vec::new();
        file.read_to_end(&mut content).unwrap();
        entries.push((file.name().to_string(), content));
    }
    entries
}
