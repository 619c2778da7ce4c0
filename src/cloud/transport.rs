use serde::{Serialize, Deserialize};

use crate::error::UploadResult;
use crate::models::NamedBlob;
use crate::utils::compress::ArchiveBlob;

/// Listing of destination directories. An empty name is the input root.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DirectoryListing {
    #[serde(default)]
    pub directories: Vec<String>,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub input_dir: String,
}

/// Server reply to a direct image upload
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ImagesUploadResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub target_dir: Option<String>,
    #[serde(default)]
    pub uploaded_files: Vec<String>,
    #[serde(default)]
    pub uploaded_count: Option<usize>,
    #[serde(default)]
    pub total_size: u64,
    #[serde(default)]
    pub skipped: usize,
    #[serde(default)]
    pub elapsed_time: Option<f64>,
}

impl ImagesUploadResponse {
    /// Uploaded file count: the explicit count, else the listed files,
    /// else the number of files that were sent
    pub fn uploaded(&self, sent: usize) -> usize {
        match self.uploaded_count {
            Some(count) => count,
            None if !self.uploaded_files.is_empty() => self.uploaded_files.len(),
            None => sent,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success != Some(false)
    }
}

/// Server reply to a folder (archive) upload
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FolderUploadResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub folder_path: Option<String>,
    #[serde(default)]
    pub extracted_count: usize,
    #[serde(default)]
    pub skipped_count: usize,
    #[serde(default)]
    pub elapsed_time: Option<f64>,
}

impl FolderUploadResponse {
    pub fn is_success(&self) -> bool {
        self.success != Some(false)
    }
}

/// The server calls the upload flows depend on.
///
/// Each call is independent; implementations do not retry.
#[async_trait::async_trait]
pub trait UploadTransport: Send + Sync {
    /// List destination directories
    async fn list_directories(&self) -> UploadResult<DirectoryListing>;

    /// Upload plain files into `target_dir` (empty for the root) in one request
    async fn upload_images(&self, target_dir: &str, files: Vec<NamedBlob>) -> UploadResult<ImagesUploadResponse>;

    /// Upload a zipped folder to be extracted as `folder_name`, optionally
    /// under `parent_dir`
    async fn upload_folder(
        &self,
        archive: ArchiveBlob,
        folder_name: &str,
        parent_dir: Option<&str>,
    ) -> UploadResult<FolderUploadResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_folder_response() {
        let body = r#"{
            "success": true,
            "message": "done",
            "folder_path": "/input/photos",
            "extracted_count": 2,
            "skipped_count": 0,
            "elapsed_time": 0.12
        }"#;
        let response: FolderUploadResponse = serde_json::from_str(body).unwrap();
        assert!(response.is_success());
        assert_eq!(response.extracted_count, 2);
        assert_eq!(response.message.as_deref(), Some("done"));
    }

    #[test]
    fn test_folder_response_without_success_counts_as_success() {
        let response: FolderUploadResponse = serde_json::from_str(r#"{"extracted_count": 1}"#).unwrap();
        assert!(response.is_success());

        let response: FolderUploadResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!response.is_success());
    }

    #[test]
    fn test_uploaded_count_fallbacks() {
        let explicit: ImagesUploadResponse = serde_json::from_str(r#"{"uploaded_count": 3}"#).unwrap();
        assert_eq!(explicit.uploaded(5), 3);

        let listed: ImagesUploadResponse =
            serde_json::from_str(r#"{"success": true, "uploaded_files": ["a.png", "b.png"]}"#).unwrap();
        assert_eq!(listed.uploaded(5), 2);

        let bare: ImagesUploadResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(bare.uploaded(5), 5);
    }

    #[test]
    fn test_parse_directory_listing() {
        let listing: DirectoryListing =
            serde_json::from_str(r#"{"directories": ["", "characters"], "count": 2, "input_dir": "/input"}"#).unwrap();
        assert_eq!(listing.directories, vec!["".to_string(), "characters".to_string()]);
    }
}
