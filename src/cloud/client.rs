use std::time::Duration;

use log::{debug, info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::cloud::transport::{DirectoryListing, FolderUploadResponse, ImagesUploadResponse, UploadTransport};
use crate::constants::{
    ARCHIVE_UPLOAD_FILENAME,
    FIELD_FOLDER_NAME,
    FIELD_FOLDER_ZIP,
    FIELD_IMAGES,
    FIELD_PARENT_DIR,
    FIELD_TARGET_DIR,
    FOLDER_ENDPOINT,
    IMAGES_ENDPOINT,
    INPUT_DIRS_ENDPOINT,
};
use crate::error::{UploadError, UploadResult};
use crate::models::NamedBlob;
use crate::utils::compress::ArchiveBlob;

/// HTTP transport talking to the ComfyUI server's upload endpoints
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for `base_url` (e.g. `http://127.0.0.1:8188`)
    pub fn new(base_url: &str, connect_timeout: Duration) -> UploadResult<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(HttpTransport {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode a JSON body, mapping non-2xx to a transport failure
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> UploadResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = if text.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                text
            };
            warn!("Server returned {}: {}", status, body);
            return Err(UploadError::TransportFailure {
                status: Some(status.as_u16()),
                body,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| UploadError::TransportFailure {
            status: Some(status.as_u16()),
            body: format!("unexpected response body: {}", e),
        })
    }
}

#[async_trait::async_trait]
impl UploadTransport for HttpTransport {
    async fn list_directories(&self) -> UploadResult<DirectoryListing> {
        debug!("Fetching destination directories from {}", self.base_url);
        self.send_json(self.client.get(self.endpoint(INPUT_DIRS_ENDPOINT))).await
    }

    async fn upload_images(&self, target_dir: &str, files: Vec<NamedBlob>) -> UploadResult<ImagesUploadResponse> {
        let count = files.len();

        // The server reads target_dir before any image part
        let mut form = Form::new().text(FIELD_TARGET_DIR, target_dir.to_string());
        for file in files {
            let length = file.content.len() as u64;
            let part = Part::stream_with_length(Body::from(file.content), length).file_name(file.name);
            form = form.part(FIELD_IMAGES, part);
        }

        info!(
            "Uploading {} files to {}",
            count,
            if target_dir.is_empty() { "root directory" } else { target_dir }
        );

        let request = self.client.post(self.endpoint(IMAGES_ENDPOINT)).multipart(form);
        self.send_json(request).await
    }

    async fn upload_folder(
        &self,
        archive: ArchiveBlob,
        folder_name: &str,
        parent_dir: Option<&str>,
    ) -> UploadResult<FolderUploadResponse> {
        info!(
            "Uploading folder {} as archive ({:.2} MB){}",
            folder_name,
            archive.size_mb(),
            parent_dir.map(|p| format!(" to {}", p)).unwrap_or_default()
        );

        let bytes = archive.into_bytes();
        let length = bytes.len() as u64;
        let archive_part = Part::stream_with_length(Body::from(bytes), length)
            .file_name(ARCHIVE_UPLOAD_FILENAME)
            .mime_str("application/zip")?;

        let mut form = Form::new()
            .part(FIELD_FOLDER_ZIP, archive_part)
            .text(FIELD_FOLDER_NAME, folder_name.to_string());
        if let Some(parent) = parent_dir {
            form = form.text(FIELD_PARENT_DIR, parent.to_string());
        }

        let request = self.client.post(self.endpoint(FOLDER_ENDPOINT)).multipart(form);
        self.send_json(request).await
    }
}
