use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use anyhow::{Result, Context};

use crate::upload::outcome::{OutcomeStatus, UploadReport};

/// Create a JSON summary of an upload run.
///
/// # Arguments
///
/// * `report` - Outcomes of the run
/// * `server_url` - Server the uploads were sent to
///
/// # Example Output
///
/// ```json
/// {
///   "run_id": "550e8400-e29b-41d4-a716-446655440000",
///   "server_url": "http://127.0.0.1:8188",
///   "finished_at": "2024-01-15T14:30:52Z",
///   "uploaded_folders": 1,
///   "failures": 0,
///   "folders": [...],
///   "files": {...}
/// }
/// ```
pub fn create_upload_summary(report: &UploadReport, server_url: &str) -> Result<String> {
    let folders: Vec<_> = report.folders.iter()
        .map(|folder| {
            json!({
                "folder_name": folder.folder_name,
                "parent_dir": folder.parent_dir,
                "file_count": folder.file_count,
                "archive_size": folder.archive_size,
                "archive_sha256": folder.archive_sha256,
                "outcome": folder.status,
                "succeeded": matches!(folder.status, OutcomeStatus::Uploaded { .. }),
            })
        })
        .collect();

    let mut summary = json!({
        "run_id": Uuid::new_v4().to_string(),
        "server_url": server_url,
        "finished_at": Utc::now().to_rfc3339(),
        "uploader_version": env!("CARGO_PKG_VERSION"),
        "uploaded_folders": report.uploaded_folders(),
        "failures": report.failure_count(),
        "folders": folders,
    });

    if let Some(files) = &report.files {
        let files_data = json!({
            "target_dir": files.target_dir,
            "file_count": files.file_count,
            "unreadable": files.unreadable,
            "outcome": files.status,
        });

        if let Some(obj) = summary.as_object_mut() {
            obj.insert("files".to_string(), files_data);
        }
    }

    serde_json::to_string_pretty(&summary).context("Failed to serialize upload summary to JSON")
}
