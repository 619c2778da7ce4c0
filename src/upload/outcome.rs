use serde::{Serialize, Deserialize};

/// Result of one independent upload call
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The server accepted the upload
    Uploaded {
        count: usize,
        skipped: usize,
        message: Option<String>,
    },
    /// The server answered but reported `success: false`
    Rejected { message: String },
    /// Nothing was sent
    Skipped { reason: String },
    /// Walking, archiving, or the transport failed
    Failed { error: String },
}

impl OutcomeStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, OutcomeStatus::Failed { .. } | OutcomeStatus::Rejected { .. })
    }
}

/// Outcome for one top-level folder
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FolderOutcome {
    pub folder_name: String,
    pub parent_dir: Option<String>,
    pub file_count: usize,
    pub archive_size: Option<usize>,
    pub archive_sha256: Option<String>,
    pub status: OutcomeStatus,
}

impl FolderOutcome {
    pub(crate) fn new(folder_name: &str, parent_dir: &str, status: OutcomeStatus) -> Self {
        FolderOutcome {
            folder_name: folder_name.to_string(),
            parent_dir: if parent_dir.is_empty() { None } else { Some(parent_dir.to_string()) },
            file_count: 0,
            archive_size: None,
            archive_sha256: None,
            status,
        }
    }
}

/// Outcome of the direct multi-file upload
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FilesOutcome {
    pub target_dir: String,
    pub file_count: usize,
    pub unreadable: usize,
    pub status: OutcomeStatus,
}

/// Everything one drop or selection produced
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UploadReport {
    pub folders: Vec<FolderOutcome>,
    pub files: Option<FilesOutcome>,
}

impl UploadReport {
    pub fn failure_count(&self) -> usize {
        let folder_failures = self.folders.iter().filter(|f| f.status.is_failure()).count();
        let file_failures = self.files.iter().filter(|f| f.status.is_failure()).count();
        folder_failures + file_failures
    }

    pub fn uploaded_folders(&self) -> usize {
        self.folders
            .iter()
            .filter(|f| matches!(f.status, OutcomeStatus::Uploaded { .. }))
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }
}
