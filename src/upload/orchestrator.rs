use log::{debug, info, warn};

use crate::cloud::transport::UploadTransport;
use crate::collectors::entry::{DirectoryEntry, EntryNode, FileEntry};
use crate::collectors::selection::SelectedFolder;
use crate::collectors::walker::DirectoryWalker;
use crate::constants::{IMAGE_EXTENSIONS, MAX_DIRECT_IMAGE_SIZE};
use crate::error::{UploadError, UploadResult};
use crate::models::{CollectedFile, NamedBlob};
use crate::notifications::{NotificationId, NotificationKind, NotificationSink, NotificationTimeouts};
use crate::security::validate_remote_name;
use crate::upload::busy::{BusyFlag, BusyGuard};
use crate::upload::capabilities::{CapabilityCheck, StaticCapabilities};
use crate::upload::outcome::{FilesOutcome, FolderOutcome, OutcomeStatus, UploadReport};
use crate::utils::compress::{ArchiveBuilder, Archiver};

/// Persistent in-progress notice, dismissed when dropped
struct ProgressNotice<'a> {
    sink: &'a dyn NotificationSink,
    id: NotificationId,
}

impl Drop for ProgressNotice<'_> {
    fn drop(&mut self) {
        self.sink.dismiss(self.id);
    }
}

/// Runs the upload flows: dropped entries, a selected folder, or plain files.
///
/// Every folder and the plain-file batch are uploaded by separate transport
/// calls. A failure in one is reported on its own and never stops the rest.
/// Flows run one at a time; starting a second while one is running fails
/// with [`UploadError::Busy`].
pub struct Uploader<T, N> {
    transport: T,
    sink: N,
    capabilities: Box<dyn CapabilityCheck>,
    walker: DirectoryWalker,
    builder: Box<dyn Archiver>,
    busy: BusyFlag,
    timeouts: NotificationTimeouts,
}

impl<T: UploadTransport, N: NotificationSink> Uploader<T, N> {
    pub fn new(transport: T, sink: N) -> Self {
        Uploader {
            transport,
            sink,
            capabilities: Box::new(StaticCapabilities::default()),
            walker: DirectoryWalker::new(),
            builder: Box::new(ArchiveBuilder::new()),
            busy: BusyFlag::new(),
            timeouts: NotificationTimeouts::default(),
        }
    }

    pub fn with_capabilities(mut self, capabilities: impl CapabilityCheck + 'static) -> Self {
        self.capabilities = Box::new(capabilities);
        self
    }

    pub fn with_archiver(mut self, archiver: impl Archiver + 'static) -> Self {
        self.builder = Box::new(archiver);
        self
    }

    pub fn with_timeouts(mut self, timeouts: NotificationTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    /// Flag shared with whatever disables the trigger control while busy
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    /// Destination directories offered by the server
    pub async fn list_directories(&self) -> UploadResult<Vec<String>> {
        let listing = self.transport.list_directories().await?;
        debug!("Server offers {} destination directories", listing.directories.len());
        Ok(listing.directories)
    }

    /// Upload dropped top-level entries.
    ///
    /// Each directory is walked and archived on its own; plain files go up
    /// together in one direct upload to `parent_dir`.
    pub async fn upload_entries(&self, entries: Vec<EntryNode>, parent_dir: &str) -> UploadResult<UploadReport> {
        let _guard = self.acquire()?;
        self.check_name(parent_dir)?;

        let mut directories = Vec::new();
        let mut files = Vec::new();
        for entry in entries {
            match entry {
                EntryNode::Directory(dir) => directories.push(dir),
                EntryNode::File(file) => files.push(file),
            }
        }
        info!("Found {} files and {} folders", files.len(), directories.len());

        let mut report = UploadReport::default();

        if !directories.is_empty() && !self.capabilities.supports_recursive_drop() {
            let names: Vec<&str> = directories.iter().map(|d| d.name()).collect();
            self.notify(
                &format!(
                    "Folder upload is not supported in this environment; skipped {}",
                    names.join(", ")
                ),
                NotificationKind::Warning,
            );
            for name in names {
                report.folders.push(FolderOutcome::new(
                    name,
                    parent_dir,
                    OutcomeStatus::Skipped { reason: "recursive folder drop is not supported".to_string() },
                ));
            }
        } else {
            for dir in &directories {
                let outcome = self.upload_directory(dir.as_ref(), parent_dir).await;
                report.folders.push(outcome);
            }
        }

        if !files.is_empty() {
            let (blobs, unreadable) = read_files(files).await;
            report.files = Some(self.send_files(blobs, parent_dir, unreadable).await);
        }

        info!(
            "Finished processing {} folders and {} files ({} failures)",
            report.folders.len(),
            report.files.as_ref().map(|f| f.file_count).unwrap_or(0),
            report.failure_count()
        );
        Ok(report)
    }

    /// Upload a folder picked through folder selection as one archive,
    /// named `name_override` when given and non-blank
    pub async fn upload_selected_folder(
        &self,
        folder: SelectedFolder,
        name_override: Option<&str>,
        parent_dir: &str,
    ) -> UploadResult<FolderOutcome> {
        let _guard = self.acquire()?;

        if !self.capabilities.supports_folder_selection() {
            let err = UploadError::UnsupportedEnvironment("folder selection is not available".to_string());
            self.notify(&err.to_string(), NotificationKind::Warning);
            return Err(err);
        }
        self.check_name(parent_dir)?;

        let name = name_override
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(folder.name())
            .to_string();

        info!("Processing selected folder {} ({} files)", folder.name(), folder.len());
        let files = folder.into_collected();
        if files.is_empty() {
            return Ok(self.skip_empty(&name, parent_dir));
        }

        Ok(self.archive_and_send(&name, files, parent_dir).await)
    }

    /// Upload plain files to `target_dir` in one request
    pub async fn upload_files(&self, files: Vec<NamedBlob>, target_dir: &str) -> UploadResult<FilesOutcome> {
        let _guard = self.acquire()?;
        self.check_name(target_dir)?;
        Ok(self.send_files(files, target_dir, 0).await)
    }

    fn acquire(&self) -> UploadResult<BusyGuard> {
        self.busy.try_acquire().ok_or_else(|| {
            self.notify(&UploadError::Busy.to_string(), NotificationKind::Warning);
            UploadError::Busy
        })
    }

    fn check_name(&self, name: &str) -> UploadResult<()> {
        validate_remote_name(name).map_err(|e| {
            self.notify(&e.to_string(), NotificationKind::Error);
            e
        })
    }

    fn notify(&self, message: &str, kind: NotificationKind) -> NotificationId {
        let timeout = match kind {
            NotificationKind::Success | NotificationKind::Info => self.timeouts.success,
            NotificationKind::Warning | NotificationKind::Error => self.timeouts.error,
        };
        self.sink.show(message, kind, Some(timeout))
    }

    fn progress(&self, message: &str) -> ProgressNotice<'_> {
        ProgressNotice {
            sink: &self.sink,
            id: self.sink.show(message, NotificationKind::Info, None),
        }
    }

    async fn upload_directory(&self, dir: &dyn DirectoryEntry, parent_dir: &str) -> FolderOutcome {
        let name = dir.name().to_string();
        info!("Processing folder {}", name);

        let files = match self.walker.walk(dir, "").await {
            Ok(files) => files,
            Err(e) => {
                self.notify(&format!("Failed to process folder {}: {}", name, e), NotificationKind::Error);
                return FolderOutcome::new(&name, parent_dir, OutcomeStatus::Failed { error: e.to_string() });
            }
        };

        info!("Collected {} files from folder {}", files.len(), name);
        if files.is_empty() {
            return self.skip_empty(&name, parent_dir);
        }

        self.archive_and_send(&name, files, parent_dir).await
    }

    fn skip_empty(&self, name: &str, parent_dir: &str) -> FolderOutcome {
        info!("No files found in folder {}, skipping", name);
        self.notify(&format!("Folder {} has no files, nothing uploaded", name), NotificationKind::Info);
        FolderOutcome::new(name, parent_dir, OutcomeStatus::Skipped { reason: "no files found".to_string() })
    }

    async fn archive_and_send(&self, name: &str, files: Vec<CollectedFile>, parent_dir: &str) -> FolderOutcome {
        let mut outcome = FolderOutcome::new(name, parent_dir, OutcomeStatus::Skipped { reason: String::new() });
        outcome.file_count = files.len();

        if let Err(e) = validate_remote_name(name) {
            self.notify(&e.to_string(), NotificationKind::Error);
            outcome.status = OutcomeStatus::Failed { error: e.to_string() };
            return outcome;
        }

        let archive = match self.builder.build(&files).await {
            Ok(archive) => archive,
            Err(e) => {
                self.notify(
                    &format!("Failed to create archive for folder {}: {}", name, e),
                    NotificationKind::Error,
                );
                outcome.status = OutcomeStatus::Failed { error: e.to_string() };
                return outcome;
            }
        };
        drop(files);

        outcome.archive_size = Some(archive.len());
        outcome.archive_sha256 = Some(archive.sha256());

        let parent = if parent_dir.is_empty() { None } else { Some(parent_dir) };
        let destination = parent.map(|p| format!(" to {}", p)).unwrap_or_default();

        let result = {
            let _notice = self.progress(&format!("Uploading folder {}{}...", name, destination));
            self.transport.upload_folder(archive, name, parent).await
        };

        outcome.status = match result {
            Ok(response) if response.is_success() => {
                let message = response.message.clone().unwrap_or_else(|| {
                    format!(
                        "Uploaded folder {} ({} images extracted, {} skipped)",
                        name, response.extracted_count, response.skipped_count
                    )
                });
                self.notify(&message, NotificationKind::Success);
                OutcomeStatus::Uploaded {
                    count: response.extracted_count,
                    skipped: response.skipped_count,
                    message: response.message,
                }
            }
            Ok(response) => {
                let message = response
                    .message
                    .unwrap_or_else(|| format!("Folder {} contained no usable images", name));
                self.notify(&message, NotificationKind::Warning);
                OutcomeStatus::Rejected { message }
            }
            Err(e) => {
                self.notify(&format!("Failed to upload folder {}: {}", name, e), NotificationKind::Error);
                OutcomeStatus::Failed { error: e.to_string() }
            }
        };
        outcome
    }

    async fn send_files(&self, files: Vec<NamedBlob>, target_dir: &str, unreadable: usize) -> FilesOutcome {
        let mut outcome = FilesOutcome {
            target_dir: target_dir.to_string(),
            file_count: files.len(),
            unreadable,
            status: OutcomeStatus::Skipped { reason: "no readable files".to_string() },
        };

        if files.is_empty() {
            let message = if unreadable > 0 {
                format!("None of the {} files could be read; nothing uploaded", unreadable)
            } else {
                "No files to upload".to_string()
            };
            self.notify(&message, NotificationKind::Warning);
            return outcome;
        }

        for file in &files {
            if !is_image_name(&file.name) {
                warn!("{} is not an image; the server will skip it", file.name);
            } else if file.content.len() as u64 > MAX_DIRECT_IMAGE_SIZE {
                warn!("{} exceeds the server's {} byte limit", file.name, MAX_DIRECT_IMAGE_SIZE);
            }
        }

        let count = files.len();
        let result = {
            let _notice = self.progress(&format!("Uploading {} files...", count));
            self.transport.upload_images(target_dir, files).await
        };

        outcome.status = match result {
            Ok(response) if response.is_success() => {
                let uploaded = response.uploaded(count);
                self.notify(&format!("Uploaded {} files", uploaded), NotificationKind::Success);
                OutcomeStatus::Uploaded {
                    count: uploaded,
                    skipped: response.skipped,
                    message: response.message,
                }
            }
            Ok(response) => {
                let message = response.message.unwrap_or_else(|| "No valid images were uploaded".to_string());
                self.notify(&message, NotificationKind::Warning);
                OutcomeStatus::Rejected { message }
            }
            Err(e) => {
                self.notify(&e.to_string(), NotificationKind::Error);
                OutcomeStatus::Failed { error: e.to_string() }
            }
        };
        outcome
    }
}

/// Read top-level plain files, skipping the ones that fail
async fn read_files(files: Vec<Box<dyn FileEntry>>) -> (Vec<NamedBlob>, usize) {
    let mut blobs = Vec::with_capacity(files.len());
    let mut unreadable = 0;
    for file in files {
        match file.read().await {
            Ok(content) => blobs.push(NamedBlob::new(file.name(), content)),
            Err(e) => {
                warn!("{}", UploadError::file_read(file.name(), e));
                unreadable += 1;
            }
        }
    }
    (blobs, unreadable)
}

/// Whether the server would accept a file with this name as an image
pub fn is_image_name(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}
