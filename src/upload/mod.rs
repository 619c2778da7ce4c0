//! Upload flows.
//!
//! [`Uploader`] ties collection, archiving, the transport and notifications
//! together. Each top-level folder becomes one archive and one folder upload;
//! loose files go up together in a single direct upload.

/// Busy flag held for the duration of a flow
pub mod busy;

/// Environment capability checks
pub mod capabilities;

/// Per-upload outcomes and the run report
pub mod outcome;

/// The upload flows
pub mod orchestrator;

pub use busy::{BusyFlag, BusyGuard};
pub use capabilities::{CapabilityCheck, StaticCapabilities};
pub use orchestrator::{is_image_name, Uploader};
pub use outcome::{FilesOutcome, FolderOutcome, OutcomeStatus, UploadReport};
