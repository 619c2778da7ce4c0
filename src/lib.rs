//! # comfy_uploader
//!
//! Uploads images and whole folders into a ComfyUI server's input directory.
//!
//! ## Overview
//!
//! Plain files go up directly in one multipart request. Each folder is walked
//! recursively, packed into an in-memory ZIP archive that keeps its relative
//! layout, and sent as a single folder upload which the server extracts.
//! Every folder upload is independent: one failing folder never stops the
//! others.
//!
//! ## Features
//!
//! - **Batched enumeration**: directory sources may hand out children in batches
//! - **Deterministic archives**: fixed timestamps and sorted walks
//! - **Per-folder isolation**: each folder has its own archive, request and notification
//! - **Pluggable edges**: transport, notification sink and capability checks are traits
//! - **Run reports**: JSON summary with archive SHA-256 per folder
//!
//! ## Usage
//!
//! ### Uploading a Folder
//!
//! ```no_run
//! use comfy_uploader::cloud::client::HttpTransport;
//! use comfy_uploader::collectors::SelectedFolder;
//! use comfy_uploader::notifications::LogSink;
//! use comfy_uploader::upload::Uploader;
//! use std::path::Path;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let transport = HttpTransport::new("http://127.0.0.1:8188", Duration::from_secs(30))?;
//! let uploader = Uploader::new(transport, LogSink::new());
//!
//! let folder = SelectedFolder::from_local_dir(Path::new("/home/user/photos"))?;
//! let outcome = uploader.upload_selected_folder(folder, None, "characters").await?;
//! println!("{:?}", outcome.status);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`models`]: Core data models
//! - [`error`]: Upload error taxonomy
//! - [`collectors`]: Entry sources, the directory walker and folder selection
//! - [`utils`]: Archive building, hashing and run reports
//! - [`cloud`]: Transport trait and HTTP client
//! - [`config`]: YAML configuration and environment overrides
//! - [`notifications`]: Notification sinks
//! - [`upload`]: Upload flows and their outcomes
//! - [`security`]: Validation of names sent to the server
//! - [`constants`]: Application-wide constants

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Core data models and structures used throughout the application
pub mod models;

/// Error types for upload flows
pub mod error;

/// Entry sources and file collection
pub mod collectors;

/// Utility functions for compression, hashing, and reporting
pub mod utils;

/// Server transport
pub mod cloud;

/// Configuration management
pub mod config;

/// User-facing notifications
pub mod notifications;

/// Upload orchestration
pub mod upload;

/// Application constants and configuration values
pub mod constants;

/// Security utilities for path validation
pub mod security;
