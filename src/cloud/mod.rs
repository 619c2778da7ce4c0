//! Server integration for uploads.
//!
//! The upload flows talk to the server only through the
//! [`UploadTransport`](transport::UploadTransport) trait. [`HttpTransport`](client::HttpTransport)
//! is the real implementation; tests substitute a recording fake.
//!
//! ## Endpoints
//!
//! - `GET  /asoul/input-dirs`: destination directories
//! - `POST /asoul/images`: multipart with `target_dir` then one `images[]` part per file
//! - `POST /asoul/folder`: multipart with `folder_zip`, `folder_name` and an optional `parent_dir`
//!
//! ## Usage Example
//!
//! ```no_run
//! use comfy_uploader::cloud::client::HttpTransport;
//! use comfy_uploader::cloud::transport::UploadTransport;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let transport = HttpTransport::new("http://127.0.0.1:8188", Duration::from_secs(30))?;
//! let listing = transport.list_directories().await?;
//! for dir in listing.directories {
//!     println!("{}", dir);
//! }
//! # Ok(())
//! # }
//! ```

/// Transport trait and server response types
pub mod transport;

/// HTTP client implementation of the transport
pub mod client;
