//! Global constants for the comfy-uploader application.
//!
//! This module centralizes all hardcoded values to improve maintainability
//! and make configuration changes easier.

// Server endpoints
/// Destination directory listing
pub const INPUT_DIRS_ENDPOINT: &str = "/asoul/input-dirs";

/// Direct multi-image upload
pub const IMAGES_ENDPOINT: &str = "/asoul/images";

/// Zipped folder upload
pub const FOLDER_ENDPOINT: &str = "/asoul/folder";

/// Default ComfyUI server address
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8188";

// Multipart field names expected by the server
pub const FIELD_TARGET_DIR: &str = "target_dir";
pub const FIELD_IMAGES: &str = "images[]";
pub const FIELD_FOLDER_ZIP: &str = "folder_zip";
pub const FIELD_FOLDER_NAME: &str = "folder_name";
pub const FIELD_PARENT_DIR: &str = "parent_dir";

/// File name attached to the archive part of a folder upload
pub const ARCHIVE_UPLOAD_FILENAME: &str = "folder.zip";

// Timeout constants
/// Default connection timeout in seconds
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;

// Notification timeouts, matching the host GUI's toast durations
/// Success notices auto-dismiss after 3 seconds
pub const SUCCESS_NOTIFICATION_TIMEOUT_MS: u64 = 3000;

/// Error and warning notices auto-dismiss after 5 seconds
pub const ERROR_NOTIFICATION_TIMEOUT_MS: u64 = 5000;

// Enumeration constants
/// Number of entries the local provider hands out per batch.
/// Chromium's `readEntries` returns at most 100 entries per call.
pub const LOCAL_ENTRY_BATCH_SIZE: usize = 100;

/// Number of selected files listed in a folder preview
pub const SELECTION_PREVIEW_COUNT: usize = 5;

// Compression constants
/// Deflate level for entries that are already compressed
pub const FAST_COMPRESSION_LEVEL: i32 = 1;

/// Deflate level for everything else
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 6;

/// File extensions that don't benefit from additional compression
pub const COMPRESSED_EXTENSIONS: &[&str] = &[
    "zip", "gz", "xz", "bz2", "7z", "rar",
    "jpg", "jpeg", "png", "gif", "webp", "heic", "jxl",
    "mp3", "mp4", "avi", "mov", "mpg", "mpeg",
];

/// Image extensions the server accepts; anything else is skipped server-side
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "gif", "bmp", "tiff", "tif", "heic",
];

// Server-side limits, used for client-side warnings only
/// Largest single image accepted by the direct upload endpoint (50MB)
pub const MAX_DIRECT_IMAGE_SIZE: u64 = 50 * 1024 * 1024;

/// Largest single archive entry accepted by the folder endpoint (100MB)
pub const MAX_ARCHIVE_ENTRY_SIZE: u64 = 100 * 1024 * 1024;

// Environment variables
/// Overrides the configured server URL
pub const ENV_SERVER_URL: &str = "COMFY_UPLOAD_SERVER";

/// Overrides the configured default parent directory
pub const ENV_PARENT_DIR: &str = "COMFY_UPLOAD_PARENT_DIR";

// File size thresholds
/// Entries above this size get the fast compression level (100MB)
pub const LARGE_FILE_COMPRESSION_THRESHOLD: u64 = 100 * 1024 * 1024;
