//! Path validation for names sent to the server.
//!
//! Folder names and parent directories become paths under the server's
//! input directory, which refuses anything that could leave it. Checking
//! here gives a clear error before any archive is built or sent.

use std::path::{Component, Path};

use crate::error::{UploadError, UploadResult};

/// Validates a folder or directory name destined for the server.
///
/// # Security
///
/// This function rejects:
/// - Parent directory components (`..`) anywhere in the name
/// - Absolute paths, including Windows drive prefixes
/// - Null bytes
///
/// An empty name is accepted; it denotes the input root.
pub fn validate_remote_name(name: &str) -> UploadResult<()> {
    if name.contains('\0') {
        return Err(UploadError::UnsafePath(format!("{:?} contains null bytes", name)));
    }

    if name.starts_with('/') || name.starts_with('\\') {
        return Err(UploadError::UnsafePath(format!("{} is an absolute path", name)));
    }

    // Check both separators regardless of host OS
    let normalized = name.replace('\\', "/");
    for component in Path::new(&normalized).components() {
        match component {
            Component::ParentDir => {
                return Err(UploadError::UnsafePath(format!("{} contains '..'", name)));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(UploadError::UnsafePath(format!("{} is an absolute path", name)));
            }
            _ => {}
        }
    }

    // Windows drive letters are not components on Unix
    let bytes = normalized.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        return Err(UploadError::UnsafePath(format!("{} is an absolute path", name)));
    }

    Ok(())
}
