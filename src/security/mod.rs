//! Security utilities and validation functions.
//!
//! This module provides validation of folder and directory names before they
//! are sent to the server.

pub mod path_validator;

pub use path_validator::validate_remote_name;
