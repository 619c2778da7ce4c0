mod env_vars;
mod uploader_config;

// Re-export uploader config
pub use uploader_config::{
    UploaderConfig,
    load_or_create_config,
};

// Re-export environment variable functions
pub use env_vars::{
    env_override,
    parse_unix_env_vars,
};
