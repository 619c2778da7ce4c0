use serde::{Serialize, Deserialize};

/// Reports what the environment can do for folder uploads
pub trait CapabilityCheck: Send + Sync {
    /// Dropped folders can be enumerated recursively
    fn supports_recursive_drop(&self) -> bool;

    /// A whole folder can be selected at once
    fn supports_folder_selection(&self) -> bool;
}

/// Fixed capability answers, usually read from configuration
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticCapabilities {
    #[serde(default = "enabled")]
    pub recursive_drop: bool,
    #[serde(default = "enabled")]
    pub folder_selection: bool,
}

fn enabled() -> bool {
    true
}

impl Default for StaticCapabilities {
    fn default() -> Self {
        Self {
            recursive_drop: true,
            folder_selection: true,
        }
    }
}

impl CapabilityCheck for StaticCapabilities {
    fn supports_recursive_drop(&self) -> bool {
        self.recursive_drop
    }

    fn supports_folder_selection(&self) -> bool {
        self.folder_selection
    }
}
