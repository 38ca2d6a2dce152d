use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Well-known manifest file inside every module directory. Its presence is
/// the discovery signal; its `kind` selects the compiled-in constructor.
pub const MANIFEST_FILE: &str = "module.yml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Display name shown in the sidebar.
    pub name: String,
    /// Factory table key.
    pub kind: String,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    "General".to_string()
}

impl ModuleManifest {
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let manifest_path = dir.join(MANIFEST_FILE);
        let contents = fs::read_to_string(&manifest_path)?;
        let manifest: ModuleManifest = serde_yaml::from_str(&contents)?;
        Ok(manifest)
    }
}
