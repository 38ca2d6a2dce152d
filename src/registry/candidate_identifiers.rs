use std::fs;

use crate::log_warn;
use crate::registry::discover_modules::is_module_candidate;
use crate::registry::ModuleRegistry;

impl ModuleRegistry {
    /// All installable module directories, enabled or not. The manager
    /// dialog lists these alongside their persisted enablement state.
    pub fn candidate_identifiers(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.modules_root) {
            Ok(entries) => entries,
            Err(e) => {
                log_warn!("Failed to read modules root {:?}: {}", self.modules_root, e);
                return Vec::new();
            }
        };

        let mut identifiers: Vec<String> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                is_module_candidate(&entry.path(), &name).then_some(name)
            })
            .collect();
        identifiers.sort();
        identifiers
    }
}
