use std::fs;
use std::path::Path;

use crate::module::{CapabilityFlags, LoadedModule, ModuleContext, ModuleDescriptor, ModuleManifest};
use crate::registry::ModuleRegistry;
use crate::{log_debug, log_info, log_warn};

/// Directory names that are never module candidates.
const RESERVED_NAMES: &[&str] = &["_template", "target"];

/// A candidate directory passes the same filter the manager dialog uses:
/// it must be a real directory, not reserved, and not prefixed with
/// `_` or `.`.
pub(crate) fn is_module_candidate(path: &Path, name: &str) -> bool {
    path.is_dir()
        && !RESERVED_NAMES.contains(&name)
        && !name.starts_with('_')
        && !name.starts_with('.')
}

impl ModuleRegistry {
    /// Runs one discovery pass over the modules root, replacing the active
    /// set. Every per-candidate failure is logged and skipped; discovery as
    /// a whole never fails. Disabled modules are skipped before their
    /// constructor runs.
    pub fn discover_modules(&mut self) {
        self.modules.clear();

        if !self.modules_root.exists() {
            if let Err(e) = fs::create_dir_all(&self.modules_root) {
                log_warn!("Modules root {:?} missing and could not be created: {}", self.modules_root, e);
            }
            return;
        }

        let entries = match fs::read_dir(&self.modules_root) {
            Ok(entries) => entries,
            Err(e) => {
                log_warn!("Failed to read modules root {:?}: {}", self.modules_root, e);
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let identifier = entry.file_name().to_string_lossy().to_string();

            if !is_module_candidate(&path, &identifier) {
                continue;
            }

            if !self.store.is_enabled(&identifier) {
                log_info!("Module '{}' is disabled, skipping", identifier);
                continue;
            }

            let manifest = match ModuleManifest::load_from_dir(&path) {
                Ok(manifest) => manifest,
                Err(e) => {
                    log_warn!("Module '{}' has no usable manifest, skipping: {}", identifier, e);
                    continue;
                }
            };

            let Some(factory) = self.factories.get(&manifest.kind) else {
                log_warn!("Module '{}' declares unknown kind '{}', skipping", identifier, manifest.kind);
                continue;
            };

            let context = ModuleContext {
                module_dir: path.clone(),
                data_dir: self.data_dir.clone(),
            };

            let mut panel = match factory(&context) {
                Ok(Some(panel)) => panel,
                Ok(None) => {
                    log_info!("Module '{}' declined to load this session", identifier);
                    continue;
                }
                Err(e) => {
                    log_warn!("Failed to load module '{}': {}", identifier, e);
                    continue;
                }
            };

            let descriptor = ModuleDescriptor {
                identifier: identifier.clone(),
                display_name: manifest.name.clone(),
                category: manifest.category.clone(),
                capabilities: CapabilityFlags::probe(panel.as_mut()),
            };

            // One directory scan cannot yield the same identifier twice,
            // but guard anyway: last loaded wins, with a warning.
            if let Some(pos) = self
                .modules
                .iter()
                .position(|m| m.descriptor.identifier == identifier)
            {
                log_warn!("Duplicate module identifier '{}', replacing earlier load", identifier);
                self.modules.remove(pos);
            }

            log_info!("Loaded module '{}' ({})", descriptor.display_name, identifier);
            self.modules.push(LoadedModule { descriptor, panel });
        }

        log_debug!("Discovery pass complete, {} active module(s)", self.modules.len());
    }
}
