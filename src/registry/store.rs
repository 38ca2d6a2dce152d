use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::{log_info, log_warn};

/// Persisted per-module enablement state: a flat JSON object mapping module
/// identifier to a boolean. Absence of an identifier means enabled
/// (fail-open), so a missing or corrupt file never locks modules out.
#[derive(Debug)]
pub struct EnablementStore {
    path: PathBuf,
    map: BTreeMap<String, bool>,
}

impl EnablementStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let mut store = Self {
            path: path.as_ref().to_path_buf(),
            map: BTreeMap::new(),
        };
        store.load();
        store
    }

    /// Re-reads the state file. A parse failure falls back to an empty map
    /// rather than failing; everything then counts as enabled.
    pub fn load(&mut self) {
        self.map.clear();

        if !self.path.exists() {
            return;
        }

        match fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str::<BTreeMap<String, bool>>(&contents) {
                Ok(map) => {
                    log_info!("Loaded module state: {:?}", map);
                    self.map = map;
                }
                Err(e) => {
                    log_warn!("Malformed module state file {:?}, treating all modules as enabled: {}", self.path, e);
                }
            },
            Err(e) => {
                log_warn!("Failed to read module state file {:?}: {}", self.path, e);
            }
        }
    }

    pub fn is_enabled(&self, identifier: &str) -> bool {
        self.map.get(identifier).copied().unwrap_or(true)
    }

    /// Updates the in-memory map and rewrites the whole file. The write
    /// goes through a temp file and rename so a crash mid-write leaves the
    /// previous file intact. Unknown keys are re-serialized verbatim.
    pub fn set_enabled(&mut self, identifier: &str, enabled: bool) -> Result<()> {
        self.map.insert(identifier.to_string(), enabled);
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&self.map)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(&tmp_path, &self.path)?;

        log_info!("Module state saved: {:?}", self.map);
        Ok(())
    }
}
