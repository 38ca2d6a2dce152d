use std::path::{Path, PathBuf};

use crate::module::FactoryTable;
use crate::registry::{EnablementStore, ModuleRegistry};

impl ModuleRegistry {
    pub fn new(
        modules_root: impl AsRef<Path>,
        data_dir: impl AsRef<Path>,
        state_file: impl AsRef<Path>,
        factories: FactoryTable,
    ) -> Self {
        Self {
            modules_root: modules_root.as_ref().to_path_buf(),
            data_dir: data_dir.as_ref().to_path_buf(),
            store: EnablementStore::new(state_file.as_ref()),
            factories,
            modules: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }
}
