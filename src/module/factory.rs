use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::module::ModulePanel;

/// What a constructor gets to see of the host: where its module directory
/// lives and where user data belongs.
#[derive(Debug, Clone)]
pub struct ModuleContext {
    pub module_dir: PathBuf,
    pub data_dir: PathBuf,
}

/// A compiled-in module constructor. `Ok(None)` means the module declined
/// to load this session; `Err` marks it failed for this pass. Neither is
/// fatal to discovery.
pub type ModuleFactory = Box<dyn Fn(&ModuleContext) -> Result<Option<Box<dyn ModulePanel>>>>;

/// Registry of constructors keyed by manifest `kind`. Discovery never runs
/// code from disk; it only resolves kinds against this table.
#[derive(Default)]
pub struct FactoryTable {
    factories: HashMap<String, ModuleFactory>,
}

impl FactoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, kind: &str, factory: F)
    where
        F: Fn(&ModuleContext) -> Result<Option<Box<dyn ModulePanel>>> + 'static,
    {
        self.factories.insert(kind.to_string(), Box::new(factory));
    }

    pub fn get(&self, kind: &str) -> Option<&ModuleFactory> {
        self.factories.get(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for FactoryTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryTable")
            .field("kinds", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
