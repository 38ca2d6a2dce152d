mod candidate_identifiers;
mod discover_modules;
mod get;
mod get_all;
mod new;
mod reload;
mod set_enabled;
mod store;
mod subscribe;

use std::path::PathBuf;

use tokio::sync::mpsc::UnboundedSender;

use crate::module::{FactoryTable, LoadedModule};

pub use store::EnablementStore;

/// Notification emitted whenever the active module set is recomputed or
/// the persisted enablement state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryEvent {
    ModulesChanged,
}

/// Owns the active module set. Keyed by the stable directory identifier;
/// lookups and enumeration preserve load order. All mutation happens on
/// the UI task, so no internal synchronization is needed.
#[derive(Debug)]
pub struct ModuleRegistry {
    modules_root: PathBuf,
    data_dir: PathBuf,
    store: EnablementStore,
    factories: FactoryTable,
    modules: Vec<LoadedModule>,
    subscribers: Vec<UnboundedSender<RegistryEvent>>,
}

impl ModuleRegistry {
    pub fn modules_root(&self) -> &PathBuf {
        &self.modules_root
    }

    pub fn is_enabled(&self, identifier: &str) -> bool {
        self.store.is_enabled(identifier)
    }

    pub(crate) fn notify_changed(&mut self) {
        self.subscribers
            .retain(|sender| sender.send(RegistryEvent::ModulesChanged).is_ok());
    }
}
