use crate::module::{LoadedModule, ModuleDescriptor};
use crate::registry::ModuleRegistry;

impl ModuleRegistry {
    /// Active modules in load order.
    pub fn get_all(&self) -> &[LoadedModule] {
        &self.modules
    }

    /// Snapshot of the active descriptors, in load order.
    pub fn descriptors(&self) -> Vec<ModuleDescriptor> {
        self.modules.iter().map(|m| m.descriptor.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
