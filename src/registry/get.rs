use crate::module::LoadedModule;
use crate::registry::ModuleRegistry;

impl ModuleRegistry {
    /// Looks up an active module by its stable identifier.
    pub fn get(&self, identifier: &str) -> Option<&LoadedModule> {
        self.modules
            .iter()
            .find(|m| m.descriptor.identifier == identifier)
    }

    pub fn get_mut(&mut self, identifier: &str) -> Option<&mut LoadedModule> {
        self.modules
            .iter_mut()
            .find(|m| m.descriptor.identifier == identifier)
    }
}
