use crate::error::Result;
use crate::registry::ModuleRegistry;

impl ModuleRegistry {
    /// Persists a module's enablement flag and notifies subscribers
    /// immediately. The active set is not recomputed until the next
    /// explicit [`reload`](ModuleRegistry::reload).
    pub fn set_enabled(&mut self, identifier: &str, enabled: bool) -> Result<()> {
        self.store.set_enabled(identifier, enabled)?;
        self.notify_changed();
        Ok(())
    }
}
