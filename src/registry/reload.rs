use crate::registry::ModuleRegistry;

impl ModuleRegistry {
    /// Full reload: re-reads the persisted enablement state, re-runs
    /// discovery, then emits exactly one change notification. Callers must
    /// tear down any widgets referencing the old instances first.
    pub fn reload(&mut self) {
        self.store.load();
        self.discover_modules();
        self.notify_changed();
    }
}
