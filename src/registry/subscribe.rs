use tokio::sync::mpsc;

use crate::registry::{ModuleRegistry, RegistryEvent};

impl ModuleRegistry {
    /// Subscribes to change notifications. The shell drains these to
    /// refresh the sidebar whenever the module set or enablement changes.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<RegistryEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.push(sender);
        receiver
    }
}
