pub mod capability;
mod factory;
mod manifest;

use ratatui::{buffer::Buffer, layout::Rect};
use ratatui::crossterm::event::KeyEvent;

use crate::error::Result;
use crate::event::AppEvent;

pub use capability::{Cleanable, Hideable, Showable, Themeable};
pub use factory::{FactoryTable, ModuleContext, ModuleFactory};
pub use manifest::{ModuleManifest, MANIFEST_FILE};

/// Identity of a discovered module, built from its directory and manifest.
/// Immutable until the next discovery pass.
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    /// Directory name. Unique and stable across restarts; the registry key.
    pub identifier: String,
    /// Human-readable name shown in the sidebar. May collide across modules.
    pub display_name: String,
    /// Grouping label.
    pub category: String,
    /// Which optional lifecycle hooks the instance implements.
    pub capabilities: CapabilityFlags,
}

/// Capability probe result, recorded once at load time.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityFlags {
    pub themeable: bool,
    pub showable: bool,
    pub hideable: bool,
    pub cleanable: bool,
}

/// A host-invokable action a module exposes in the shell's action bar.
#[derive(Debug, Clone)]
pub struct MenuAction {
    pub id: &'static str,
    pub label: String,
}

impl MenuAction {
    pub fn new(id: &'static str, label: impl Into<String>) -> Self {
        Self { id, label: label.into() }
    }
}

/// The shell-facing UI surface a module contributes. Widgets are owned by
/// the display host and persist across selection changes within a session.
pub trait ContentWidget {
    fn render(&mut self, area: Rect, buf: &mut Buffer);

    /// Handles a key while the widget is visible and content-focused.
    fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        let _ = key;
        None
    }
}

/// The module contract. Mandatory operations plus optional capability
/// accessors; a `None` accessor simply means the hook is not implemented.
pub trait ModulePanel {
    /// Creates the module's UI surface. Called at most once per instance
    /// per discovery pass; an error marks the module failed for this pass
    /// without affecting the host.
    fn create_content_widget(&mut self) -> Result<Box<dyn ContentWidget>>;

    /// Actions to expose in the shell's action bar. Pure.
    fn menu_actions(&self) -> Vec<MenuAction> {
        Vec::new()
    }

    /// Executes a previously advertised menu action. Returns an optional
    /// user-facing notice.
    fn invoke_menu_action(&mut self, action_id: &str) -> Result<Option<String>> {
        let _ = action_id;
        Ok(None)
    }

    fn as_themeable(&mut self) -> Option<&mut dyn Themeable> {
        None
    }

    fn as_showable(&mut self) -> Option<&mut dyn Showable> {
        None
    }

    fn as_hideable(&mut self) -> Option<&mut dyn Hideable> {
        None
    }

    fn as_cleanable(&mut self) -> Option<&mut dyn Cleanable> {
        None
    }
}

impl CapabilityFlags {
    /// Probes the optional capability accessors of a freshly built instance.
    pub fn probe(panel: &mut dyn ModulePanel) -> Self {
        Self {
            themeable: panel.as_themeable().is_some(),
            showable: panel.as_showable().is_some(),
            hideable: panel.as_hideable().is_some(),
            cleanable: panel.as_cleanable().is_some(),
        }
    }
}

/// A module instance active in the registry, paired with its descriptor.
pub struct LoadedModule {
    pub descriptor: ModuleDescriptor,
    pub panel: Box<dyn ModulePanel>,
}

impl std::fmt::Debug for LoadedModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModule")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}
