//! Display host: owns the per-session widget set and drives the module
//! lifecycle. Each identifier moves through Unloaded -> Loaded-Hidden <->
//! Loaded-Visible, and back to Unloaded only on a full reload. At most one
//! module is visible at a time; the host is the sole owner of "current".

use ratatui::crossterm::event::KeyEvent;

use crate::event::AppEvent;
use crate::module::ContentWidget;
use crate::registry::ModuleRegistry;
use crate::theme::Theme;
use crate::{log_debug, log_error, log_info};

pub struct DisplayHost {
    /// (identifier, widget) pairs, insertion order = order of first display.
    /// At most one entry per identifier.
    widgets: Vec<(String, Box<dyn ContentWidget>)>,
    current: Option<String>,
}

impl Default for DisplayHost {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayHost {
    pub fn new() -> Self {
        Self {
            widgets: Vec::new(),
            current: None,
        }
    }

    /// Identifier of the visible module, if any.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// True if the identifier has a live widget (Loaded-Hidden or
    /// Loaded-Visible).
    pub fn is_loaded(&self, identifier: &str) -> bool {
        self.widgets.iter().any(|(id, _)| id == identifier)
    }

    pub fn current_widget_mut(&mut self) -> Option<&mut dyn ContentWidget> {
        let current = self.current.clone()?;
        self.widgets
            .iter_mut()
            .find(|(id, _)| *id == current)
            .map(move |(_, widget)| &mut **widget as &mut dyn ContentWidget)
    }

    /// Forwards a key to the visible widget.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        self.current_widget_mut()?.handle_key(key)
    }

    /// Makes the given module the visible one. Fires `on_hidden` on the
    /// outgoing module, creates the widget on first selection (reusing it
    /// afterwards), then fires `on_shown` on the incoming module. Unknown
    /// identifiers are a no-op.
    pub fn select(&mut self, identifier: &str, registry: &mut ModuleRegistry) {
        if registry.get(identifier).is_none() {
            log_debug!("Ignoring selection of unknown module '{}'", identifier);
            return;
        }

        if self.current.as_deref() == Some(identifier) {
            return;
        }

        if let Some(outgoing) = self.current.take() {
            if let Some(module) = registry.get_mut(&outgoing) {
                if let Some(hideable) = module.panel.as_hideable() {
                    log_debug!("Hiding module '{}'", outgoing);
                    hideable.on_hidden();
                }
            }
        }

        if !self.is_loaded(identifier) {
            // First selection: the one widget creation for this instance.
            let Some(module) = registry.get_mut(identifier) else {
                return;
            };
            match module.panel.create_content_widget() {
                Ok(widget) => {
                    log_info!("Created widget for module '{}'", identifier);
                    self.widgets.push((identifier.to_string(), widget));
                }
                Err(e) => {
                    log_error!("Module '{}' failed to create its widget: {}", identifier, e);
                    return;
                }
            }
        }

        self.current = Some(identifier.to_string());

        if let Some(module) = registry.get_mut(identifier) {
            if let Some(showable) = module.panel.as_showable() {
                showable.on_shown();
            }
        }
    }

    /// Broadcasts a theme change to every loaded module, visible or
    /// hidden. Unloaded modules pick the theme up when first shown.
    pub fn broadcast_theme(&mut self, theme: Theme, registry: &mut ModuleRegistry) {
        for (identifier, _) in &self.widgets {
            if let Some(module) = registry.get_mut(identifier) {
                if let Some(themeable) = module.panel.as_themeable() {
                    themeable.on_theme_changed(theme);
                }
            }
        }
    }

    /// Tears down the whole widget set ahead of a full reload. `cleanup`
    /// fires once per loaded module before its widget is discarded; the
    /// instance receives no lifecycle call afterwards.
    pub fn teardown_all(&mut self, registry: &mut ModuleRegistry) {
        log_info!("Tearing down {} widget(s)", self.widgets.len());

        for (identifier, _) in &self.widgets {
            if let Some(module) = registry.get_mut(identifier) {
                if let Some(cleanable) = module.panel.as_cleanable() {
                    cleanable.cleanup();
                }
            }
        }

        self.widgets.clear();
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;

    use crate::error::Result;
    use crate::module::{
        Cleanable, FactoryTable, Hideable, ModulePanel, Showable, Themeable,
    };

    #[derive(Clone, Default)]
    struct Journal {
        entries: Rc<RefCell<Vec<String>>>,
    }

    impl Journal {
        fn push(&self, entry: impl Into<String>) {
            self.entries.borrow_mut().push(entry.into());
        }

        fn count_of(&self, entry: &str) -> usize {
            self.entries.borrow().iter().filter(|e| *e == entry).count()
        }
    }

    struct ProbeWidget;

    impl ContentWidget for ProbeWidget {
        fn render(&mut self, _area: Rect, _buf: &mut Buffer) {}
    }

    struct ProbePanel {
        id: &'static str,
        journal: Journal,
        widgets_created: Rc<Cell<usize>>,
    }

    impl ModulePanel for ProbePanel {
        fn create_content_widget(&mut self) -> Result<Box<dyn ContentWidget>> {
            self.widgets_created.set(self.widgets_created.get() + 1);
            Ok(Box::new(ProbeWidget))
        }

        fn as_themeable(&mut self) -> Option<&mut dyn Themeable> {
            Some(self)
        }

        fn as_showable(&mut self) -> Option<&mut dyn Showable> {
            Some(self)
        }

        fn as_hideable(&mut self) -> Option<&mut dyn Hideable> {
            Some(self)
        }

        fn as_cleanable(&mut self) -> Option<&mut dyn Cleanable> {
            Some(self)
        }
    }

    impl Themeable for ProbePanel {
        fn on_theme_changed(&mut self, theme: Theme) {
            self.journal.push(format!("{}:theme:{}", self.id, theme.as_str()));
        }
    }

    impl Showable for ProbePanel {
        fn on_shown(&mut self) {
            self.journal.push(format!("{}:shown", self.id));
        }
    }

    impl Hideable for ProbePanel {
        fn on_hidden(&mut self) {
            self.journal.push(format!("{}:hidden", self.id));
        }
    }

    impl Cleanable for ProbePanel {
        fn cleanup(&mut self) {
            self.journal.push(format!("{}:cleanup", self.id));
        }
    }

    struct Fixture {
        registry: ModuleRegistry,
        host: DisplayHost,
        journal: Journal,
        created_a: Rc<Cell<usize>>,
        created_b: Rc<Cell<usize>>,
        _dir: tempfile::TempDir,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("modules");
        for (id, kind) in [("alpha", "probe_a"), ("beta", "probe_b")] {
            let module_dir = root.join(id);
            std::fs::create_dir_all(&module_dir).unwrap();
            std::fs::write(
                module_dir.join("module.yml"),
                format!("name: {}\nkind: {}\n", id, kind),
            )
            .unwrap();
        }

        let journal = Journal::default();
        let created_a = Rc::new(Cell::new(0));
        let created_b = Rc::new(Cell::new(0));

        let mut factories = FactoryTable::new();
        for (kind, id, created) in [
            ("probe_a", "alpha", created_a.clone()),
            ("probe_b", "beta", created_b.clone()),
        ] {
            let journal = journal.clone();
            factories.register(kind, move |_ctx| {
                Ok(Some(Box::new(ProbePanel {
                    id,
                    journal: journal.clone(),
                    widgets_created: created.clone(),
                }) as Box<dyn ModulePanel>))
            });
        }

        let mut registry = ModuleRegistry::new(
            root,
            dir.path().join("data"),
            dir.path().join("config/module_state.json"),
            factories,
        );
        registry.discover_modules();

        Fixture {
            registry,
            host: DisplayHost::new(),
            journal,
            created_a,
            created_b,
            _dir: dir,
        }
    }

    #[test]
    fn test_reselection_reuses_widget_and_refires_on_shown() {
        let mut f = fixture();

        f.host.select("alpha", &mut f.registry);
        f.host.select("beta", &mut f.registry);
        f.host.select("alpha", &mut f.registry);

        assert_eq!(f.journal.count_of("beta:shown"), 1);
        assert_eq!(f.journal.count_of("alpha:shown"), 2);
        // The first widget is reused, not recreated.
        assert_eq!(f.created_a.get(), 1);
        assert_eq!(f.created_b.get(), 1);
    }

    #[test]
    fn test_on_hidden_fires_on_outgoing_module_only() {
        let mut f = fixture();

        f.host.select("alpha", &mut f.registry);
        assert_eq!(f.journal.count_of("alpha:hidden"), 0);

        f.host.select("beta", &mut f.registry);
        assert_eq!(f.journal.count_of("alpha:hidden"), 1);
        assert_eq!(f.journal.count_of("beta:hidden"), 0);
    }

    #[test]
    fn test_selecting_same_module_again_is_a_no_op() {
        let mut f = fixture();

        f.host.select("alpha", &mut f.registry);
        f.host.select("alpha", &mut f.registry);

        assert_eq!(f.journal.count_of("alpha:shown"), 1);
        assert_eq!(f.journal.count_of("alpha:hidden"), 0);
    }

    #[test]
    fn test_unknown_identifier_is_a_no_op() {
        let mut f = fixture();

        f.host.select("gamma", &mut f.registry);
        assert!(f.host.current().is_none());
        assert!(f.journal.entries.borrow().is_empty());
    }

    #[test]
    fn test_theme_broadcast_reaches_hidden_but_not_unloaded() {
        let mut f = fixture();

        // Load both, leaving alpha hidden behind beta.
        f.host.select("alpha", &mut f.registry);
        f.host.select("beta", &mut f.registry);

        f.host.broadcast_theme(Theme::Dark, &mut f.registry);

        // alpha is Loaded-Hidden and still hears the change.
        assert_eq!(f.journal.count_of("alpha:theme:dark"), 1);
        assert_eq!(f.journal.count_of("beta:theme:dark"), 1);
    }

    #[test]
    fn test_theme_broadcast_skips_unloaded_modules() {
        let mut f = fixture();

        f.host.select("alpha", &mut f.registry);
        f.host.broadcast_theme(Theme::Dark, &mut f.registry);

        assert_eq!(f.journal.count_of("alpha:theme:dark"), 1);
        assert_eq!(f.journal.count_of("beta:theme:dark"), 0);
    }

    #[test]
    fn test_teardown_fires_cleanup_once_per_loaded_module() {
        let mut f = fixture();

        f.host.select("alpha", &mut f.registry);
        f.host.select("beta", &mut f.registry);

        f.host.teardown_all(&mut f.registry);

        assert_eq!(f.journal.count_of("alpha:cleanup"), 1);
        assert_eq!(f.journal.count_of("beta:cleanup"), 1);
        assert!(f.host.current().is_none());
        assert!(!f.host.is_loaded("alpha"));
        assert!(!f.host.is_loaded("beta"));
    }

    #[test]
    fn test_reload_rebuilds_fresh_instances() {
        let mut f = fixture();

        f.host.select("alpha", &mut f.registry);
        f.host.teardown_all(&mut f.registry);
        f.registry.reload();
        f.host.select("alpha", &mut f.registry);

        // A fresh instance means a fresh widget after the reload.
        assert_eq!(f.created_a.get(), 2);
        assert_eq!(f.journal.count_of("alpha:cleanup"), 1);
    }
}
