use color_eyre::Result;
use ratatui::{
    crossterm::event::{KeyCode, KeyEvent, KeyModifiers},
    DefaultTerminal,
};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::event::{AppEvent, Event, EventHandler};
use crate::host::DisplayHost;
use crate::log_info;
use crate::modules::builtin_factories;
use crate::registry::{ModuleRegistry, RegistryEvent};
use crate::theme::ThemeManager;

/// Where the shell keeps its on-disk state, relative to the working
/// directory.
pub const MODULES_DIR: &str = "./modules";
pub const DATA_DIR: &str = "./data";
pub const STATE_FILE: &str = "./config/module_state.json";
pub const THEME_FILE: &str = "./theme.json";

#[derive(Debug, PartialEq, Eq)]
pub enum AppMode {
    Shell,
    ManagerDialog,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Focus {
    Sidebar,
    Content,
}

/// State of the module manager popup: one row per installable directory.
#[derive(Debug, Default)]
pub struct ManagerDialog {
    pub rows: Vec<(String, bool)>,
    pub selected: usize,
}

/// Application.
pub struct App {
    /// Is the application running?
    pub running: bool,
    /// Current app mode/screen.
    pub mode: AppMode,
    /// Which pane receives module-agnostic keys.
    pub focus: Focus,

    /// Module registry (active set + enablement store).
    pub registry: ModuleRegistry,
    /// Display host owning the widget set and lifecycle routing.
    pub host: DisplayHost,
    /// Theme state (`theme.json`).
    pub themes: ThemeManager,

    /// Selected row in the sidebar.
    pub sidebar_index: usize,
    /// Module manager popup state.
    pub manager: ManagerDialog,
    /// Transient status-line notice; cleared on the next key press.
    pub status: Option<String>,

    /// Event handler.
    pub events: EventHandler,
    registry_events: UnboundedReceiver<RegistryEvent>,
}

impl App {
    /// Constructs a new instance of [`App`] and runs the boot discovery
    /// pass.
    pub fn new() -> Result<Self> {
        let mut registry =
            ModuleRegistry::new(MODULES_DIR, DATA_DIR, STATE_FILE, builtin_factories());
        let registry_events = registry.subscribe();
        registry.discover_modules();

        let mut app = Self {
            running: true,
            mode: AppMode::Shell,
            focus: Focus::Sidebar,
            registry,
            host: DisplayHost::new(),
            themes: ThemeManager::new(THEME_FILE),
            sidebar_index: 0,
            manager: ManagerDialog::default(),
            status: None,
            events: EventHandler::new(),
            registry_events,
        };

        // Boot straight into the first active module.
        if let Some(first) = app.registry.descriptors().first() {
            let identifier = first.identifier.clone();
            app.host.select(&identifier, &mut app.registry);
        }

        Ok(app)
    }

    /// Run the application's main loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let mut needs_redraw = true;

        while self.running {
            if needs_redraw {
                terminal.draw(|frame| {
                    frame.render_widget(&mut self, frame.area());
                })?;
                needs_redraw = false;
            }

            tokio::select! {
                event = self.events.next() => {
                    match event? {
                        Event::Tick => {}
                        Event::Crossterm(event) => {
                            if let crossterm::event::Event::Key(key_event) = event {
                                self.handle_key_events(key_event);
                                needs_redraw = true;
                            }
                        }
                        Event::App(app_event) => {
                            self.apply_app_event(app_event);
                            needs_redraw = true;
                        }
                    }
                }
                registry_event = self.registry_events.recv() => {
                    if let Some(RegistryEvent::ModulesChanged) = registry_event {
                        self.clamp_sidebar_index();
                        needs_redraw = true;
                    }
                }
            }
        }
        Ok(())
    }

    /// Translates key presses into [`AppEvent`]s, or forwards them to the
    /// visible widget when the content pane is focused.
    pub fn handle_key_events(&mut self, key_event: KeyEvent) {
        self.status = None;

        if key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL)
        {
            self.events.send(AppEvent::Quit);
            return;
        }

        if self.mode == AppMode::ManagerDialog {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('m') | KeyCode::Char('q') => {
                    self.events.send(AppEvent::CloseManager)
                }
                KeyCode::Up | KeyCode::Char('k') => self.events.send(AppEvent::ManagerPrev),
                KeyCode::Down | KeyCode::Char('j') => self.events.send(AppEvent::ManagerNext),
                KeyCode::Char(' ') | KeyCode::Enter => self.events.send(AppEvent::ManagerToggle),
                _ => {}
            }
            return;
        }

        if let KeyCode::F(n) = key_event.code {
            if n >= 1 {
                self.events.send(AppEvent::InvokeMenuAction(n as usize - 1));
            }
            return;
        }

        match self.focus {
            Focus::Sidebar => match key_event.code {
                KeyCode::Esc | KeyCode::Char('q') => self.events.send(AppEvent::Quit),
                KeyCode::Up | KeyCode::Char('k') => self.events.send(AppEvent::PrevModule),
                KeyCode::Down | KeyCode::Char('j') => self.events.send(AppEvent::NextModule),
                KeyCode::Enter | KeyCode::Char(' ') => self.events.send(AppEvent::SelectModule),
                KeyCode::Tab => self.events.send(AppEvent::FocusContent),
                KeyCode::Char('t') => self.events.send(AppEvent::ToggleTheme),
                KeyCode::Char('m') => self.events.send(AppEvent::OpenManager),
                KeyCode::Char('r') => self.events.send(AppEvent::ReloadModules),
                _ => {}
            },
            Focus::Content => match key_event.code {
                KeyCode::Tab => self.events.send(AppEvent::FocusSidebar),
                _ => {
                    if let Some(event) = self.host.handle_key(key_event) {
                        self.events.send(event);
                    }
                }
            },
        }
    }

    fn apply_app_event(&mut self, app_event: AppEvent) {
        match app_event {
            AppEvent::NextModule => self.move_sidebar(1),
            AppEvent::PrevModule => self.move_sidebar(-1),
            AppEvent::SelectModule => self.select_highlighted(),
            AppEvent::FocusContent => {
                if self.host.current().is_some() {
                    self.focus = Focus::Content;
                }
            }
            AppEvent::FocusSidebar => self.focus = Focus::Sidebar,
            AppEvent::ToggleTheme => {
                let theme = self.themes.toggle();
                self.host.broadcast_theme(theme, &mut self.registry);
            }
            AppEvent::ReloadModules => self.reload_modules(),
            AppEvent::InvokeMenuAction(index) => self.invoke_menu_action(index),
            AppEvent::Quit => self.quit(),
            AppEvent::OpenManager => self.open_manager(),
            AppEvent::CloseManager => {
                // Enablement changes take effect when the dialog closes.
                self.mode = AppMode::Shell;
                self.reload_modules();
            }
            AppEvent::ManagerNext => self.move_manager_selection(1),
            AppEvent::ManagerPrev => self.move_manager_selection(-1),
            AppEvent::ManagerToggle => self.toggle_manager_row(),
            AppEvent::Notice(message) => self.status = Some(message),
        }
    }

    /// Set running to false to quit the application.
    pub fn quit(&mut self) {
        self.running = false;
    }

    fn move_sidebar(&mut self, delta: isize) {
        let count = self.registry.len();
        if count == 0 {
            return;
        }
        let current = self.sidebar_index as isize;
        self.sidebar_index = (current + delta).rem_euclid(count as isize) as usize;
    }

    fn clamp_sidebar_index(&mut self) {
        let count = self.registry.len();
        if count > 0 && self.sidebar_index >= count {
            self.sidebar_index = 0;
        }
    }

    fn select_highlighted(&mut self) {
        let Some(descriptor) = self.registry.descriptors().get(self.sidebar_index).cloned()
        else {
            return;
        };
        self.host.select(&descriptor.identifier, &mut self.registry);
        if self.host.current() == Some(descriptor.identifier.as_str()) {
            self.focus = Focus::Content;
        }
    }

    /// Tears down every widget, re-runs discovery and shows the first
    /// active module again. Everything is freshly constructed afterwards.
    fn reload_modules(&mut self) {
        log_info!("Reloading modules");
        self.host.teardown_all(&mut self.registry);
        self.registry.reload();
        self.sidebar_index = 0;
        self.focus = Focus::Sidebar;
        if let Some(first) = self.registry.descriptors().first() {
            let identifier = first.identifier.clone();
            self.host.select(&identifier, &mut self.registry);
        }
    }

    fn invoke_menu_action(&mut self, index: usize) {
        let Some(current) = self.host.current().map(str::to_string) else {
            return;
        };
        let Some(module) = self.registry.get_mut(&current) else {
            return;
        };
        let Some(action) = module.panel.menu_actions().get(index).cloned() else {
            return;
        };
        match module.panel.invoke_menu_action(action.id) {
            Ok(Some(notice)) => self.status = Some(notice),
            Ok(None) => {}
            Err(e) => self.status = Some(format!("{} failed: {}", action.label, e)),
        }
    }

    fn open_manager(&mut self) {
        let rows = self
            .registry
            .candidate_identifiers()
            .into_iter()
            .map(|identifier| {
                let enabled = self.registry.is_enabled(&identifier);
                (identifier, enabled)
            })
            .collect();
        self.manager = ManagerDialog { rows, selected: 0 };
        self.mode = AppMode::ManagerDialog;
    }

    fn move_manager_selection(&mut self, delta: isize) {
        let count = self.manager.rows.len();
        if count == 0 {
            return;
        }
        let current = self.manager.selected as isize;
        self.manager.selected = (current + delta).rem_euclid(count as isize) as usize;
    }

    fn toggle_manager_row(&mut self) {
        let Some((identifier, enabled)) = self.manager.rows.get(self.manager.selected).cloned()
        else {
            return;
        };
        match self.registry.set_enabled(&identifier, !enabled) {
            Ok(()) => {
                self.manager.rows[self.manager.selected].1 = !enabled;
            }
            Err(e) => self.status = Some(format!("Failed to update '{}': {}", identifier, e)),
        }
    }
}
