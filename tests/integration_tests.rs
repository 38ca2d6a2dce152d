//! End-to-end registry behavior: discovery over real module directories,
//! enablement persistence, fault isolation and change notifications.

use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use aio_shell::error::ShellError;
use aio_shell::module::{ContentWidget, FactoryTable, ModulePanel};
use aio_shell::modules::builtin_factories;
use aio_shell::registry::ModuleRegistry;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

struct NullWidget;

impl ContentWidget for NullWidget {
    fn render(&mut self, _area: Rect, _buf: &mut Buffer) {}
}

struct NullPanel;

impl ModulePanel for NullPanel {
    fn create_content_widget(&mut self) -> aio_shell::error::Result<Box<dyn ContentWidget>> {
        Ok(Box::new(NullWidget))
    }
}

fn write_module_dir(root: &Path, id: &str, kind: &str, name: &str) {
    let dir = root.join(id);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("module.yml"),
        format!("name: {}\nkind: {}\n", name, kind),
    )
    .unwrap();
}

fn registry_with(dir: &Path, factories: FactoryTable) -> ModuleRegistry {
    ModuleRegistry::new(
        dir.join("modules"),
        dir.join("data"),
        dir.join("config").join("module_state.json"),
        factories,
    )
}

/// A factory table whose constructors record how often they ran.
fn counting_table(kinds: &[&'static str]) -> (FactoryTable, Vec<Rc<Cell<usize>>>) {
    let mut table = FactoryTable::new();
    let mut counters = Vec::new();
    for kind in kinds {
        let counter = Rc::new(Cell::new(0));
        counters.push(counter.clone());
        table.register(kind, move |_ctx| {
            counter.set(counter.get() + 1);
            Ok(Some(Box::new(NullPanel) as Box<dyn ModulePanel>))
        });
    }
    (table, counters)
}

#[test]
fn one_failing_module_does_not_abort_discovery() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("modules");
    write_module_dir(&root, "good_a", "good", "Good A");
    write_module_dir(&root, "bad", "broken", "Broken");
    write_module_dir(&root, "good_b", "good", "Good B");

    let mut table = FactoryTable::new();
    table.register("good", |_ctx| {
        Ok(Some(Box::new(NullPanel) as Box<dyn ModulePanel>))
    });
    table.register("broken", |_ctx| {
        Err(ShellError::ModuleError("constructor blew up".to_string()))
    });

    let mut registry = registry_with(dir.path(), table);
    registry.discover_modules();

    assert_eq!(registry.len(), 2);
    assert!(registry.get("good_a").is_some());
    assert!(registry.get("good_b").is_some());
    assert!(registry.get("bad").is_none());
}

#[test]
fn disabled_modules_are_never_constructed() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("modules");
    write_module_dir(&root, "notes", "probe", "Notes");
    write_module_dir(&root, "calendar", "probe", "Calendar");

    let state_dir = dir.path().join("config");
    fs::create_dir_all(&state_dir).unwrap();
    fs::write(state_dir.join("module_state.json"), "{\"notes\": false}").unwrap();

    let (table, counters) = counting_table(&["probe"]);
    let mut registry = registry_with(dir.path(), table);
    registry.discover_modules();

    // Only the enabled candidate ran its constructor.
    assert_eq!(counters[0].get(), 1);
    assert!(registry.get("notes").is_none());
    assert!(registry.get("calendar").is_some());
}

#[test]
fn enabling_and_reloading_rebuilds_everything_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("modules");
    write_module_dir(&root, "notes", "probe", "Notes");
    write_module_dir(&root, "calendar", "probe", "Calendar");

    let state_dir = dir.path().join("config");
    fs::create_dir_all(&state_dir).unwrap();
    fs::write(state_dir.join("module_state.json"), "{\"notes\": false}").unwrap();

    let (table, counters) = counting_table(&["probe"]);
    let mut registry = registry_with(dir.path(), table);
    registry.discover_modules();

    assert_eq!(registry.len(), 1);
    assert!(registry.get("calendar").is_some());

    registry.set_enabled("notes", true).unwrap();
    registry.reload();

    assert_eq!(registry.len(), 2);
    assert!(registry.get("notes").is_some());
    assert!(registry.get("calendar").is_some());
    // A full reload reconstructs every module: calendar was built in both
    // passes, notes only in the second.
    assert_eq!(counters[0].get(), 3);
}

#[test]
fn reload_emits_exactly_one_notification() {
    let dir = tempfile::tempdir().unwrap();
    write_module_dir(&dir.path().join("modules"), "calendar", "probe", "Calendar");

    let (table, _counters) = counting_table(&["probe"]);
    let mut registry = registry_with(dir.path(), table);
    let mut events = registry.subscribe();

    registry.reload();

    assert!(events.try_recv().is_ok());
    assert!(events.try_recv().is_err());
}

#[test]
fn set_enabled_notifies_immediately_without_recomputing() {
    let dir = tempfile::tempdir().unwrap();
    write_module_dir(&dir.path().join("modules"), "calendar", "probe", "Calendar");

    let (table, counters) = counting_table(&["probe"]);
    let mut registry = registry_with(dir.path(), table);
    registry.discover_modules();
    let mut events = registry.subscribe();

    registry.set_enabled("calendar", false).unwrap();

    // One notification, but the active set is untouched until reload.
    assert!(events.try_recv().is_ok());
    assert!(events.try_recv().is_err());
    assert!(registry.get("calendar").is_some());
    assert_eq!(counters[0].get(), 1);

    registry.reload();
    assert!(registry.get("calendar").is_none());
}

#[test]
fn non_candidates_and_unknown_kinds_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("modules");
    write_module_dir(&root, "known", "probe", "Known");
    write_module_dir(&root, "mystery", "no_such_kind", "Mystery");
    write_module_dir(&root, "_template", "probe", "Template");
    write_module_dir(&root, ".cache", "probe", "Cache");

    // A candidate without any manifest.
    fs::create_dir_all(root.join("bare")).unwrap();
    // A stray file is not a directory candidate.
    fs::write(root.join("README.txt"), "not a module").unwrap();

    let (table, _counters) = counting_table(&["probe"]);
    let mut registry = registry_with(dir.path(), table);
    registry.discover_modules();

    assert_eq!(registry.len(), 1);
    assert!(registry.get("known").is_some());
}

#[test]
fn factories_may_decline_to_load() {
    let dir = tempfile::tempdir().unwrap();
    write_module_dir(&dir.path().join("modules"), "shy", "shy", "Shy");

    let mut table = FactoryTable::new();
    table.register("shy", |_ctx| Ok(None));

    let mut registry = registry_with(dir.path(), table);
    registry.discover_modules();

    assert!(registry.is_empty());
}

#[test]
fn registry_keys_by_identifier_so_display_names_may_collide() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("modules");
    write_module_dir(&root, "notes_a", "probe", "Notes");
    write_module_dir(&root, "notes_b", "probe", "Notes");

    let (table, _counters) = counting_table(&["probe"]);
    let mut registry = registry_with(dir.path(), table);
    registry.discover_modules();

    assert_eq!(registry.len(), 2);
    assert!(registry.get("notes_a").is_some());
    assert!(registry.get("notes_b").is_some());
    let descriptors = registry.descriptors();
    assert!(descriptors.iter().all(|d| d.display_name == "Notes"));
}

#[test]
fn builtin_modules_discover_and_build_widgets() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("modules");
    write_module_dir(&root, "calendar", "calendar", "Calendar");
    write_module_dir(&root, "notes", "notes", "Notes+");

    let mut registry = registry_with(dir.path(), builtin_factories());
    registry.discover_modules();

    assert_eq!(registry.len(), 2);
    for identifier in ["calendar", "notes"] {
        let module = registry.get_mut(identifier).unwrap();
        assert!(module.panel.create_content_widget().is_ok());
    }

    let calendar = registry.get("calendar").unwrap();
    assert!(calendar.descriptor.capabilities.themeable);
    assert!(calendar.descriptor.capabilities.cleanable);
    let notes = registry.get("notes").unwrap();
    assert!(notes.descriptor.capabilities.hideable);
}

#[test]
fn candidate_listing_includes_disabled_modules() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("modules");
    write_module_dir(&root, "calendar", "probe", "Calendar");
    write_module_dir(&root, "notes", "probe", "Notes");

    let (table, _counters) = counting_table(&["probe"]);
    let mut registry = registry_with(dir.path(), table);
    registry.set_enabled("notes", false).unwrap();
    registry.discover_modules();

    assert_eq!(registry.len(), 1);
    let candidates = registry.candidate_identifiers();
    assert_eq!(candidates, vec!["calendar".to_string(), "notes".to_string()]);
    assert!(!registry.is_enabled("notes"));
}
