//! Built-in module kinds and their factory table. Module directories on
//! disk select one of these through the `kind` field of their manifest.

pub mod calendar;
pub mod notes;

use crate::module::FactoryTable;

pub use calendar::CalendarModule;
pub use notes::NotesModule;

/// The production factory table with every compiled-in module kind.
pub fn builtin_factories() -> FactoryTable {
    let mut table = FactoryTable::new();

    table.register("calendar", |ctx| {
        let module = CalendarModule::new(ctx.data_dir.join("calendar_notes.json"));
        Ok(Some(Box::new(module) as Box<dyn crate::module::ModulePanel>))
    });

    table.register("notes", |ctx| {
        let module = NotesModule::new(ctx.data_dir.join("notes_data.html"));
        Ok(Some(Box::new(module) as Box<dyn crate::module::ModulePanel>))
    });

    table
}
