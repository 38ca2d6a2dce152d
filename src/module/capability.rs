//! Optional lifecycle capabilities a module may implement. The router
//! checks for each capability through the accessor on [`ModulePanel`]
//! before invoking it; absence is not an error.
//!
//! [`ModulePanel`]: crate::module::ModulePanel

use crate::theme::Theme;

/// Reacts to theme switches. Broadcast to every loaded module, visible or
/// hidden, so panels stay consistent when shown again.
pub trait Themeable {
    fn on_theme_changed(&mut self, theme: Theme);
}

/// Notified when the module's widget becomes the visible one.
pub trait Showable {
    fn on_shown(&mut self);
}

/// Notified when the module's widget is replaced as the visible one.
pub trait Hideable {
    fn on_hidden(&mut self);
}

/// Final teardown before the instance is dropped on a full reload. No
/// lifecycle call follows `cleanup`.
pub trait Cleanable {
    fn cleanup(&mut self);
}
