pub mod app;
pub mod error;
pub mod event;
pub mod host;
pub mod module;
pub mod modules;
pub mod registry;
pub mod theme;
pub mod ui;
pub mod util;

pub use app::App;
