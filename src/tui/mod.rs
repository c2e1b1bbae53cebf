pub mod app;
pub mod events;
pub mod loader;
pub mod theme;
pub mod widgets;
