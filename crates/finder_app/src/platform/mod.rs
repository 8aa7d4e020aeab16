mod app;
mod effects;
mod logging;
mod stores;
mod ui;

pub use app::run_app;
