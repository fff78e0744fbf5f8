pub mod app;
pub mod logging;
pub mod report;
pub mod settings;
pub mod state;
pub mod utils;
