pub mod app;
pub mod bot;
pub mod cli;
pub mod logging;
