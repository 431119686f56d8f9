pub mod config;
pub mod error;
pub mod fetcher;
pub mod io;
pub mod lifecycle;
pub mod loader;
pub mod merge;
pub mod provision;
pub mod resolve;
pub mod settings;
pub mod timezone;
pub mod tool_runner;
pub mod value;

pub use error::{HarborError, Result};
pub use value::Mapping;
