pub mod error;
pub mod logging;

pub mod asset;
pub mod config;
pub mod locator;
pub mod migration;
pub mod model;
pub mod project;
pub mod scanner;

pub use error::{MigrationError, Result};
