//! Application configuration module
//!
//! Reads the database and pool settings from the environment and
//! holds application-wide constants.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
