//! SeaORM entity definitions
//!
//! Row models for the two tables, kept separate from the domain types.
//! Each row converts into its domain entity through `From<Model>`.

pub mod instance;
pub mod service;

