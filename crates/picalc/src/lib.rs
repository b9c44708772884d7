//! Application logic for the picalc binary.

pub mod app;
pub mod config;
pub mod errors;
