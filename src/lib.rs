// src/lib.rs
pub mod application;
pub mod cli;
pub mod config;
pub mod core;
pub mod infrastructure;
pub mod setup;

pub use crate::config::application_settings::Settings;
