// src/config/mod.rs

pub mod app;
pub mod loader;
pub mod validation;

pub use app::{AppConfig, ServerConfig, SourceConfig};
pub use loader::load_config;
pub use validation::ConfigValidator;
