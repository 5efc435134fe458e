//! Application configuration

mod app_config;

pub use app_config::{AppConfig, EditorConfig, LogFormat, LoggingConfig, ReferencesConfig};
