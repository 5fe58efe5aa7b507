//! Configuration management for apigw-gen

pub mod config;
pub mod settings;


pub use config::{Config, CONFIG_FILE_NAMES};
pub use settings::{OutputConfig, SourceConfig};
