//! Configuration module

mod plugins;
mod site;

use std::path::PathBuf;
use thiserror::Error;

pub use plugins::{ImageOptions, MdxOptions, Plugin, PluginRegistry, SourceOptions};
pub use site::{ConfiguredPlugin, PluginRef, SiteConfig, SiteMetadata};

/// Config file names probed in the site directory, in order
pub const CONFIG_FILES: [&str; 2] = ["site.yml", "site.json"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid site configuration: {0}")]
    Parse(String),
    #[error("Unknown plugin: {0}")]
    UnknownPlugin(String),
    #[error("Plugin {plugin} is missing option `{option}`")]
    MissingOption { plugin: String, option: String },
    #[error("Invalid option `{option}` for plugin {plugin}: {reason}")]
    InvalidOption {
        plugin: String,
        option: String,
        reason: String,
    },
    #[error("Duplicate plugin __key: {0}")]
    DuplicateKey(String),
    #[error("Duplicate content root name: {0}")]
    DuplicateRootName(String),
    #[error("Content root {name} points at a missing path: {path:?}")]
    MissingPath { name: String, path: PathBuf },
}
