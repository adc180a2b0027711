//! blogsite: a static site generator for a personal Markdown/MDX blog
//!
//! A site is a configuration file declaring content roots and plugins. A
//! build scans the roots once into an immutable [`content::ContentIndex`],
//! then renders the About page, the blog listing and one page per post with
//! embedded Tera templates.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod pages;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use config::{PluginRegistry, SiteConfig, CONFIG_FILES};
use content::{ContentIndex, ContentSources, DocumentLoader};

/// The main site handle
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: SiteConfig,
    /// Resolved plugins
    pub plugins: PluginRegistry,
    /// Base directory
    pub base_dir: PathBuf,
    /// Config file, if one was found
    pub config_path: Option<PathBuf>,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Open a site directory, loading `site.yml` or `site.json` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = CONFIG_FILES
            .iter()
            .map(|name| base_dir.join(name))
            .find(|path| path.exists());

        let config = match &config_path {
            Some(path) => {
                tracing::debug!("Loading config from {:?}", path);
                SiteConfig::load(path)?
            }
            None => {
                tracing::debug!("No config file in {:?}, using defaults", base_dir);
                SiteConfig::default()
            }
        };

        Self::with_config(base_dir, config_path, config)
    }

    pub fn with_config(
        base_dir: PathBuf,
        config_path: Option<PathBuf>,
        config: SiteConfig,
    ) -> Result<Self> {
        let plugins = PluginRegistry::resolve(&config.plugins)?;
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            plugins,
            base_dir,
            config_path,
            public_dir,
        })
    }

    /// Content roots, checked against the filesystem
    pub fn sources(&self) -> Result<ContentSources> {
        Ok(ContentSources::resolve(&self.plugins, &self.base_dir)?)
    }

    /// Scan all roots into a fresh index
    pub fn build_index(&self) -> Result<ContentIndex> {
        self.index_sources(&self.sources()?)
    }

    /// Index already resolved roots
    pub fn index_sources(&self, sources: &ContentSources) -> Result<ContentIndex> {
        let loader = self
            .plugins
            .mdx()
            .map(|options| DocumentLoader::new(options.clone(), self.config.render_drafts));
        ContentIndex::build(sources, loader.as_ref())
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
