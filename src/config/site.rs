//! Site configuration (site.yml / site.json)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::ConfigError;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub site_metadata: SiteMetadata,

    /// Ordered plugin list, resolved once at startup
    pub plugins: Vec<PluginRef>,

    // Output
    pub public_dir: String,
    pub blog_path: String,
    pub date_format: String,
    pub language: String,

    /// Render documents marked `draft: true`
    pub render_drafts: bool,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_metadata: SiteMetadata::default(),
            plugins: Vec::new(),
            public_dir: "public".to_string(),
            blog_path: "blog".to_string(),
            date_format: "MMMM D, YYYY".to_string(),
            language: "en".to_string(),
            render_drafts: false,
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file, picking the format by extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Site-wide metadata exposed to every page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteMetadata {
    pub title: String,
    pub site_url: String,
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            site_url: "http://localhost".to_string(),
        }
    }
}

/// A plugin reference: either a bare name or a configured entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PluginRef {
    Name(String),
    Configured(ConfiguredPlugin),
}

impl PluginRef {
    /// The name the plugin resolves to
    pub fn resolve(&self) -> &str {
        match self {
            PluginRef::Name(name) => name,
            PluginRef::Configured(plugin) => &plugin.resolve,
        }
    }

    /// Options of the plugin, empty for bare names
    pub fn options(&self) -> Option<&IndexMap<String, serde_yaml::Value>> {
        match self {
            PluginRef::Name(_) => None,
            PluginRef::Configured(plugin) => Some(&plugin.options),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfiguredPlugin {
    pub resolve: String,
    #[serde(default)]
    pub options: IndexMap<String, serde_yaml::Value>,
    #[serde(rename = "__key", default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.public_dir, "public");
        assert_eq!(config.blog_path, "blog");
        assert_eq!(config.date_format, "MMMM D, YYYY");
        assert!(config.plugins.is_empty());
    }

    #[test]
    fn test_parse_yaml_config() {
        let yaml = r#"
siteMetadata:
  title: "David O'Brien : Personal Blog"
  siteUrl: https://davidobrien.uk
plugins:
  - image
  - mdx
  - resolve: source-filesystem
    options:
      name: blog
      path: ./blog
    __key: blog
"#;
        let config = SiteConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.site_metadata.title, "David O'Brien : Personal Blog");
        assert_eq!(config.site_metadata.site_url, "https://davidobrien.uk");
        assert_eq!(config.plugins.len(), 3);
        assert_eq!(config.plugins[0], PluginRef::Name("image".to_string()));
        assert_eq!(config.plugins[2].resolve(), "source-filesystem");

        let options = config.plugins[2].options().unwrap();
        let keys: Vec<_> = options.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "path"]);
        match &config.plugins[2] {
            PluginRef::Configured(p) => assert_eq!(p.key.as_deref(), Some("blog")),
            other => panic!("expected configured plugin, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_json_config() {
        let json = r#"{
            "siteMetadata": {"title": "Blog", "siteUrl": "https://example.com"},
            "plugins": ["mdx", {"resolve": "source-filesystem", "options": {"name": "blog", "path": "./blog"}, "__key": "blog"}],
            "blogPath": "posts"
        }"#;
        let config = SiteConfig::from_json(json).unwrap();
        assert_eq!(config.blog_path, "posts");
        assert_eq!(config.plugins.len(), 2);
        assert_eq!(config.plugins[1].resolve(), "source-filesystem");
    }

    #[test]
    fn test_invalid_config_is_parse_error() {
        let err = SiteConfig::from_yaml("plugins: 12").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
