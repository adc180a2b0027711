//! Plugin registry
//!
//! The `plugins` list is an ordered set of named provider records. Each
//! entry is resolved once against the set of built-in providers; there is
//! no dynamic loading.

use indexmap::IndexMap;
use std::collections::HashSet;

use super::{ConfigError, PluginRef};

const SOURCE_FILESYSTEM: &str = "source-filesystem";
const MDX: &str = "mdx";
const IMAGE: &str = "image";

/// Names used by existing Gatsby configs, mapped to the built-in provider.
/// `None` marks image-processing plugins that have nothing to do here.
const ALIASES: [(&str, Option<&str>); 5] = [
    ("gatsby-source-filesystem", Some(SOURCE_FILESYSTEM)),
    ("gatsby-plugin-mdx", Some(MDX)),
    ("gatsby-plugin-image", Some(IMAGE)),
    ("gatsby-plugin-sharp", None),
    ("gatsby-transformer-sharp", None),
];

const DEFAULT_DOCUMENT_EXTENSIONS: [&str; 2] = ["md", "mdx"];
const DEFAULT_IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "svg", "webp", "avif"];
const DEFAULT_EXCERPT_LENGTH: usize = 140;

type Options = IndexMap<String, serde_yaml::Value>;

/// A resolved plugin
#[derive(Debug, Clone, PartialEq)]
pub enum Plugin {
    SourceFilesystem(SourceOptions),
    Mdx(MdxOptions),
    Image(ImageOptions),
}

/// Options of a filesystem content source
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOptions {
    pub name: String,
    pub path: String,
    /// Glob patterns, relative to the root, of files to skip
    pub ignore: Vec<glob::Pattern>,
    pub key: Option<String>,
}

/// Options of the Markdown/MDX transformer
#[derive(Debug, Clone, PartialEq)]
pub struct MdxOptions {
    /// Lowercase extensions without the leading dot
    pub extensions: Vec<String>,
    pub excerpt_length: usize,
}

impl Default for MdxOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_DOCUMENT_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
        }
    }
}

/// Options of the image asset copier
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOptions {
    pub extensions: Vec<String>,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

/// All plugins of a site, in declaration order
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: Vec<Plugin>,
}

impl PluginRegistry {
    /// Resolve the configured plugin list
    pub fn resolve(refs: &[PluginRef]) -> Result<Self, ConfigError> {
        let mut plugins = Vec::with_capacity(refs.len());
        let mut keys = HashSet::new();
        let mut names = HashSet::new();

        for plugin_ref in refs {
            let empty = Options::new();
            let options = plugin_ref.options().unwrap_or(&empty);

            let name = match canonical_name(plugin_ref.resolve()) {
                Some(name) => name,
                None => {
                    tracing::debug!("Ignoring plugin {}", plugin_ref.resolve());
                    continue;
                }
            };

            let plugin = match name {
                SOURCE_FILESYSTEM => {
                    let key = match plugin_ref {
                        PluginRef::Configured(p) => p.key.clone(),
                        PluginRef::Name(_) => None,
                    };
                    let source = parse_source_options(options, key)?;

                    if let Some(key) = &source.key {
                        if !keys.insert(key.clone()) {
                            return Err(ConfigError::DuplicateKey(key.clone()));
                        }
                    }
                    if !names.insert(source.name.clone()) {
                        return Err(ConfigError::DuplicateRootName(source.name));
                    }

                    Plugin::SourceFilesystem(source)
                }
                MDX => Plugin::Mdx(parse_mdx_options(options)?),
                IMAGE => Plugin::Image(parse_image_options(options)?),
                other => return Err(ConfigError::UnknownPlugin(other.to_string())),
            };

            tracing::debug!("Resolved plugin {}", plugin_ref.resolve());
            plugins.push(plugin);
        }

        Ok(Self { plugins })
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    /// Filesystem sources in declaration order
    pub fn sources(&self) -> impl Iterator<Item = &SourceOptions> {
        self.plugins.iter().filter_map(|p| match p {
            Plugin::SourceFilesystem(source) => Some(source),
            _ => None,
        })
    }

    /// The Markdown/MDX transformer, if enabled
    pub fn mdx(&self) -> Option<&MdxOptions> {
        self.plugins.iter().find_map(|p| match p {
            Plugin::Mdx(options) => Some(options),
            _ => None,
        })
    }

    /// The image copier, if enabled
    pub fn image(&self) -> Option<&ImageOptions> {
        self.plugins.iter().find_map(|p| match p {
            Plugin::Image(options) => Some(options),
            _ => None,
        })
    }
}

fn canonical_name(name: &str) -> Option<&str> {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map_or(Some(name), |(_, target)| *target)
}

fn parse_source_options(options: &Options, key: Option<String>) -> Result<SourceOptions, ConfigError> {
    let name = required_str(SOURCE_FILESYSTEM, options, "name")?;
    let path = required_str(SOURCE_FILESYSTEM, options, "path")?;

    let ignore = string_list(SOURCE_FILESYSTEM, options, "ignore")?
        .unwrap_or_default()
        .iter()
        .map(|pattern| {
            glob::Pattern::new(pattern).map_err(|e| ConfigError::InvalidOption {
                plugin: SOURCE_FILESYSTEM.to_string(),
                option: "ignore".to_string(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SourceOptions {
        name,
        path,
        ignore,
        key,
    })
}

fn parse_mdx_options(options: &Options) -> Result<MdxOptions, ConfigError> {
    let mut mdx = MdxOptions::default();

    if let Some(extensions) = string_list(MDX, options, "extensions")? {
        mdx.extensions = extensions.iter().map(|e| normalize_extension(e)).collect();
    }

    if let Some(value) = options.get("excerptLength") {
        mdx.excerpt_length = value
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| ConfigError::InvalidOption {
                plugin: MDX.to_string(),
                option: "excerptLength".to_string(),
                reason: "expected a non-negative integer".to_string(),
            })?;
    }

    Ok(mdx)
}

fn parse_image_options(options: &Options) -> Result<ImageOptions, ConfigError> {
    let mut image = ImageOptions::default();
    if let Some(extensions) = string_list(IMAGE, options, "extensions")? {
        image.extensions = extensions.iter().map(|e| normalize_extension(e)).collect();
    }
    Ok(image)
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

fn required_str(plugin: &str, options: &Options, option: &str) -> Result<String, ConfigError> {
    match options.get(option) {
        Some(serde_yaml::Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ConfigError::InvalidOption {
            plugin: plugin.to_string(),
            option: option.to_string(),
            reason: "expected a string".to_string(),
        }),
        None => Err(ConfigError::MissingOption {
            plugin: plugin.to_string(),
            option: option.to_string(),
        }),
    }
}

/// A string or a list of strings
fn string_list(
    plugin: &str,
    options: &Options,
    option: &str,
) -> Result<Option<Vec<String>>, ConfigError> {
    let invalid = || ConfigError::InvalidOption {
        plugin: plugin.to_string(),
        option: option.to_string(),
        reason: "expected a string or a list of strings".to_string(),
    };

    match options.get(option) {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(vec![s.clone()])),
        Some(serde_yaml::Value::Sequence(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(_) => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    fn registry(yaml: &str) -> Result<PluginRegistry, ConfigError> {
        let config = SiteConfig::from_yaml(yaml).unwrap();
        PluginRegistry::resolve(&config.plugins)
    }

    #[test]
    fn test_resolve_in_declaration_order() {
        let registry = registry(
            r#"
plugins:
  - image
  - mdx
  - resolve: source-filesystem
    options: { name: images, path: ./src/images/ }
    __key: images
  - resolve: source-filesystem
    options: { name: blog, path: ./blog, ignore: ["**/*.draft.md"] }
    __key: blog
"#,
        )
        .unwrap();

        assert_eq!(registry.plugins().len(), 4);
        let names: Vec<_> = registry.sources().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["images", "blog"]);
        assert_eq!(registry.mdx(), Some(&MdxOptions::default()));
        assert!(registry.image().is_some());

        let blog = registry.sources().nth(1).unwrap();
        assert!(blog.ignore[0].matches("2023/post.draft.md"));
    }

    #[test]
    fn test_mdx_options() {
        let registry = registry(
            r#"
plugins:
  - resolve: mdx
    options: { extensions: [".MDX"], excerptLength: 40 }
"#,
        )
        .unwrap();
        let mdx = registry.mdx().unwrap();
        assert_eq!(mdx.extensions, vec!["mdx"]);
        assert_eq!(mdx.excerpt_length, 40);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = registry(
            r#"
plugins:
  - resolve: source-filesystem
    options: { name: a, path: ./a }
    __key: same
  - resolve: source-filesystem
    options: { name: b, path: ./b }
    __key: same
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateKey(k) if k == "same"));
    }

    #[test]
    fn test_duplicate_root_name_rejected() {
        let err = registry(
            r#"
plugins:
  - resolve: source-filesystem
    options: { name: blog, path: ./a }
  - resolve: source-filesystem
    options: { name: blog, path: ./b }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateRootName(n) if n == "blog"));
    }

    #[test]
    fn test_missing_and_unknown() {
        let err = registry("plugins: [source-filesystem]").unwrap_err();
        assert!(matches!(err, ConfigError::MissingOption { ref option, .. } if option == "name"));

        let err = registry("plugins: [sharp]").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPlugin(n) if n == "sharp"));
    }

    #[test]
    fn test_gatsby_names_resolve() {
        let registry = registry(
            r#"
plugins:
  - gatsby-plugin-image
  - resolve: gatsby-plugin-mdx
    options: { extensions: [".mdx", ".md"] }
  - gatsby-plugin-sharp
  - gatsby-transformer-sharp
  - resolve: gatsby-source-filesystem
    options: { name: blog, path: ./blog }
    __key: blog
"#,
        )
        .unwrap();

        assert_eq!(registry.plugins().len(), 3);
        assert!(registry.image().is_some());
        assert_eq!(registry.mdx().unwrap().extensions, vec!["mdx", "md"]);
        assert_eq!(registry.sources().next().unwrap().name, "blog");
    }
}
