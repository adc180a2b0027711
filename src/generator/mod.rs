//! Generator module - writes the static HTML site

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::ImageOptions;
use crate::content::{ContentIndex, ContentNode, ContentSources, NodeQuery};
use crate::pages::{about, AboutPage, BlogListingPage, Layout, PostPage, SummaryFormat};
use crate::templates::TemplateRenderer;
use crate::Site;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Slug {slug:?} is used by both {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },
    #[error("Slug {slug:?} of {id} is not a single path segment")]
    InvalidSlug { slug: String, id: String },
}

/// What a build produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub pages: usize,
    pub posts: usize,
    pub assets: usize,
}

/// Static site generator using the embedded templates
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
}

impl Generator {
    pub fn new(site: &Site) -> Result<Self> {
        Ok(Self {
            site: site.clone(),
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Generate the entire site from a finished index
    pub fn generate(&self, index: &ContentIndex, sources: &ContentSources) -> Result<BuildReport> {
        fs::create_dir_all(&self.site.public_dir)?;

        let layout = Layout::new(&self.renderer, &self.site.config);
        let format = SummaryFormat::from_config(&self.site.config);
        let mut report = BuildReport::default();

        // Validate before writing anything for posts
        let posts = self.posts_to_render(index)?;

        let html = AboutPage.render(&layout)?;
        self.write_page(about::PATH, &html)?;
        report.pages += 1;

        let html = BlogListingPage::new(format.clone()).render(index, &layout)?;
        self.write_page(&self.site.config.blog_path, &html)?;
        report.pages += 1;

        for node in posts {
            let page = PostPage::new(node);
            let html = page.render(&layout, &format)?;
            self.write_page(&post_dir(&self.site.config.blog_path, &node.slug), &html)?;
            report.posts += 1;
        }

        if let Some(options) = self.site.plugins.image() {
            report.assets = self.copy_images(sources, options)?;
        }

        Ok(report)
    }

    /// Listed nodes that get their own page; empty slugs are skipped,
    /// slugs that would leave `<public>/<blog path>/` are an error
    fn posts_to_render<'a>(&self, index: &'a ContentIndex) -> Result<Vec<&'a ContentNode>, BuildError> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        let mut posts = Vec::new();

        for node in index.query(&NodeQuery::blog_listing()) {
            if node.slug.is_empty() {
                tracing::warn!("{} has no slug, no page generated for it", node.id);
                continue;
            }
            if !is_single_segment(&node.slug) {
                return Err(BuildError::InvalidSlug {
                    slug: node.slug.clone(),
                    id: node.id.clone(),
                });
            }
            if let Some(first) = seen.insert(&node.slug, &node.id) {
                return Err(BuildError::DuplicateSlug {
                    slug: node.slug.clone(),
                    first: first.to_string(),
                    second: node.id.clone(),
                });
            }
            posts.push(node);
        }

        Ok(posts)
    }

    /// Write `<public>/<path>/index.html`
    fn write_page(&self, path: &str, html: &str) -> Result<()> {
        let output_path = self
            .site
            .public_dir
            .join(path.trim_matches('/'))
            .join("index.html");

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html)?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Copy image files from every root to `<public>/static/<root>/...`
    fn copy_images(&self, sources: &ContentSources, options: &ImageOptions) -> Result<usize> {
        let static_dir = self.site.public_dir.join("static");
        let mut copied = 0;

        for root in sources.roots() {
            for file in root.files().filter(|f| is_image(&f.path, options)) {
                let dest: PathBuf = static_dir.join(&root.name).join(&file.relative);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(&file.path, &dest)?;
                tracing::debug!("Copied asset: {:?}", dest);
                copied += 1;
            }
        }

        Ok(copied)
    }
}

/// Output directory of a post, relative to the public dir. Served at the
/// percent-encoded link from `post_href`, which decodes back to it.
fn post_dir(blog_path: &str, slug: &str) -> String {
    format!("{}/{}", blog_path.trim_matches('/'), slug)
}

fn is_single_segment(slug: &str) -> bool {
    slug != "." && slug != ".." && !slug.contains(['/', '\\'])
}

fn is_image(path: &Path, options: &ImageOptions) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            options.extensions.iter().any(|ext| *ext == e)
        })
        .unwrap_or(false)
}
