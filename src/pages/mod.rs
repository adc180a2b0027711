//! Page renderers
//!
//! Every renderer is a pure, single-pass function of its input and the
//! shared [`Layout`]; nothing is retained between invocations.

pub mod about;
pub mod blog;
pub mod post;

use anyhow::Result;
use tera::Context;

use crate::config::SiteConfig;
use crate::helpers::{full_url_for, url_for};
use crate::templates::{NavLink, SiteData, TemplateRenderer};

pub use about::AboutPage;
pub use blog::{summaries, ArticleSummary, BlogListingPage, SummaryFormat};
pub use post::PostPage;

/// Shared page chrome: site metadata, navigation, document skeleton
pub struct Layout<'a> {
    renderer: &'a TemplateRenderer,
    site: SiteData,
    nav: Vec<NavLink>,
}

impl<'a> Layout<'a> {
    pub fn new(renderer: &'a TemplateRenderer, config: &SiteConfig) -> Self {
        let site = SiteData {
            title: config.site_metadata.title.clone(),
            site_url: config.site_metadata.site_url.clone(),
            language: config.language.clone(),
        };

        let nav = vec![
            NavLink {
                name: "About".to_string(),
                path: url_for(&[about::PATH]),
            },
            NavLink {
                name: "Blog".to_string(),
                path: url_for(&[config.blog_path.as_str()]),
            },
        ];

        Self {
            renderer,
            site,
            nav,
        }
    }

    /// Render `template` inside the layout for the page at `path`
    pub fn render(
        &self,
        template: &str,
        page_title: &str,
        path: &str,
        mut context: Context,
    ) -> Result<String> {
        context.insert("site", &self.site);
        context.insert("nav", &self.nav);
        context.insert("page_title", page_title);
        context.insert("canonical", &full_url_for(&self.site.site_url, path));
        self.renderer.render(template, &context)
    }
}
