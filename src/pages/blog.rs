//! The blog listing page

use anyhow::Result;
use serde::Serialize;
use tera::Context;

use super::Layout;
use crate::config::SiteConfig;
use crate::content::{ContentIndex, ContentNode, NodeQuery};
use crate::helpers::{format_date, post_href};

const TITLE: &str = "My Blog Posts";

/// Rendering-ready projection of a content node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleSummary {
    pub title: String,
    pub href: String,
    /// Publication date, already formatted
    pub date: String,
    pub excerpt: String,
}

/// How summaries link and format dates
#[derive(Debug, Clone)]
pub struct SummaryFormat {
    pub blog_path: String,
    pub date_format: String,
}

impl SummaryFormat {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            blog_path: config.blog_path.clone(),
            date_format: config.date_format.clone(),
        }
    }

    pub fn summarize(&self, node: &ContentNode) -> ArticleSummary {
        ArticleSummary {
            title: node.title.clone(),
            href: post_href(&self.blog_path, &node.slug),
            date: node
                .date
                .map(|d| format_date(&d, &self.date_format))
                .unwrap_or_default(),
            excerpt: node.excerpt.clone(),
        }
    }
}

impl Default for SummaryFormat {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default())
    }
}

/// Lazily project nodes to summaries; summary `i` is built from node `i`
pub fn summaries<'a, I>(
    nodes: I,
    format: &'a SummaryFormat,
) -> impl Iterator<Item = ArticleSummary> + 'a
where
    I: IntoIterator<Item = &'a ContentNode>,
    I::IntoIter: 'a,
{
    nodes.into_iter().map(move |node| format.summarize(node))
}

/// Listing of every dated document, newest first
pub struct BlogListingPage {
    format: SummaryFormat,
}

impl BlogListingPage {
    pub fn new(format: SummaryFormat) -> Self {
        Self { format }
    }

    pub fn title(&self) -> &'static str {
        TITLE
    }

    /// The listing, in query order
    pub fn articles(&self, index: &ContentIndex) -> Vec<ArticleSummary> {
        let nodes = index.query(&NodeQuery::blog_listing());
        tracing::debug!("Blog listing nodes ({}): {:#?}", nodes.len(), nodes);
        summaries(nodes, &self.format).collect()
    }

    pub fn render(&self, index: &ContentIndex, layout: &Layout) -> Result<String> {
        let mut context = Context::new();
        context.insert("posts", &self.articles(index));
        layout.render("blog.html", TITLE, &self.format.blog_path, context)
    }
}
