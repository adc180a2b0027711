//! Single blog post page

use anyhow::Result;
use tera::Context;

use super::blog::SummaryFormat;
use super::Layout;
use crate::content::ContentNode;
use crate::helpers::{date_xml, format_date, post_href};

/// Full page for one listed document, served at its listing link
pub struct PostPage<'a> {
    node: &'a ContentNode,
}

impl<'a> PostPage<'a> {
    pub fn new(node: &'a ContentNode) -> Self {
        Self { node }
    }

    /// Site path, identical to the listing's link target
    pub fn path(&self, format: &SummaryFormat) -> String {
        post_href(&format.blog_path, &self.node.slug)
    }

    pub fn render(&self, layout: &Layout, format: &SummaryFormat) -> Result<String> {
        let mut context = Context::new();
        context.insert("body", &self.node.body_html);
        context.insert(
            "date",
            &self
                .node
                .date
                .map(|d| format_date(&d, &format.date_format))
                .unwrap_or_default(),
        );
        context.insert(
            "datetime",
            &self.node.date.map(|d| date_xml(&d)).unwrap_or_default(),
        );
        layout.render("post.html", &self.node.title, &self.path(format), context)
    }
}
