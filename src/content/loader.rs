//! Document loader - turns Markdown/MDX files into content nodes

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::markdown::{self, MarkdownRenderer, MORE_MARKER};
use super::sources::{ContentRoot, SourceFile};
use super::{ContentNode, FrontMatter, NodeKind};
use crate::config::MdxOptions;

/// Loads documents enabled by the `mdx` plugin
pub struct DocumentLoader {
    options: MdxOptions,
    renderer: MarkdownRenderer,
    render_drafts: bool,
}

impl DocumentLoader {
    pub fn new(options: MdxOptions, render_drafts: bool) -> Self {
        Self {
            options,
            renderer: MarkdownRenderer::new(),
            render_drafts,
        }
    }

    /// Whether the file has one of the enabled extensions
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let e = e.to_ascii_lowercase();
                self.options.extensions.iter().any(|ext| *ext == e)
            })
            .unwrap_or(false)
    }

    /// Load a single document; drafts yield `None` unless drafts are rendered
    pub fn load(&self, root: &ContentRoot, file: &SourceFile) -> Result<Option<ContentNode>> {
        let content = fs::read_to_string(&file.path)
            .with_context(|| format!("Failed to read {:?}", file.path))?;
        self.load_str(&root.name, &file.relative, &content)
            .with_context(|| format!("Failed to load {}:{}", root.name, file.relative))
    }

    pub fn load_str(
        &self,
        source: &str,
        relative_path: &str,
        content: &str,
    ) -> Result<Option<ContentNode>> {
        let (fm, body) = FrontMatter::parse(content)?;

        if fm.draft && !self.render_drafts {
            tracing::debug!("Skipping draft {}:{}", source, relative_path);
            return Ok(None);
        }

        let mut node = ContentNode::new(source, relative_path);

        let body = match node.kind {
            NodeKind::Mdx => markdown::strip_mdx_esm(body),
            NodeKind::Markdown => body.to_string(),
        };

        node.date = fm.parse_date();
        if node.date.is_none() {
            if let Some(raw) = &fm.date {
                tracing::warn!(
                    "Unrecognised date {:?} in {}, treating as undated",
                    raw,
                    node.id
                );
            }
        }

        node.excerpt = markdown::excerpt(&body, self.options.excerpt_length);
        node.body_html = self.renderer.render(&body.replacen(MORE_MARKER, "", 1))?;
        node.title = fm.title.unwrap_or_default();
        node.slug = fm.slug.unwrap_or_default();

        Ok(Some(node))
    }
}
