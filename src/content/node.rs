//! Content node model

use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::Path;

/// Document flavour, decided by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Markdown,
    Mdx,
}

impl NodeKind {
    pub fn from_path(path: &Path) -> Self {
        let is_mdx = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("mdx"))
            .unwrap_or(false);
        if is_mdx {
            NodeKind::Mdx
        } else {
            NodeKind::Markdown
        }
    }
}

/// One indexed content document
#[derive(Debug, Clone, Serialize)]
pub struct ContentNode {
    /// `<root name>:<relative path>`, unique across the index
    pub id: String,

    pub title: String,

    /// Publication date; undated nodes never appear in the blog listing
    pub date: Option<NaiveDateTime>,

    pub slug: String,

    /// Plain-text summary of the body
    pub excerpt: String,

    pub kind: NodeKind,

    /// Name of the content root the document came from
    pub source: String,

    /// Path relative to its content root, `/`-separated
    pub relative_path: String,

    /// Rendered body
    #[serde(skip)]
    pub body_html: String,
}

impl ContentNode {
    pub fn make_id(source: &str, relative_path: &str) -> String {
        format!("{}:{}", source, relative_path)
    }

    /// Minimal node, mostly useful to build fixtures
    pub fn new(source: &str, relative_path: &str) -> Self {
        Self {
            id: Self::make_id(source, relative_path),
            title: String::new(),
            date: None,
            slug: String::new(),
            excerpt: String::new(),
            kind: NodeKind::from_path(Path::new(relative_path)),
            source: source.to_string(),
            relative_path: relative_path.to_string(),
            body_html: String::new(),
        }
    }
}
