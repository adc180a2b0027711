//! Content index - the build-scoped, read-only snapshot of all documents

use anyhow::Result;
use std::collections::HashMap;

use super::loader::DocumentLoader;
use super::query::NodeQuery;
use super::sources::ContentSources;
use super::ContentNode;

/// Immutable collection of content nodes, built once before rendering
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    nodes: Vec<ContentNode>,
    by_id: HashMap<String, usize>,
}

impl ContentIndex {
    /// Scan every root exactly once. Without a loader the index is empty.
    pub fn build(sources: &ContentSources, loader: Option<&DocumentLoader>) -> Result<Self> {
        let Some(loader) = loader else {
            tracing::debug!("No document transformer enabled, index is empty");
            return Ok(Self::default());
        };

        let mut nodes = Vec::new();
        for root in sources.roots() {
            let before = nodes.len();
            for file in root.files().filter(|f| loader.accepts(&f.path)) {
                if let Some(node) = loader.load(root, &file)? {
                    nodes.push(node);
                }
            }
            tracing::debug!("Indexed {} documents from {}", nodes.len() - before, root.name);
        }

        Ok(Self::from_nodes(nodes))
    }

    /// Build from already loaded nodes, in the given order
    pub fn from_nodes(nodes: Vec<ContentNode>) -> Self {
        let mut by_id = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if by_id.insert(node.id.clone(), i).is_some() {
                tracing::warn!("Duplicate node id {}, keeping the last one for lookups", node.id);
            }
        }
        Self { nodes, by_id }
    }

    pub fn nodes(&self) -> &[ContentNode] {
        &self.nodes
    }

    pub fn get(&self, id: &str) -> Option<&ContentNode> {
        self.by_id.get(id).map(|&i| &self.nodes[i])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn query(&self, query: &NodeQuery) -> Vec<&ContentNode> {
        query.apply(&self.nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MdxOptions;
    use crate::content::ContentRoot;
    use std::fs;

    #[test]
    fn test_build_index() {
        let dir = tempfile::tempdir().unwrap();
        let blog = dir.path().join("blog");
        let images = dir.path().join("images");
        fs::create_dir_all(&blog).unwrap();
        fs::create_dir_all(&images).unwrap();
        fs::write(
            blog.join("first.md"),
            "---\ntitle: First\ndate: 2023-01-01\nslug: first\n---\nHello",
        )
        .unwrap();
        fs::write(blog.join("notes.mdx"), "---\ntitle: Notes\n---\nUndated").unwrap();
        fs::write(images.join("cover.png"), [0u8; 4]).unwrap();

        let sources = ContentSources::new(vec![
            ContentRoot::new("images", &images),
            ContentRoot::new("blog", &blog),
        ]);
        let loader = DocumentLoader::new(MdxOptions::default(), false);
        let index = ContentIndex::build(&sources, Some(&loader)).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("blog:first.md").unwrap().title, "First");
        assert!(index.get("images:cover.png").is_none());

        let listed = index.query(&NodeQuery::blog_listing());
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].slug, "first");
    }

    #[test]
    fn test_no_transformer_gives_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "---\ntitle: A\n---\n").unwrap();
        let sources = ContentSources::new(vec![ContentRoot::new("blog", dir.path())]);

        let index = ContentIndex::build(&sources, None).unwrap();
        assert!(index.is_empty());
        assert!(index.query(&NodeQuery::blog_listing()).is_empty());
    }
}
