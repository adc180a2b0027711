//! Content module - sources, documents, and the queryable index

mod frontmatter;
mod index;
pub mod loader;
pub mod markdown;
mod node;
pub mod query;
pub mod sources;

pub use frontmatter::FrontMatter;
pub use index::ContentIndex;
pub use loader::DocumentLoader;
pub use markdown::MarkdownRenderer;
pub use node::{ContentNode, NodeKind};
pub use query::{Field, FieldFilter, NodeQuery, QueryError, SortOrder, SortSpec};
pub use sources::{ContentRoot, ContentSources};
