//! Declarative queries over the content index

use std::cmp::Ordering;
use std::str::FromStr;
use thiserror::Error;

use super::{ContentNode, NodeKind};

#[derive(Error, Debug, PartialEq)]
pub enum QueryError {
    #[error("Unknown field: {0}. Available: id, title, date, slug")]
    UnknownField(String),
    #[error("Unknown sort order: {0}. Available: asc, desc")]
    UnknownOrder(String),
}

/// Queryable node fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Title,
    Date,
    Slug,
}

impl FromStr for Field {
    type Err = QueryError;

    /// Accepts bare names and `frontmatter.`-qualified ones
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let name = name.strip_prefix("frontmatter.").unwrap_or(name);
        match name {
            "id" => Ok(Field::Id),
            "title" => Ok(Field::Title),
            "date" => Ok(Field::Date),
            "slug" => Ok(Field::Slug),
            _ => Err(QueryError::UnknownField(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(QueryError::UnknownOrder(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldFilter {
    NotNull(Field),
    Eq(Field, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: Field,
    pub order: SortOrder,
}

/// A read query: node-type filter, field filters and an optional sort
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeQuery {
    pub kind: Option<NodeKind>,
    pub source: Option<String>,
    pub filters: Vec<FieldFilter>,
    pub sort: Option<SortSpec>,
}

impl NodeQuery {
    /// Every dated document, newest first
    pub fn blog_listing() -> Self {
        Self {
            kind: None,
            source: None,
            filters: vec![FieldFilter::NotNull(Field::Date)],
            sort: Some(SortSpec {
                field: Field::Date,
                order: SortOrder::Desc,
            }),
        }
    }

    pub fn kind(mut self, kind: NodeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn filter(mut self, filter: FieldFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn sort_by(mut self, field: Field, order: SortOrder) -> Self {
        self.sort = Some(SortSpec { field, order });
        self
    }

    pub fn matches(&self, node: &ContentNode) -> bool {
        if self.kind.is_some_and(|kind| kind != node.kind) {
            return false;
        }
        if self.source.as_deref().is_some_and(|s| s != node.source) {
            return false;
        }
        self.filters.iter().all(|filter| match filter {
            FieldFilter::NotNull(field) => !is_null(node, *field),
            FieldFilter::Eq(field, value) => text_value(node, *field) == Some(value.as_str()),
        })
    }

    /// Run against a node sequence; sorting is stable
    pub fn apply<'a, I>(&self, nodes: I) -> Vec<&'a ContentNode>
    where
        I: IntoIterator<Item = &'a ContentNode>,
    {
        let mut matched: Vec<_> = nodes.into_iter().filter(|n| self.matches(n)).collect();

        if let Some(spec) = self.sort {
            matched.sort_by(|a, b| {
                let ord = compare(a, b, spec.field);
                match spec.order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }

        matched
    }
}

fn is_null(node: &ContentNode, field: Field) -> bool {
    match field {
        Field::Date => node.date.is_none(),
        Field::Id | Field::Title | Field::Slug => {
            text_value(node, field).map_or(true, str::is_empty)
        }
    }
}

fn text_value(node: &ContentNode, field: Field) -> Option<&str> {
    match field {
        Field::Id => Some(&node.id),
        Field::Title => Some(&node.title),
        Field::Slug => Some(&node.slug),
        Field::Date => None,
    }
}

fn compare(a: &ContentNode, b: &ContentNode, field: Field) -> Ordering {
    match field {
        Field::Date => a.date.cmp(&b.date),
        _ => text_value(a, field).cmp(&text_value(b, field)),
    }
}
