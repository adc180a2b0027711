//! List indexed content

use anyhow::Result;

use crate::content::{Field, NodeQuery, SortOrder};
use crate::helpers::format_date;
use crate::Site;

/// Options of the `list` command
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Restrict to one content root
    pub source: Option<String>,
    /// Sort field; the listing query is used when absent
    pub sort: Option<String>,
    pub ascending: bool,
    /// Include undated documents
    pub all: bool,
}

/// Build the query described by the options
pub fn query(options: &ListOptions) -> Result<NodeQuery> {
    let mut query = if options.all {
        NodeQuery::default()
    } else {
        NodeQuery::blog_listing()
    };

    if let Some(source) = &options.source {
        query = query.source(source.clone());
    }

    let order = if options.ascending {
        SortOrder::Asc
    } else {
        SortOrder::Desc
    };
    let field = match &options.sort {
        Some(name) => Some(name.parse::<Field>()?),
        None => query.sort.map(|s| s.field),
    };
    if let Some(field) = field {
        query = query.sort_by(field, order);
    }

    Ok(query)
}

pub fn run(site: &Site, options: &ListOptions) -> Result<()> {
    let query = query(options)?;
    let index = site.build_index()?;
    let nodes = index.query(&query);

    println!("Documents ({}):", nodes.len());
    for node in nodes {
        let date = node
            .date
            .map(|d| format_date(&d, "YYYY-MM-DD"))
            .unwrap_or_else(|| "----------".to_string());
        println!("  {} - {} [{}]", date, node.title, node.id);
    }

    Ok(())
}
