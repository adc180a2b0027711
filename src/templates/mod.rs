//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary; there is no theme directory.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Paths and trusted HTML go through untouched; user text is escaped
        // explicitly with `escape_text`
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("about.html", include_str!("site/about.html")),
            ("blog.html", include_str!("site/blog.html")),
            ("post.html", include_str!("site/post.html")),
        ])?;

        tera.register_filter("escape_text", escape_text_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: escape text for HTML element and attribute content
fn escape_text_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("escape_text", "value", String, value);
    Ok(tera::Value::String(escape_text(&s)))
}

pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub site_url: String,
    pub language: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub name: String,
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("Tom & \"Jerry\" <3"), "Tom &amp; &quot;Jerry&quot; &lt;3");
        assert_eq!(escape_text("David O'Brien"), "David O'Brien");
    }

    #[test]
    fn test_templates_load() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert(
            "site",
            &SiteData {
                title: "Blog".to_string(),
                site_url: "https://example.com".to_string(),
                language: "en".to_string(),
            },
        );
        context.insert("nav", &Vec::<NavLink>::new());
        context.insert("page_title", "Hello & Welcome");
        context.insert("canonical", "");
        context.insert("paragraphs", &vec!["One"]);

        let html = renderer.render("about.html", &context).unwrap();
        assert!(html.contains("<title>Hello &amp; Welcome | Blog</title>"));
        assert!(html.contains("<p>One</p>"));
    }
}
