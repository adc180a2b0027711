//! The static "About" page

use anyhow::Result;
use tera::Context;

use super::Layout;

pub const PATH: &str = "about";

const TITLE: &str = "About Me";

const PARAGRAPHS: [&str; 3] = [
    r#"Hi, my name is David O'Brien and I'm working as a software consultant which generally involves working teams of people to design and build systems. I'm currently working for <a href="http://www.codurance.com">Codurance</a> as one of their Principal Craftsment."#,
    "As well as being interested in using software to solve problems, I'm also a bit of an amateur cook and some of that will probably be represented in the posts I make.",
    "I've been promising that I'll blog more regularly for quite a long time so this is my effort to do that, mostly as a way of documenting some of the things I learn, as well as a way to make me more intentional about starting (and finishing) at least some of the projects I've been ruminating about the last decade or two.",
];

/// Fixed document: a title and a few paragraphs of trusted HTML
#[derive(Debug, Clone, Copy, Default)]
pub struct AboutPage;

impl AboutPage {
    pub fn title(&self) -> &'static str {
        TITLE
    }

    pub fn paragraphs(&self) -> &'static [&'static str] {
        &PARAGRAPHS
    }

    pub fn render(&self, layout: &Layout) -> Result<String> {
        let mut context = Context::new();
        context.insert("paragraphs", &PARAGRAPHS);
        layout.render("about.html", TITLE, PATH, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::templates::TemplateRenderer;

    #[test]
    fn test_render_about() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut config = SiteConfig::default();
        config.site_metadata.title = "David O'Brien : Personal Blog".to_string();
        let layout = Layout::new(&renderer, &config);

        let html = AboutPage.render(&layout).unwrap();
        assert!(html.contains("<title>About Me | David O'Brien : Personal Blog</title>"));
        assert!(html.contains(r#"<h1 class="heading">About Me</h1>"#));
        assert!(html.contains(r#"<a href="http://www.codurance.com">Codurance</a>"#));
        assert_eq!(html.matches("<p>").count(), AboutPage.paragraphs().len());
    }

    #[test]
    fn test_render_about_is_idempotent() {
        let renderer = TemplateRenderer::new().unwrap();
        let config = SiteConfig::default();
        let layout = Layout::new(&renderer, &config);

        let first = AboutPage.render(&layout).unwrap();
        let second = AboutPage.render(&layout).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }
}
