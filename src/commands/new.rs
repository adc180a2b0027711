//! Scaffold a new post

use anyhow::{anyhow, Result};
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Create `<root>/<slug>.md` with title, date and slug front-matter
pub fn create_post(site: &Site, title: &str, source: &str, slug: Option<&str>) -> Result<PathBuf> {
    let sources = site.sources()?;
    let root = sources.get(source).ok_or_else(|| {
        let available: Vec<_> = sources.roots().iter().map(|r| r.name.as_str()).collect();
        anyhow!(
            "Unknown content root: {}. Available: {}",
            source,
            available.join(", ")
        )
    })?;

    let slug = match slug {
        Some(s) => s.to_string(),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from title {:?}", title);
    }

    let file_path = root.path.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Local::now();
    let content = format!(
        "---\ntitle: {}\ndate: {}\nslug: {}\n---\n\n",
        serde_json::to_string(title)?,
        now.format("%Y-%m-%d %H:%M:%S"),
        slug
    );

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MdxOptions;
    use crate::content::DocumentLoader;

    fn site_with_blog() -> (tempfile::TempDir, Site) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("blog")).unwrap();
        fs::write(
            dir.path().join("site.yml"),
            "plugins:\n  - mdx\n  - resolve: source-filesystem\n    options: { name: blog, path: ./blog }\n",
        )
        .unwrap();
        let site = Site::new(dir.path()).unwrap();
        (dir, site)
    }

    #[test]
    fn test_create_post() {
        let (_dir, site) = site_with_blog();
        let path = create_post(&site, "Hello World: \"Part 1\"", "blog", None).unwrap();
        assert!(path.ends_with("blog/hello-world-part-1.md"));

        let content = fs::read_to_string(&path).unwrap();
        let node = DocumentLoader::new(MdxOptions::default(), false)
            .load_str("blog", "hello-world-part-1.md", &content)
            .unwrap()
            .unwrap();
        assert_eq!(node.title, "Hello World: \"Part 1\"");
        assert_eq!(node.slug, "hello-world-part-1");
        assert!(node.date.is_some());

        let err = create_post(&site, "Hello World: \"Part 1\"", "blog", None).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_unknown_root() {
        let (_dir, site) = site_with_blog();
        let err = create_post(&site, "Title", "drafts", None).unwrap_err();
        assert!(err.to_string().contains("Unknown content root: drafts"));
    }
}
