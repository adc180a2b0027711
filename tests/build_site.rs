use std::fs;
use std::path::Path;

use blogsite::commands::generate;
use blogsite::config::ConfigError;
use blogsite::generator::BuildError;
use blogsite::Site;

const CONFIG: &str = r#"
siteMetadata:
  title: "David O'Brien : Personal Blog"
  siteUrl: https://davidobrien.uk
plugins:
  - image
  - mdx
  - resolve: source-filesystem
    options:
      name: images
      path: ./src/images/
    __key: images
  - resolve: source-filesystem
    options:
      name: pages
      path: ./src/pages/
    __key: pages
  - resolve: source-filesystem
    options:
      name: blog
      path: ./blog
    __key: blog
"#;

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn post(title: &str, date: Option<&str>, slug: &str) -> String {
    let date = date.map(|d| format!("date: {}\n", d)).unwrap_or_default();
    format!(
        "---\ntitle: {}\n{}slug: {}\n---\n\nThis is {}.\n",
        title, date, slug, title
    )
}

fn site_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(&root.join("site.yml"), CONFIG);
    write(&root.join("src/images/logo.png"), "png");
    write(&root.join("src/pages/colophon.md"), "---\ntitle: Colophon\n---\nBuilt with Rust.");
    write(
        &root.join("blog/new-year.mdx"),
        &post("New Year", Some("2023-01-01"), "new-year"),
    );
    write(
        &root.join("blog/summer.md"),
        &post("Summer", Some("2023-06-01"), "hello-world"),
    );
    write(
        &root.join("blog/winter.md"),
        &post("Winter", Some("2022-12-01"), "winter"),
    );
    write(&root.join("blog/ideas.md"), &post("Ideas", None, "ideas"));
    dir
}

#[test]
fn builds_the_whole_site() {
    let dir = site_dir();
    let site = Site::new(dir.path()).unwrap();

    let report = generate::build(&site).unwrap();
    assert_eq!(report.pages, 2);
    assert_eq!(report.posts, 3);
    assert_eq!(report.assets, 1);

    let public = dir.path().join("public");
    let listing = fs::read_to_string(public.join("blog/index.html")).unwrap();

    let summer = listing.find(r#"<a href="/blog/hello-world">Summer</a>"#).unwrap();
    let new_year = listing.find(r#"<a href="/blog/new-year">New Year</a>"#).unwrap();
    let winter = listing.find(r#"<a href="/blog/winter">Winter</a>"#).unwrap();
    assert!(summer < new_year && new_year < winter);
    assert!(!listing.contains("Ideas"));
    assert!(!listing.contains("Colophon"));
    assert!(listing.contains("<p>Posted: June 1, 2023</p>"));
    assert!(listing.contains("<p>This is Summer.</p>"));
    assert_eq!(listing.matches("<article>").count(), 3);

    assert!(public.join("blog/hello-world/index.html").exists());
    assert!(!public.join("blog/ideas/index.html").exists());
    assert!(public.join("static/images/logo.png").exists());

    let about = fs::read_to_string(public.join("about/index.html")).unwrap();
    assert!(about.contains("<title>About Me | David O'Brien : Personal Blog</title>"));
}

#[test]
fn about_page_is_byte_identical_across_builds() {
    let dir = site_dir();
    let site = Site::new(dir.path()).unwrap();
    let about = dir.path().join("public/about/index.html");

    generate::run(&site).unwrap();
    let first = fs::read(&about).unwrap();
    generate::run(&site).unwrap();
    let second = fs::read(&about).unwrap();

    assert_eq!(first, second);
}

#[test]
fn empty_site_builds_an_empty_listing() {
    let dir = tempfile::tempdir().unwrap();
    let site = Site::new(dir.path()).unwrap();

    let report = generate::build(&site).unwrap();
    assert_eq!(report.posts, 0);

    let listing = fs::read_to_string(dir.path().join("public/blog/index.html")).unwrap();
    assert!(listing.contains("My Blog Posts"));
    assert!(!listing.contains("<article>"));
}

#[test]
fn missing_root_aborts_the_build() {
    let dir = site_dir();
    fs::remove_dir_all(dir.path().join("src/images")).unwrap();
    let site = Site::new(dir.path()).unwrap();

    let err = generate::build(&site).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::MissingPath { name, .. }) if name == "images"
    ));
    assert!(!dir.path().join("public").exists());
}

#[test]
fn slug_outside_the_blog_dir_aborts_the_build() {
    for slug in [".", "../../escaped"] {
        let dir = site_dir();
        write(
            &dir.path().join("blog/rogue.md"),
            &post("Rogue", Some("2023-03-01"), slug),
        );
        let site = Site::new(dir.path()).unwrap();

        let err = generate::build(&site).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::InvalidSlug { id, .. }) if id == "blog:rogue.md"
        ));
        assert!(!dir.path().join("public/blog/index.html").exists());
        assert!(!dir.path().join("escaped").exists());
    }
}
