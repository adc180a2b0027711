//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left as-is in a path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode one path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Join path segments into an absolute site path
///
/// # Examples
/// ```ignore
/// url_for(&["blog", "hello-world"]) // -> "/blog/hello-world"
/// ```
pub fn url_for(segments: &[&str]) -> String {
    let joined = segments
        .iter()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{}", joined)
}

/// Link target of a blog post: `/<blog path>/<slug>`
///
/// An empty slug is not rejected; it yields `/<blog path>/`.
pub fn post_href(blog_path: &str, slug: &str) -> String {
    format!("{}/{}", url_for(&[blog_path]).trim_end_matches('/'), encode_segment(slug))
}

/// Generate a full URL including the domain
pub fn full_url_for(site_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        site_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
