//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Site;

/// Remove the generated output
pub fn run(site: &Site) -> Result<()> {
    if site.public_dir.exists() {
        fs::remove_dir_all(&site.public_dir)?;
        tracing::info!("Deleted: {:?}", site.public_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn test_clean_removes_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::with_config(dir.path().to_path_buf(), None, SiteConfig::default()).unwrap();
        fs::create_dir_all(site.public_dir.join("blog")).unwrap();

        run(&site).unwrap();
        assert!(!site.public_dir.exists());

        // Nothing to clean is fine
        run(&site).unwrap();
    }
}
