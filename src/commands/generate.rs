//! Generate static files

use anyhow::Result;
use notify::{RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::generator::{BuildReport, Generator};
use crate::Site;

/// Full build: resolve roots, index them once, render every page
pub fn run(site: &Site) -> Result<()> {
    build(site).map(|_| ())
}

pub fn build(site: &Site) -> Result<BuildReport> {
    let start = std::time::Instant::now();

    let sources = site.sources()?;
    let index = site.index_sources(&sources)?;
    tracing::info!(
        "Indexed {} documents from {} content roots",
        index.len(),
        sources.roots().len()
    );

    let report = Generator::new(site)?.generate(&index, &sources)?;

    tracing::info!(
        "Generated {} pages, {} posts and {} assets in {:.2}s",
        report.pages,
        report.posts,
        report.assets,
        start.elapsed().as_secs_f64()
    );

    Ok(report)
}

/// Watch for file changes and rebuild
pub async fn watch(site: &Site) -> Result<()> {
    let site = site.clone();
    // The receive loop blocks, keep it off the async workers
    tokio::task::spawn_blocking(move || watch_blocking(&site)).await?
}

fn watch_blocking(site: &Site) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    let mut watched = Vec::new();
    sync_watches(&mut watcher, &mut watched, watched_paths(site)?)?;

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = std::time::Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    match reload(site) {
                        Ok(current) => {
                            if let Err(e) = run(&current) {
                                tracing::error!("Generation failed: {:#}", e);
                            }
                            if let Err(e) = watched_paths(&current)
                                .and_then(|paths| sync_watches(&mut watcher, &mut watched, paths))
                            {
                                tracing::warn!("Could not update watched paths: {:#}", e);
                            }
                        }
                        Err(e) => tracing::error!("Generation failed: {:#}", e),
                    }
                    last_rebuild = std::time::Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}

/// Content roots plus the config file of a site
pub fn watched_paths(site: &Site) -> Result<Vec<PathBuf>> {
    Ok(site
        .sources()?
        .roots()
        .iter()
        .map(|root| root.path.clone())
        .chain(site.config_path.clone())
        .collect())
}

/// Bring the watcher in line with `wanted`: new paths are watched,
/// paths no longer wanted are dropped
pub fn sync_watches(
    watcher: &mut dyn Watcher,
    watched: &mut Vec<PathBuf>,
    wanted: Vec<PathBuf>,
) -> Result<()> {
    let (added, removed) = diff_paths(watched, &wanted);

    for path in &removed {
        // The path may be gone already, which also ends the watch
        if let Err(e) = watcher.unwatch(path) {
            tracing::debug!("Unwatch {:?}: {}", path, e);
        }
        tracing::debug!("Stopped watching: {:?}", path);
    }

    for path in &added {
        let mode = if path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(path, mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    *watched = wanted;
    Ok(())
}

/// Paths only in `wanted`, and paths only in `current`
fn diff_paths(current: &[PathBuf], wanted: &[PathBuf]) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let added = wanted
        .iter()
        .filter(|p| !current.contains(p))
        .cloned()
        .collect();
    let removed = current
        .iter()
        .filter(|p| !wanted.contains(p))
        .cloned()
        .collect();
    (added, removed)
}

/// Re-read the configuration so edits to it take effect on rebuild
pub fn reload(site: &Site) -> Result<Site> {
    Site::new(&site.base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;

    #[test]
    fn test_diff_paths() {
        let a = PathBuf::from("/site/a");
        let b = PathBuf::from("/site/b");
        let c = PathBuf::from("/site/c");

        let (added, removed) = diff_paths(&[a.clone(), b.clone()], &[b.clone(), c.clone()]);
        assert_eq!(added, vec![c]);
        assert_eq!(removed, vec![a]);

        let (added, removed) = diff_paths(&[b.clone()], &[b]);
        assert!(added.is_empty() && removed.is_empty());
    }

    #[test]
    fn test_watched_paths_follow_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("blog")).unwrap();
        fs::create_dir_all(dir.path().join("notes")).unwrap();
        let config_path = dir.path().join("site.yml");
        fs::write(
            &config_path,
            "plugins:\n  - resolve: source-filesystem\n    options: { name: blog, path: ./blog }\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        let mut watcher = notify::recommended_watcher(|_: notify::Result<notify::Event>| {}).unwrap();
        let mut watched = Vec::new();
        sync_watches(&mut watcher, &mut watched, watched_paths(&site).unwrap()).unwrap();
        assert_eq!(watched, vec![dir.path().join("./blog"), config_path.clone()]);

        fs::write(
            &config_path,
            "plugins:\n  - resolve: source-filesystem\n    options: { name: notes, path: ./notes }\n",
        )
        .unwrap();
        let site = reload(&site).unwrap();
        sync_watches(&mut watcher, &mut watched, watched_paths(&site).unwrap()).unwrap();
        assert_eq!(watched, vec![dir.path().join("./notes"), config_path]);
    }

    #[test]
    fn test_watched_paths_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::with_config(dir.path().to_path_buf(), None, SiteConfig::default()).unwrap();
        assert!(watched_paths(&site).unwrap().is_empty());
    }
}
