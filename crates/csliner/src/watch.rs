//! Watch mode.
//!
//! After an initial pass the project root is watched recursively. Changes to
//! markup, stylesheets or the configuration file trigger a new pass, one at a
//! time. Editors tend to emit several events per save, so a modification is
//! only acted upon when the file's timestamp moved by at least [`DEBOUNCE`]
//! since the last one seen; creations and removals always trigger.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use log::{debug, error, info};
use notify::{Event, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::build::{Builder, run_pass};
use crate::config::{CONFIG_FILE, Config};
use crate::error::Result;
use crate::files::{PathFilter, find_files};
use crate::progress::Progress;

pub const DEBOUNCE: Duration = Duration::from_millis(100);

const WATCHED_EXTENSIONS: [&str; 2] = ["html", "css"];

/// Last seen modification time per path.
#[derive(Clone, Debug)]
pub struct MtimeCache {
    seen: HashMap<PathBuf, SystemTime>,
    threshold: Duration,
}

impl Default for MtimeCache {
    fn default() -> Self {
        Self::new(DEBOUNCE)
    }
}

impl MtimeCache {
    pub fn new(threshold: Duration) -> Self {
        Self {
            seen: HashMap::new(),
            threshold,
        }
    }

    /// Records the current timestamps of `paths` without triggering.
    pub fn prime(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        for path in paths {
            if let Some(mtime) = modified(&path) {
                self.seen.insert(path, mtime);
            }
        }
    }

    /// Records a change at `path` and returns whether it warrants a pass.
    pub fn observe(&mut self, path: &Path) -> bool {
        let Some(mtime) = modified(path) else {
            // removed
            self.seen.remove(path);
            return true;
        };
        match self.seen.get(path) {
            Some(&last) if distance(last, mtime) < self.threshold => false,
            _ => {
                self.seen.insert(path.to_path_buf(), mtime);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn distance(a: SystemTime, b: SystemTime) -> Duration {
    a.duration_since(b).unwrap_or_else(|e| e.duration())
}

/// Whether a changed path can affect the output.
pub fn is_relevant(root: &Path, path: &Path, filter: &PathFilter) -> bool {
    if path == Config::path(root) {
        return true;
    }
    let watched = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| WATCHED_EXTENSIONS.iter().any(|w| ext.eq_ignore_ascii_case(w)));
    watched && !filter.is_excluded(path)
}

fn current_filter(root: &Path) -> PathFilter {
    let config = Config::load(root).unwrap_or_default();
    PathFilter::from_config(root, &config)
}

/// Builds once, then rebuilds on every relevant change until the watcher
/// channel closes.
pub async fn watch(root: PathBuf, progress: &Progress) -> Result<()> {
    let (mut builder, result) = run_pass(Builder::new(root.clone()), progress).await;
    if let Err(e) = result {
        error!("build failed: {e}");
    }

    let (sender, mut events) = mpsc::unbounded_channel::<notify::Result<Event>>();
    let mut watcher = notify::recommended_watcher(move |event: notify::Result<Event>| {
        let _ = sender.send(event);
    })?;
    watcher.watch(&root, RecursiveMode::Recursive)?;

    let mut cache = MtimeCache::default();
    let filter = current_filter(&root);
    for extension in WATCHED_EXTENSIONS {
        if let Ok(files) = find_files(&root, extension, &filter) {
            cache.prime(files);
        }
    }
    cache.prime([Config::path(&root)]);
    info!("watching {} for changes", root.display());

    while let Some(event) = events.recv().await {
        let event = match event {
            Ok(event) => event,
            Err(e) => {
                error!("watch error: {e}");
                continue;
            }
        };

        let filter = current_filter(&root);
        let mut triggered = false;
        for path in &event.paths {
            if is_relevant(&root, path, &filter) && cache.observe(path) {
                debug!("change detected: {}", path.display());
                triggered = true;
            }
        }
        if !triggered {
            continue;
        }

        let (next, result) = run_pass(builder, progress).await;
        builder = next;
        if let Err(e) = result {
            error!("build failed: {e}");
        }
    }
    Ok(())
}
