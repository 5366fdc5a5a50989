//! Project configuration (`csliner.config.json`).
//!
//! ```json
//! {
//!   "BUILD_PATH": "build/",
//!   "HTML_PATHS": ["."],
//!   "CSS_PATHS": ["styles", { "path": "vendor", "priority": -1 }],
//!   "IGNORE_PATHS": ["drafts"],
//!   "SET_CLASSES": { "z": { "rename": "zi", "priority": 90 } },
//!   "SET_UNITS_PRECISION": { "px": 1 },
//!   "MERGE_SAME_SELECTORS": false
//! }
//! ```
//!
//! Every key is optional. The `*_PATHES` spellings are accepted as aliases.
//! Relative paths resolve against the project root.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use ucss::{ClassOverride, Overrides, ReassemblyMode};

use crate::error::{CslinerError, Result};

pub const CONFIG_FILE: &str = "csliner.config.json";

/// Output file name used when `BUILD_PATH` does not name a stylesheet.
pub const DEFAULT_OUTPUT: &str = "app.css";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "BUILD_PATH")]
    pub build_path: PathBuf,

    #[serde(rename = "HTML_PATHS", alias = "HTML_PATHES")]
    pub html_paths: Vec<PathBuf>,

    #[serde(rename = "CSS_PATHS", alias = "CSS_PATHES")]
    pub css_paths: Vec<CssRoot>,

    #[serde(rename = "IGNORE_PATHS", alias = "IGNORE_PATHES")]
    pub ignore_paths: Vec<PathBuf>,

    #[serde(rename = "SET_CLASSES")]
    pub set_classes: IndexMap<String, ClassSettings>,

    #[serde(rename = "SET_UNITS_PRECISION")]
    pub set_units_precision: IndexMap<String, u32>,

    #[serde(rename = "MERGE_SAME_SELECTORS")]
    pub merge_same_selectors: bool,

    #[serde(rename = "TEMPLATE_PATH", skip_serializing_if = "Option::is_none")]
    pub template_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            build_path: PathBuf::from("build/"),
            html_paths: vec![PathBuf::from(".")],
            css_paths: Vec::new(),
            ignore_paths: Vec::new(),
            set_classes: IndexMap::new(),
            set_units_precision: IndexMap::new(),
            merge_same_selectors: false,
            template_path: None,
        }
    }
}

/// A CSS input root, optionally weighted. Lower priorities are concatenated first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CssRoot {
    Path(PathBuf),
    Weighted {
        path: PathBuf,
        #[serde(default)]
        priority: f64,
    },
}

impl CssRoot {
    pub fn path(&self) -> &Path {
        match self {
            CssRoot::Path(path) | CssRoot::Weighted { path, .. } => path,
        }
    }

    pub fn priority(&self) -> f64 {
        match self {
            CssRoot::Path(_) => 0.0,
            CssRoot::Weighted { priority, .. } => *priority,
        }
    }
}

/// One `SET_CLASSES` entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
}

impl From<&ClassSettings> for ClassOverride {
    fn from(settings: &ClassSettings) -> Self {
        ClassOverride {
            rename: settings.rename.clone(),
            unit: settings.unit.clone(),
            priority: settings.priority,
            precision: settings.precision,
        }
    }
}

impl Config {
    pub fn path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    /// Reads the configuration of the project at `root`.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path(root);
        if !path.is_file() {
            return Err(CslinerError::ConfigMissing(path));
        }
        let text = fs::read_to_string(&path)?;
        let config =
            serde_json::from_str(&text).map_err(|source| CslinerError::ConfigInvalid { path, source })?;
        debug!("loaded configuration from {}", root.display());
        Ok(config)
    }

    /// Writes the default configuration unless one exists. Returns whether
    /// a file was written.
    pub fn init(root: &Path) -> Result<bool> {
        let path = Self::path(root);
        if path.exists() {
            return Ok(false);
        }
        let text = serde_json::to_string_pretty(&Self::default()).map_err(|source| {
            CslinerError::ConfigInvalid {
                path: path.clone(),
                source,
            }
        })?;
        fs::write(&path, text + "\n")?;
        Ok(true)
    }

    /// Class overrides followed by unit precisions, in file order.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            classes: self
                .set_classes
                .iter()
                .map(|(key, settings)| (key.clone(), ClassOverride::from(settings)))
                .collect(),
            unit_precision: self
                .set_units_precision
                .iter()
                .map(|(unit, precision)| (unit.clone(), *precision))
                .collect(),
        }
    }

    pub fn mode(&self) -> ReassemblyMode {
        if self.merge_same_selectors {
            ReassemblyMode::Merge
        } else {
            ReassemblyMode::Concat
        }
    }

    /// Markup roots, defaulting to the project root when none are listed.
    pub fn html_roots(&self, root: &Path) -> Vec<PathBuf> {
        if self.html_paths.is_empty() {
            return vec![root.to_path_buf()];
        }
        self.html_paths.iter().map(|p| resolve(root, p)).collect()
    }

    /// CSS roots in ascending priority, stable for equal priorities.
    pub fn css_roots(&self, root: &Path) -> Vec<PathBuf> {
        let mut roots: Vec<&CssRoot> = self.css_paths.iter().collect();
        roots.sort_by(|a, b| a.priority().total_cmp(&b.priority()));
        roots.into_iter().map(|r| resolve(root, r.path())).collect()
    }

    pub fn ignore_roots(&self, root: &Path) -> Vec<PathBuf> {
        self.ignore_paths.iter().map(|p| resolve(root, p)).collect()
    }

    /// The stylesheet file a build writes.
    ///
    /// A `.css` path is used as is, a path with any other extension gets
    /// `app.css` next to it, anything else is treated as a directory.
    pub fn output_path(&self, root: &Path) -> PathBuf {
        let path = resolve(root, &self.build_path);
        match path.extension() {
            Some(ext) if ext == "css" => path,
            Some(_) => path
                .parent()
                .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), |dir| dir.join(DEFAULT_OUTPUT)),
            None => path.join(DEFAULT_OUTPUT),
        }
    }

    pub fn output_dir(&self, root: &Path) -> PathBuf {
        let output = self.output_path(root);
        output.parent().map_or_else(|| root.to_path_buf(), Path::to_path_buf)
    }
}

/// Joins relative paths onto `root`, dropping `.` components.
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };
    joined
        .components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect()
}
