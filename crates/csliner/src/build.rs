//! The build pass.
//!
//! One pass reads the configuration, scans every markup file for class
//! tokens, compiles them, fills the template, re-assembles it together with
//! the author stylesheets and writes the result once. Per-file failures are
//! logged and skipped; a missing configuration, an empty markup set or an
//! unwritable output abort the pass without touching the previous output.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use ucss::{ClassCollector, Compiler, Template};

use crate::config::Config;
use crate::error::{CslinerError, Result};
use crate::files::{PathFilter, find_files};
use crate::progress::Progress;

/// Summary of a successful pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildReport {
    pub output: PathBuf,
    pub markup_files: usize,
    pub css_files: usize,
    pub classes: usize,
    pub rules: usize,
}

/// Runs build passes for one project, reusing the compiler while the class
/// and unit overrides stay the same.
#[derive(Debug)]
pub struct Builder {
    root: PathBuf,
    compiler: Option<Compiler>,
}

impl Builder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            compiler: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Runs one full pass.
    pub fn build(&mut self) -> Result<BuildReport> {
        let config = Config::load(&self.root)?;
        let filter = PathFilter::from_config(&self.root, &config);

        let markup_roots = config.html_roots(&self.root);
        let markup_files = self.collect(&markup_roots, "html", &filter);
        if markup_files.is_empty() {
            return Err(CslinerError::NoMarkupFiles(markup_roots));
        }

        let mut classes = ClassCollector::new();
        for file in &markup_files {
            match fs::read_to_string(file) {
                Ok(markup) => classes.add_markup(&markup),
                Err(e) => error!("cannot read {}: {e}", file.display()),
            }
        }
        debug!(
            "{} distinct class tokens in {} markup files",
            classes.len(),
            markup_files.len()
        );

        let template = self.template(&config);
        let (author_css, css_files) = self.author_css(&config, &filter);

        let compiler = self.compiler(&config)?;
        let groups = compiler.compile_markup(&classes);
        let css = compiler.assemble(&template, &groups, author_css.as_deref(), config.mode());

        let output = config.output_path(&self.root);
        write_output(&output, &css)?;

        let report = BuildReport {
            output,
            markup_files: markup_files.len(),
            css_files,
            classes: classes.len(),
            rules: groups.len(),
        };
        info!(
            "built {} ({} rules from {} classes)",
            report.output.display(),
            report.rules,
            report.classes
        );
        Ok(report)
    }

    fn compiler(&mut self, config: &Config) -> Result<&Compiler> {
        let overrides = config.overrides();
        let compiler = match self.compiler.take() {
            Some(compiler) if compiler.overrides() == &overrides => compiler,
            _ => {
                debug!(
                    "building compiler with {} class overrides",
                    overrides.classes.len()
                );
                Compiler::with_overrides(&overrides)?
            }
        };
        Ok(&*self.compiler.insert(compiler))
    }

    fn collect(&self, roots: &[PathBuf], extension: &str, filter: &PathFilter) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for root in roots {
            match find_files(root, extension, filter) {
                Ok(found) => files.extend(found),
                Err(e) => error!("cannot search {}: {e}", root.display()),
            }
        }
        files
    }

    fn template(&self, config: &Config) -> Template {
        let Some(path) = &config.template_path else {
            return Template::builtin();
        };
        let path = crate::config::resolve(&self.root, path);
        match fs::read_to_string(&path) {
            Ok(source) => Template::new(source),
            Err(e) => {
                error!("cannot read template {}: {e}, using the built-in one", path.display());
                Template::builtin()
            }
        }
    }

    /// Author stylesheets in root-priority order, each followed by a blank line.
    fn author_css(&self, config: &Config, filter: &PathFilter) -> (Option<String>, usize) {
        if config.css_paths.is_empty() {
            return (None, 0);
        }
        let files = self.collect(&config.css_roots(&self.root), "css", filter);
        if files.is_empty() {
            warn!("no css files found under CSS_PATHS");
            return (None, 0);
        }

        let mut css = String::new();
        let mut read = 0;
        for file in &files {
            match fs::read_to_string(file) {
                Ok(text) => {
                    css.push_str(&text);
                    css.push_str("\n\n");
                    read += 1;
                }
                Err(e) => error!("cannot read {}: {e}", file.display()),
            }
        }
        (Some(css), read)
    }
}

fn write_output(output: &Path, css: &str) -> Result<()> {
    if let Some(dir) = output.parent() {
        fs::create_dir_all(dir).map_err(|source| CslinerError::OutputDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    fs::write(output, css).map_err(|source| CslinerError::OutputWrite {
        path: output.to_path_buf(),
        source,
    })
}

/// Runs one pass on a blocking thread while the progress indicator spins.
///
/// The builder is handed back so its compiler can be reused; if the pass
/// panicked a fresh builder for the same root is returned instead.
pub async fn run_pass(builder: Builder, progress: &Progress) -> (Builder, Result<BuildReport>) {
    let root = builder.root.clone();
    progress.start();
    let joined = tokio::task::spawn_blocking(move || {
        let mut builder = builder;
        let result = builder.build();
        (builder, result)
    })
    .await;
    progress.stop();

    match joined {
        Ok(pair) => pair,
        Err(e) => (Builder::new(root), Err(CslinerError::Task(e.to_string()))),
    }
}
