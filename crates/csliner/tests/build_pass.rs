//! Integration tests for the build pass against real project directories.

use std::fs;
use std::path::Path;

use csliner::{Builder, CONFIG_FILE, Config, CslinerError};

fn write(path: &Path, text: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn project(config: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join(CONFIG_FILE), config);
    dir
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_build_writes_default_output() {
    let dir = project("{}");
    write(
        &dir.path().join("index.html"),
        r#"<div class="d-flex jc-center"><span class="c-red md-d-none"></span></div>"#,
    );

    let report = Builder::new(dir.path()).build().unwrap();
    assert_eq!(report.output, dir.path().join("build/app.css"));
    assert_eq!(report.markup_files, 1);
    assert_eq!(report.css_files, 0);
    assert_eq!(report.classes, 4);
    assert_eq!(report.rules, 4);

    let css = fs::read_to_string(&report.output).unwrap();
    assert!(css.starts_with(".d-flex{\n\tdisplay:flex;\n}\n"));
    assert!(css.contains(".c-red{\n\tcolor:red;\n}\n"));
    assert!(css.contains("(max-height:1023px){\n.md-d-none{\n\tdisplay:none;\n}\n}\n"));
}

#[test]
fn test_build_path_variants() {
    for (build_path, expected) in [
        ("dist/site.css", "dist/site.css"),
        ("public/index.html", "public/app.css"),
        ("out", "out/app.css"),
    ] {
        let dir = project(&format!(r#"{{"BUILD_PATH": "{build_path}"}}"#));
        write(&dir.path().join("index.html"), r#"<p class="op-50"></p>"#);

        let report = Builder::new(dir.path()).build().unwrap();
        assert_eq!(report.output, dir.path().join(expected));
        assert!(report.output.is_file(), "{build_path}");
    }
}

// ============================================================================
// Fatal errors
// ============================================================================

#[test]
fn test_missing_config_aborts() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("index.html"), r#"<p class="d-flex"></p>"#);

    let err = Builder::new(dir.path()).build().unwrap_err();
    assert!(matches!(err, CslinerError::ConfigMissing(_)));
    assert!(!dir.path().join("build").exists());
}

#[test]
fn test_invalid_config_aborts() {
    let dir = project(r#"{"HTML_PATHS": 3}"#);
    let err = Builder::new(dir.path()).build().unwrap_err();
    assert!(matches!(err, CslinerError::ConfigInvalid { .. }));
}

#[test]
fn test_no_markup_aborts_and_keeps_previous_output() {
    let dir = project(r#"{"HTML_PATHS": ["pages"]}"#);
    write(&dir.path().join("pages/a.html"), r#"<p class="d-flex"></p>"#);
    let mut builder = Builder::new(dir.path());
    let report = builder.build().unwrap();
    let before = fs::read_to_string(&report.output).unwrap();

    fs::remove_file(dir.path().join("pages/a.html")).unwrap();
    let err = builder.build().unwrap_err();
    assert!(matches!(err, CslinerError::NoMarkupFiles(_)));
    assert_eq!(fs::read_to_string(&report.output).unwrap(), before);
}

// ============================================================================
// Author stylesheets
// ============================================================================

#[test]
fn test_author_css_follows_root_priority() {
    let dir = project(
        r#"{"CSS_PATHS": ["main", {"path": "reset", "priority": -1}], "MERGE_SAME_SELECTORS": true}"#,
    );
    write(&dir.path().join("index.html"), r#"<p class="d-flex"></p>"#);
    write(&dir.path().join("main/site.css"), ".m{color:red}\n@import url(fonts.css);");
    write(&dir.path().join("reset/reset.css"), ".r{margin:0}");

    let report = Builder::new(dir.path()).build().unwrap();
    assert_eq!(report.css_files, 2);

    let css = fs::read_to_string(&report.output).unwrap();
    assert!(css.starts_with("@import url(fonts.css);\n"));
    let reset = css.find(".r{").unwrap();
    let main = css.find(".m{").unwrap();
    assert!(css.find(".d-flex{").unwrap() < reset);
    assert!(reset < main);
}

#[test]
fn test_previous_output_is_not_read_back() {
    let dir = project(r#"{"CSS_PATHS": ["."]}"#);
    write(&dir.path().join("index.html"), r#"<p class="d-flex"></p>"#);
    write(&dir.path().join("styles/site.css"), ".site{color:blue}");

    let mut builder = Builder::new(dir.path());
    let first = builder.build().unwrap();
    let second = builder.build().unwrap();
    assert_eq!(second.css_files, 1);

    let css = fs::read_to_string(&second.output).unwrap();
    assert_eq!(css, fs::read_to_string(&first.output).unwrap());
    assert_eq!(css.matches(".d-flex{").count(), 1);
}

#[test]
fn test_ignored_markup_is_skipped() {
    let dir = project(r#"{"IGNORE_PATHS": ["drafts"]}"#);
    write(&dir.path().join("index.html"), r#"<p class="d-flex"></p>"#);
    write(&dir.path().join("drafts/wip.html"), r#"<p class="c-red"></p>"#);
    write(&dir.path().join("node_modules/pkg/x.html"), r#"<p class="c-blue"></p>"#);

    let report = Builder::new(dir.path()).build().unwrap();
    assert_eq!(report.markup_files, 1);
    let css = fs::read_to_string(&report.output).unwrap();
    assert!(!css.contains("c-red"));
    assert!(!css.contains("c-blue"));
}

// ============================================================================
// Overrides and templates
// ============================================================================

#[test]
fn test_class_overrides_apply() {
    let dir = project(r#"{"SET_CLASSES": {"d": {"rename": "disp"}}}"#);
    write(&dir.path().join("index.html"), r#"<p class="disp-flex d-block"></p>"#);

    let report = Builder::new(dir.path()).build().unwrap();
    let css = fs::read_to_string(&report.output).unwrap();
    assert!(css.contains(".disp-flex{\n\tdisplay:flex;\n}"));
    assert!(!css.contains(".d-block"));
}

#[test]
fn test_custom_template_path() {
    let dir = project(r#"{"TEMPLATE_PATH": "tpl/app.css"}"#);
    write(&dir.path().join("tpl/app.css"), "/* head */\n---standard---\n");
    write(&dir.path().join("index.html"), r#"<p class="c-red md-c-blue"></p>"#);

    let report = Builder::new(dir.path()).build().unwrap();
    let css = fs::read_to_string(&report.output).unwrap();
    assert_eq!(css, "/* head */\n.c-red{\n\tcolor:red;\n}\n");
}

#[test]
fn test_init_never_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Config::init(dir.path()).unwrap());
    assert_eq!(Config::load(dir.path()).unwrap(), Config::default());

    write(&dir.path().join(CONFIG_FILE), r#"{"BUILD_PATH": "x.css"}"#);
    assert!(!Config::init(dir.path()).unwrap());
    assert_eq!(Config::load(dir.path()).unwrap().build_path, Path::new("x.css"));
}
