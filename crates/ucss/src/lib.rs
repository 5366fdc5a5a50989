//! # UCSS - Utility-class CSS compiler
//!
//! Compiles short utility class names found in markup (`d-flex`, `md-m-2`,
//! `bgc-ff0000`) into CSS rule blocks, and re-assembles stylesheets so that
//! at-rules land where CSS requires them and duplicate rules can be merged.
//!
//! ## Quick Start
//!
//! ```rust
//! use ucss::{ClassCollector, Compiler, ReassemblyMode, Template};
//!
//! let compiler = Compiler::new().expect("built-in tables compile");
//!
//! let mut classes = ClassCollector::new();
//! classes.add_markup(r#"<div class="d-flex jc-center bgc-ff0000"></div>"#);
//!
//! let groups = compiler.compile_markup(&classes);
//! let css = compiler.assemble(&Template::builtin(), &groups, None, ReassemblyMode::Concat);
//! assert!(css.contains("display:flex;"));
//! assert!(css.contains("background-color:#ff0000;"));
//! ```
//!
//! ## Utility Tokens
//!
//! ```text
//! [breakpoint][-]key[-i][_pseudo|__pseudo]-value[unit]
//! ```
//!
//! - Breakpoints: `md`, `mdl`, `mdp`
//! - `-i` marks every declaration `!important`
//! - Pseudo-classes: `hvr` (`:hover`), `fcs` (`:focus`), ...
//! - Numeric values: `12` (padded to the unit precision), `12_5` (taken as
//!   `12.5`), or one of `auto`, `inherit`, `initial`, `unset`, `none`
//!
//! ## Modules
//!
//! - [`tables`]: units, class definitions, pseudo-classes and breakpoints
//! - [`patterns`]: per-family matchers compiled from the live tables
//! - [`markup`]: class attribute scanning
//! - [`matcher`]: token resolution and rule ordering
//! - [`parser`]: structural CSS parsing
//! - [`policy`]: at-rule ordering and merge policies
//! - [`merge`]: concat and merge re-assembly
//! - [`assemble`]: template placeholder filling
//! - [`compiler`]: the owned instance tying everything together
//! - [`error`]: configuration errors

pub mod assemble;
pub mod compiler;
pub mod error;
pub mod markup;
pub mod matcher;
pub mod merge;
pub mod parser;
pub mod patterns;
pub mod policy;
pub mod tables;

pub use assemble::Template;
pub use compiler::{Compiler, CompilerBuilder, Overrides};
pub use error::{Result, UcssError};
pub use markup::{ClassCollector, scan_classes};
pub use matcher::{RuleGroups, STANDARD_GROUP, UtilityRule};
pub use merge::ReassemblyMode;
pub use parser::{CssBody, CssForest, CssNode};
pub use tables::ClassOverride;
