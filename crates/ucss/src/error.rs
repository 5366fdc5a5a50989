//! Error types for the utility-class compiler.
//!
//! Only configuration-time operations can fail: compiling the pattern set and
//! applying class or unit overrides. Scanning markup, matching tokens and
//! re-assembling author CSS never fail; anomalies there are logged and skipped.

use thiserror::Error;

/// Errors that can occur while building or configuring a [`Compiler`](crate::Compiler).
///
/// # Examples
///
/// ```rust
/// use ucss::{ClassOverride, Compiler, UcssError};
///
/// let mut compiler = Compiler::builder();
/// let result = compiler.override_class("nope", &ClassOverride::default());
/// assert!(matches!(result, Err(UcssError::UnknownClass(_))));
/// ```
#[derive(Error, Debug)]
pub enum UcssError {
    /// A pattern family produced an invalid regular expression.
    #[error("invalid pattern for family {family}: {source}")]
    Pattern {
        family: &'static str,
        #[source]
        source: regex::Error,
    },

    /// An override referenced a class key that is not in the table.
    #[error("unknown class: {0}")]
    UnknownClass(String),

    /// An override referenced a unit name that is not in the unit table.
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    /// A rename target is already taken by another class.
    #[error("cannot rename {from} to {to}: class already exists")]
    RenameCollision { from: String, to: String },
}

pub type Result<T> = std::result::Result<T, UcssError>;
