//! Lookup tables driving the utility-class compiler.
//!
//! - [`units`]: numeric units, their symbols and precisions
//! - [`classes`]: utility keys and the declarations they produce
//! - [`selectors`]: pseudo-class suffixes and breakpoint prefixes

pub mod classes;
pub mod selectors;
pub mod units;

pub use classes::{ClassDef, ClassOverride, ClassTable};
pub use selectors::{BREAKPOINTS, Breakpoint, PSEUDO_CLASSES};
pub use units::{NumericUnit, UnitKind, UnitTable};
