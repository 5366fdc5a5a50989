//! Unit/Value table.
//!
//! Numeric units carry a CSS symbol and a default decimal precision. The
//! precision can be overridden per unit at configuration time; class entries
//! only reference a unit, so an override is seen by every class sharing it.

use std::collections::HashMap;

use crate::error::{Result, UcssError};

/// A numeric CSS unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NumericUnit {
    Px,
    Pt,
    Pc,
    Cm,
    Mm,
    Q,
    In,
    Em,
    Ex,
    Rem,
    Ch,
    Lh,
    Rlh,
    Vw,
    Vh,
    Vmin,
    Vmax,
    Vi,
    Vb,
    Svw,
    Svh,
    Lvw,
    Lvh,
    Dvw,
    Dvh,
    Percent,
    /// Unitless number (`opacity`, `line-height`, `z-index`).
    None,
}

impl NumericUnit {
    pub const ALL: [NumericUnit; 27] = [
        NumericUnit::Px,
        NumericUnit::Pt,
        NumericUnit::Pc,
        NumericUnit::Cm,
        NumericUnit::Mm,
        NumericUnit::Q,
        NumericUnit::In,
        NumericUnit::Em,
        NumericUnit::Ex,
        NumericUnit::Rem,
        NumericUnit::Ch,
        NumericUnit::Lh,
        NumericUnit::Rlh,
        NumericUnit::Vw,
        NumericUnit::Vh,
        NumericUnit::Vmin,
        NumericUnit::Vmax,
        NumericUnit::Vi,
        NumericUnit::Vb,
        NumericUnit::Svw,
        NumericUnit::Svh,
        NumericUnit::Lvw,
        NumericUnit::Lvh,
        NumericUnit::Dvw,
        NumericUnit::Dvh,
        NumericUnit::Percent,
        NumericUnit::None,
    ];

    /// The key used in class names and configuration (`px`, `vmn`, `pr`).
    pub fn key(self) -> &'static str {
        match self {
            NumericUnit::Px => "px",
            NumericUnit::Pt => "pt",
            NumericUnit::Pc => "pc",
            NumericUnit::Cm => "cm",
            NumericUnit::Mm => "mm",
            NumericUnit::Q => "q",
            NumericUnit::In => "in",
            NumericUnit::Em => "em",
            NumericUnit::Ex => "ex",
            NumericUnit::Rem => "rem",
            NumericUnit::Ch => "ch",
            NumericUnit::Lh => "lh",
            NumericUnit::Rlh => "rlh",
            NumericUnit::Vw => "vw",
            NumericUnit::Vh => "vh",
            NumericUnit::Vmin => "vmn",
            NumericUnit::Vmax => "vmx",
            NumericUnit::Vi => "vi",
            NumericUnit::Vb => "vb",
            NumericUnit::Svw => "svw",
            NumericUnit::Svh => "svh",
            NumericUnit::Lvw => "lvw",
            NumericUnit::Lvh => "lvh",
            NumericUnit::Dvw => "dvw",
            NumericUnit::Dvh => "dvh",
            NumericUnit::Percent => "pr",
            NumericUnit::None => "none",
        }
    }

    /// The symbol written after the number in CSS output.
    pub fn symbol(self) -> &'static str {
        match self {
            NumericUnit::Q => "Q",
            NumericUnit::Vmin => "vmin",
            NumericUnit::Vmax => "vmax",
            NumericUnit::Percent => "%",
            NumericUnit::None => "",
            other => other.key(),
        }
    }

    pub fn default_precision(self) -> u32 {
        match self {
            NumericUnit::Cm
            | NumericUnit::Em
            | NumericUnit::Ex
            | NumericUnit::Rem
            | NumericUnit::None => 1,
            _ => 0,
        }
    }

    /// Whether the unit may appear as an explicit suffix on a class token.
    pub fn is_suffix(self) -> bool {
        !self.symbol().is_empty()
    }

    /// Looks a unit up by key, falling back to its symbol (`%`, `vmin`).
    pub fn from_key(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|unit| unit.key() == lower)
            .or_else(|| Self::ALL.into_iter().find(|unit| unit.symbol() == name))
    }
}

/// The unit reference held by a class definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Numeric(NumericUnit),
    /// Free keyword value, resolved through the family alias table.
    Keyword,
    /// Hex payloads gain a `#`, named colors pass through.
    Color,
}

impl UnitKind {
    /// Parses a unit reference as written in overrides: a numeric key,
    /// `null`/`keyword`, or `color`.
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "null" | "keyword" => Ok(UnitKind::Keyword),
            "color" => Ok(UnitKind::Color),
            _ => NumericUnit::from_key(name)
                .map(UnitKind::Numeric)
                .ok_or_else(|| UcssError::UnknownUnit(name.to_string())),
        }
    }
}

/// Live precision table for numeric units.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitTable {
    overrides: HashMap<NumericUnit, u32>,
}

impl UnitTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn precision(&self, unit: NumericUnit) -> u32 {
        self.overrides
            .get(&unit)
            .copied()
            .unwrap_or_else(|| unit.default_precision())
    }

    /// Overrides the precision of a unit named by key or symbol.
    pub fn set_precision(&mut self, name: &str, precision: u32) -> Result<NumericUnit> {
        let unit =
            NumericUnit::from_key(name).ok_or_else(|| UcssError::UnknownUnit(name.to_string()))?;
        self.overrides.insert(unit, precision);
        Ok(unit)
    }

    /// Units accepted as explicit suffixes, in table order.
    pub fn suffixes(&self) -> impl Iterator<Item = NumericUnit> {
        NumericUnit::ALL.into_iter().filter(|unit| unit.is_suffix())
    }
}
