//! Class definition table.
//!
//! Maps a short utility key (`d`, `jc`, `bgc`) to the CSS properties it sets,
//! the unit its values are resolved with, and its emission priority. The table
//! is seeded from [`BASE_CLASSES`] and mutated only while a compiler is being
//! configured; each [`ClassDef`] also names the pattern family that matches it,
//! so a rename is picked up the next time the pattern set is compiled.

use log::warn;

use crate::error::{Result, UcssError};
use crate::patterns::Family;
use crate::tables::units::{NumericUnit, UnitKind};

/// One utility class.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassDef {
    pub key: String,
    pub properties: Vec<&'static str>,
    pub unit: UnitKind,
    pub priority: f64,
    /// Whether the unit (and precision) may be changed, and whether tokens
    /// of this class may carry an explicit unit suffix.
    pub unit_configurable: bool,
    pub precision: Option<u32>,
    pub family: Family,
}

/// Configuration-time changes to one class. Unset fields are left alone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassOverride {
    pub rename: Option<String>,
    pub unit: Option<String>,
    pub priority: Option<f64>,
    pub precision: Option<u32>,
}

struct Seed {
    key: &'static str,
    properties: &'static [&'static str],
    unit: UnitKind,
    unit_configurable: bool,
    precision: Option<u32>,
    family: Family,
}

const fn seed(
    key: &'static str,
    properties: &'static [&'static str],
    unit: UnitKind,
    unit_configurable: bool,
    family: Family,
) -> Seed {
    Seed {
        key,
        properties,
        unit,
        unit_configurable,
        precision: None,
        family,
    }
}

const KW: UnitKind = UnitKind::Keyword;
const COLOR: UnitKind = UnitKind::Color;
const PX: UnitKind = UnitKind::Numeric(NumericUnit::Px);
const REM: UnitKind = UnitKind::Numeric(NumericUnit::Rem);
const PR: UnitKind = UnitKind::Numeric(NumericUnit::Percent);
const UNITLESS: UnitKind = UnitKind::Numeric(NumericUnit::None);

/// Built-in classes in priority order (priority = position + 1).
const BASE_CLASSES: &[Seed] = &[
    seed("d", &["display"], KW, false, Family::Display),
    seed("fxw", &["flex-wrap"], KW, false, Family::FlexWrap),
    seed("fd", &["flex-direction"], KW, false, Family::FlexDirection),
    seed("ai", &["align-items"], KW, false, Family::Align),
    seed("as", &["align-self"], KW, false, Family::Align),
    seed("jc", &["justify-content"], KW, false, Family::Justify),
    seed("ajc", &["align-items", "justify-content"], KW, false, Family::Align),
    seed("basis", &["flex-basis"], PR, true, Family::Dimension),
    seed("grow", &["flex-grow"], PR, true, Family::Dimension),
    seed("shrink", &["flex-shrink"], PR, true, Family::Dimension),
    seed("flex", &["flex"], KW, true, Family::Dimension),
    seed("order", &["order"], KW, false, Family::Offset),
    seed("pos", &["position"], KW, false, Family::Position),
    seed("ov", &["overflow"], KW, false, Family::Overflow),
    seed("ovx", &["overflow-x"], KW, false, Family::Overflow),
    seed("ovy", &["overflow-y"], KW, false, Family::Overflow),
    seed("bst", &["border-top-style"], KW, false, Family::BorderStyle),
    seed("bsr", &["border-right-style"], KW, false, Family::BorderStyle),
    seed("bsb", &["border-bottom-style"], KW, false, Family::BorderStyle),
    seed("bsl", &["border-left-style"], KW, false, Family::BorderStyle),
    seed("bsh", &["border-left-style", "border-right-style"], KW, false, Family::BorderStyle),
    seed("bsv", &["border-top-style", "border-bottom-style"], KW, false, Family::BorderStyle),
    seed("bs", &["border-style"], KW, false, Family::BorderStyle),
    seed("bwt", &["border-top-width"], PX, true, Family::Dimension),
    seed("bwr", &["border-right-width"], PX, true, Family::Dimension),
    seed("bwb", &["border-bottom-width"], PX, true, Family::Dimension),
    seed("bwl", &["border-left-width"], PX, true, Family::Dimension),
    seed("bwh", &["border-left-width", "border-right-width"], PX, true, Family::Dimension),
    seed("bwv", &["border-top-width", "border-bottom-width"], PX, true, Family::Dimension),
    seed("bw", &["border-width"], PX, true, Family::Dimension),
    seed("bct", &["border-top-color"], COLOR, false, Family::Color),
    seed("bcr", &["border-right-color"], COLOR, false, Family::Color),
    seed("bcb", &["border-bottom-color"], COLOR, false, Family::Color),
    seed("bcl", &["border-left-color"], COLOR, false, Family::Color),
    seed("bch", &["border-left-color", "border-right-color"], COLOR, false, Family::Color),
    seed("bcv", &["border-top-color", "border-bottom-color"], COLOR, false, Family::Color),
    seed("bc", &["border-color"], COLOR, false, Family::Color),
    seed("brad", &["border-radius"], REM, true, Family::Dimension),
    seed("bradtl", &["border-top-left-radius"], REM, true, Family::Dimension),
    seed("bradtr", &["border-top-right-radius"], REM, true, Family::Dimension),
    seed("bradbr", &["border-bottom-right-radius"], REM, true, Family::Dimension),
    seed("bradbl", &["border-bottom-left-radius"], REM, true, Family::Dimension),
    seed("h", &["height"], PR, true, Family::Dimension),
    seed("minh", &["min-height"], PR, true, Family::Dimension),
    seed("maxh", &["max-height"], PR, true, Family::Dimension),
    seed("w", &["width"], PR, true, Family::Dimension),
    seed("minw", &["min-width"], PR, true, Family::Dimension),
    seed("maxw", &["max-width"], PR, true, Family::Dimension),
    seed("op", &["opacity"], UNITLESS, false, Family::Dimension),
    seed("ff", &["font-family"], KW, false, Family::FontFamily),
    seed("fsz", &["font-size"], REM, true, Family::Dimension),
    seed("fw", &["font-weight"], KW, false, Family::FontWeight),
    seed("ta", &["text-align"], KW, false, Family::TextAlign),
    seed("tt", &["text-transform"], KW, false, Family::TextTransform),
    seed("tdl", &["text-decoration-line"], KW, false, Family::TextDecorationLine),
    seed("tds", &["text-decoration-style"], KW, false, Family::TextDecorationStyle),
    seed("ws", &["white-space"], KW, false, Family::WhiteSpace),
    seed("wb", &["word-break"], KW, false, Family::WordBreak),
    Seed {
        precision: Some(0),
        ..seed("lh", &["line-height"], UNITLESS, true, Family::Dimension)
    },
    seed("m", &["margin"], REM, true, Family::Offset),
    seed("mh", &["margin-left", "margin-right"], REM, true, Family::Offset),
    seed("mv", &["margin-top", "margin-bottom"], REM, true, Family::Offset),
    seed("mt", &["margin-top"], REM, true, Family::Offset),
    seed("ml", &["margin-left"], REM, true, Family::Offset),
    seed("mb", &["margin-bottom"], REM, true, Family::Offset),
    seed("mr", &["margin-right"], REM, true, Family::Offset),
    seed("p", &["padding"], REM, true, Family::Offset),
    seed("ph", &["padding-left", "padding-right"], REM, true, Family::Offset),
    seed("pv", &["padding-top", "padding-bottom"], REM, true, Family::Offset),
    seed("pt", &["padding-top"], REM, true, Family::Offset),
    seed("pl", &["padding-left"], REM, true, Family::Offset),
    seed("pb", &["padding-bottom"], REM, true, Family::Offset),
    seed("pr", &["padding-right"], REM, true, Family::Offset),
    seed("t", &["top"], REM, true, Family::Offset),
    seed("l", &["left"], REM, true, Family::Offset),
    seed("b", &["bottom"], REM, true, Family::Offset),
    seed("r", &["right"], REM, true, Family::Offset),
    Seed {
        precision: Some(0),
        ..seed("z", &["z-index"], UNITLESS, false, Family::Offset)
    },
    seed("c", &["color"], COLOR, false, Family::Color),
    seed("bgc", &["background-color"], COLOR, false, Family::Color),
];

/// The live class definition table of one compiler.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassTable {
    classes: Vec<ClassDef>,
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassTable {
    /// Builds the table from the built-in seed.
    pub fn new() -> Self {
        let classes = BASE_CLASSES
            .iter()
            .enumerate()
            .map(|(i, s)| ClassDef {
                key: s.key.to_string(),
                properties: s.properties.to_vec(),
                unit: s.unit,
                priority: (i + 1) as f64,
                unit_configurable: s.unit_configurable,
                precision: s.precision,
                family: s.family,
            })
            .collect();
        Self { classes }
    }

    pub fn get(&self, key: &str) -> Option<&ClassDef> {
        self.classes.iter().find(|c| c.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassDef> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Keys belonging to one pattern family, in table order.
    pub fn family_keys(&self, family: Family) -> Vec<&str> {
        self.classes
            .iter()
            .filter(|c| c.family == family)
            .map(|c| c.key.as_str())
            .collect()
    }

    /// Applies one override. Returns whether anything changed.
    ///
    /// A unit or precision change on a class whose unit is not configurable
    /// is ignored with a warning. An unknown unit or a rename onto an
    /// existing key rejects the whole override before anything is applied.
    pub fn apply(&mut self, key: &str, change: &ClassOverride) -> Result<bool> {
        let index = self
            .classes
            .iter()
            .position(|c| c.key == key)
            .ok_or_else(|| UcssError::UnknownClass(key.to_string()))?;
        let unit = change.unit.as_deref().map(UnitKind::parse).transpose()?;
        if let Some(new_key) = &change.rename {
            if new_key != key && self.get(new_key).is_some() {
                return Err(UcssError::RenameCollision {
                    from: key.to_string(),
                    to: new_key.clone(),
                });
            }
        }
        let mut changed = false;

        if let Some(unit) = unit {
            let class = &mut self.classes[index];
            if class.unit_configurable {
                class.unit = unit;
                changed = true;
            } else {
                warn!("unit of class `{key}` is fixed, ignoring unit override");
            }
        }

        if let Some(priority) = change.priority {
            self.classes[index].priority = priority;
            changed = true;
        }

        if let Some(precision) = change.precision {
            let class = &mut self.classes[index];
            if class.unit_configurable {
                class.precision = Some(precision);
                changed = true;
            } else {
                warn!("precision of class `{key}` is fixed, ignoring precision override");
            }
        }

        if let Some(new_key) = &change.rename {
            self.classes[index].key = new_key.clone();
            changed = true;
        }

        Ok(changed)
    }
}
