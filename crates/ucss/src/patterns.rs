//! Pattern set: one compiled matcher per class family.
//!
//! Every family is described by a [`ValueSyntax`] template. At compile time the
//! template is instantiated with the family's live keys from the
//! [`ClassTable`], the pseudo-class table and the explicit unit suffixes, then
//! compiled into a single regular expression:
//!
//! ```text
//! \s(?P<bp>md|mdl|mdp)?-?(?P<key>..)(?P<imp>-i)?(?:_{1,2}(?P<pseudo>..))?-(?P<value>..)(?P<unit>..)?\s
//! ```
//!
//! The expression is applied to the space-padded token string, where tokens
//! are separated by two spaces so that neighbours never share a delimiter.

use std::collections::HashMap;

use regex::Regex;

use crate::error::{Result, UcssError};
use crate::tables::{BREAKPOINTS, ClassTable, PSEUDO_CLASSES, UnitTable};

/// Values emitted literally and without a unit, whatever the class unit is.
pub const RESERVED_VALUES: [&str; 5] = ["auto", "inherit", "initial", "unset", "none"];

/// A family of utility classes sharing one value grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    Display,
    FlexWrap,
    FlexDirection,
    Align,
    Justify,
    Position,
    Overflow,
    BorderStyle,
    FontWeight,
    TextAlign,
    FontFamily,
    TextTransform,
    TextDecorationLine,
    TextDecorationStyle,
    WhiteSpace,
    WordBreak,
    Dimension,
    Offset,
    Color,
}

/// The value grammar of a family.
///
/// Keyword entries are written `literal` or `literal:alias`; the alias is what
/// ends up in the declaration (`inflex:inline-flex`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueSyntax {
    Keywords(&'static [&'static str]),
    Ident,
    Numeric { signed: bool },
    Color,
}

impl Family {
    /// Families in the order their matches are collected.
    pub const ALL: [Family; 19] = [
        Family::Display,
        Family::FlexWrap,
        Family::FlexDirection,
        Family::Align,
        Family::Justify,
        Family::Position,
        Family::Overflow,
        Family::BorderStyle,
        Family::FontWeight,
        Family::TextAlign,
        Family::FontFamily,
        Family::TextTransform,
        Family::TextDecorationLine,
        Family::TextDecorationStyle,
        Family::WhiteSpace,
        Family::WordBreak,
        Family::Dimension,
        Family::Offset,
        Family::Color,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Family::Display => "display",
            Family::FlexWrap => "flex-wrap",
            Family::FlexDirection => "flex-direction",
            Family::Align => "align",
            Family::Justify => "justify",
            Family::Position => "position",
            Family::Overflow => "overflow",
            Family::BorderStyle => "border-style",
            Family::FontWeight => "font-weight",
            Family::TextAlign => "text-align",
            Family::FontFamily => "font-family",
            Family::TextTransform => "text-transform",
            Family::TextDecorationLine => "text-decoration-line",
            Family::TextDecorationStyle => "text-decoration-style",
            Family::WhiteSpace => "white-space",
            Family::WordBreak => "word-break",
            Family::Dimension => "dimension",
            Family::Offset => "offset",
            Family::Color => "color",
        }
    }

    pub fn syntax(self) -> ValueSyntax {
        use ValueSyntax::Keywords;
        match self {
            Family::Display => Keywords(&[
                "flex",
                "inflex:inline-flex",
                "block",
                "inblock:inline-block",
                "grid",
                "ingrid:inline-grid",
                "table",
                "rtable:table-row",
                "inline",
                "none",
                "inherit",
                "initial",
            ]),
            Family::FlexWrap => Keywords(&["wrap", "nowrap"]),
            Family::FlexDirection => Keywords(&[
                "row",
                "row-rs:row-reverse",
                "col:column",
                "col-rs:column-reverse",
                "inherit",
                "initial",
            ]),
            Family::Align => Keywords(&[
                "start:flex-start",
                "center",
                "end:flex-end",
                "stretch",
                "inherit",
                "initial",
            ]),
            Family::Justify => Keywords(&[
                "start:flex-start",
                "center",
                "end:flex-end",
                "stretch",
                "bspace:space-between",
                "aspace:space-around",
                "espace:space-evenly",
                "inherit",
                "initial",
            ]),
            Family::Position => Keywords(&[
                "static", "absolute", "relative", "fixed", "sticky", "inherit", "initial",
            ]),
            Family::Overflow => Keywords(&[
                "visible", "hidden", "clip", "scroll", "auto", "inherit", "initial",
            ]),
            Family::BorderStyle => Keywords(&["solid", "dotted", "dashed", "none"]),
            Family::FontWeight => Keywords(&[
                "100", "200", "300", "400", "500", "600", "700", "800", "900",
            ]),
            Family::TextAlign => Keywords(&["left", "center", "right", "justify"]),
            Family::FontFamily => ValueSyntax::Ident,
            Family::TextTransform => Keywords(&[
                "upper:uppercase",
                "lower:lowercase",
                "cap:capitalize",
                "none",
            ]),
            Family::TextDecorationLine => Keywords(&[
                "under:underline",
                "over:overline",
                "linet:line-through",
                "none",
            ]),
            Family::TextDecorationStyle => {
                Keywords(&["solid", "double", "dotted", "dashed", "wavy"])
            }
            Family::WhiteSpace => Keywords(&[
                "normal",
                "pre",
                "pwrap:pre-wrap",
                "bspace:break-spaces",
                "nowrap",
                "inherit",
                "initial",
            ]),
            Family::WordBreak => Keywords(&[
                "normal",
                "abreak:break-all",
                "keep:keep-all",
                "wbreak:break-word",
                "inherit",
                "initial",
            ]),
            Family::Dimension => ValueSyntax::Numeric { signed: false },
            Family::Offset => ValueSyntax::Numeric { signed: true },
            Family::Color => ValueSyntax::Color,
        }
    }
}

/// One compiled family matcher plus the aliases its keywords declare.
#[derive(Clone, Debug)]
pub struct CompiledPattern {
    pub family: Family,
    pub regex: Regex,
    aliases: HashMap<&'static str, &'static str>,
}

impl CompiledPattern {
    /// Resolves a keyword payload through this family's alias table.
    pub fn alias(&self, payload: &str) -> Option<&'static str> {
        self.aliases.get(payload).copied()
    }
}

/// All family matchers of one compiler instance.
#[derive(Clone, Debug, Default)]
pub struct PatternSet {
    patterns: Vec<CompiledPattern>,
}

impl PatternSet {
    /// Instantiates every family template against the live tables.
    ///
    /// A family whose keys were all renamed away still compiles with the new
    /// keys; a family with no keys at all is skipped.
    pub fn compile(classes: &ClassTable, units: &UnitTable) -> Result<Self> {
        let breakpoints = alternation(BREAKPOINTS.iter().map(|bp| bp.prefix));
        let pseudo = alternation(PSEUDO_CLASSES.iter().map(|(key, _)| *key));
        let suffixes = alternation(units.suffixes().map(|unit| unit.key()));

        let mut patterns = Vec::new();
        for family in Family::ALL {
            let keys = classes.family_keys(family);
            if keys.is_empty() {
                continue;
            }

            let mut aliases = HashMap::new();
            let (values, unit_group) = match family.syntax() {
                ValueSyntax::Keywords(words) => {
                    let literals = words.iter().map(|&word| match word.split_once(':') {
                        Some((literal, alias)) => {
                            aliases.insert(literal, alias);
                            literal
                        }
                        None => word,
                    });
                    (alternation(literals), String::new())
                }
                ValueSyntax::Ident => (r"[\w\-]+".to_string(), String::new()),
                ValueSyntax::Numeric { signed } => {
                    let sign = if signed { "-?" } else { "" };
                    (
                        format!(
                            r"{sign}\d+(?:_\d+)?|{}",
                            alternation(RESERVED_VALUES.iter().copied())
                        ),
                        format!("(?P<unit>{suffixes})?"),
                    )
                }
                ValueSyntax::Color => (r"[a-f0-9]{3,8}|[a-z]+".to_string(), String::new()),
            };

            let source = format!(
                r"\s(?P<bp>{breakpoints})?-?(?P<key>{keys})(?P<imp>-i)?(?:_{{1,2}}(?P<pseudo>{pseudo}))?-(?P<value>{values}){unit_group}\s",
                keys = alternation(keys.into_iter()),
            );
            let regex = Regex::new(&source).map_err(|source| UcssError::Pattern {
                family: family.name(),
                source,
            })?;

            patterns.push(CompiledPattern {
                family,
                regex,
                aliases,
            });
        }

        Ok(Self { patterns })
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn alternation<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.map(regex::escape).collect::<Vec<_>>().join("|")
}
