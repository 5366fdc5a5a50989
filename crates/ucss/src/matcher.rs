//! Utility-class matcher.
//!
//! Turns the distinct class tokens found in markup into CSS rule blocks:
//!
//! 1. Every family pattern is run independently over the space-padded token
//!    string, so one token may match more than one family.
//! 2. Each match becomes a [`UtilityToken`], resolved against the class table
//!    into a [`UtilityRule`]. Unknown keys are dropped silently.
//! 3. Rules are ordered by weight: the class priority, plus `0.5` for an
//!    `!important` flag and `0.25` for an explicit unit suffix. The sort is
//!    stable, so within one weight the discovery order is kept.
//! 4. Rules are grouped into `standard` and one bucket per breakpoint.
//!
//! ## Value resolution
//!
//! | unit      | payload                  | output                          |
//! |-----------|--------------------------|---------------------------------|
//! | `color`   | 3-8 hex digits           | `#` + payload                   |
//! | `color`   | anything else            | payload                         |
//! | keyword   | family alias or payload  | alias, else payload             |
//! | numeric   | `auto`, `none`, ...      | payload, unitless               |
//! | numeric   | `12_5`                   | `12.5` + unit, no padding       |
//! | numeric   | `125`                    | padded to precision + unit      |

use std::fmt;

use indexmap::IndexMap;
use log::debug;

use crate::patterns::{CompiledPattern, PatternSet, RESERVED_VALUES};
use crate::tables::selectors::{breakpoint, pseudo_class};
use crate::tables::{BREAKPOINTS, ClassDef, ClassTable, NumericUnit, UnitKind, UnitTable};

/// Group name for rules without a breakpoint prefix.
pub const STANDARD_GROUP: &str = "standard";

const IMPORTANT_WEIGHT: f64 = 0.5;
const EXPLICIT_UNIT_WEIGHT: f64 = 0.25;

/// One pattern match, before resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UtilityToken {
    /// The class token as written in markup.
    pub text: String,
    pub breakpoint: Option<String>,
    pub key: String,
    pub important: bool,
    pub pseudo: Option<String>,
    pub raw_value: String,
    pub unit_suffix: Option<String>,
}

impl UtilityToken {
    fn from_captures(caps: &regex::Captures<'_>) -> Option<Self> {
        let text = caps.get(0)?.as_str().trim().to_string();
        let owned = |name: &str| caps.name(name).map(|m| m.as_str().to_string());
        Some(Self {
            text,
            breakpoint: owned("bp"),
            key: owned("key")?,
            important: caps.name("imp").is_some(),
            pseudo: owned("pseudo"),
            raw_value: owned("value")?,
            unit_suffix: owned("unit"),
        })
    }

    /// Emission weight for a class of the given priority.
    pub fn weight(&self, priority: f64) -> f64 {
        let mut weight = priority;
        if self.important {
            weight += IMPORTANT_WEIGHT;
        }
        if self.unit_suffix.is_some() {
            weight += EXPLICIT_UNIT_WEIGHT;
        }
        weight
    }
}

/// A single `property:value` pair of a utility rule.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub property: &'static str,
    pub value: String,
    pub important: bool,
}

/// A resolved utility class, ready to be written out.
#[derive(Clone, Debug, PartialEq)]
pub struct UtilityRule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
    pub breakpoint: Option<&'static str>,
    pub weight: f64,
}

impl fmt::Display for UtilityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ".{}{{", self.selector)?;
        for decl in &self.declarations {
            let important = if decl.important { " !important" } else { "" };
            writeln!(f, "\t{}:{}{};", decl.property, decl.value, important)?;
        }
        writeln!(f, "}}")
    }
}

/// Rules grouped by breakpoint, `standard` first, then breakpoints in table order.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleGroups {
    groups: IndexMap<&'static str, Vec<UtilityRule>>,
}

impl Default for RuleGroups {
    fn default() -> Self {
        let mut groups = IndexMap::new();
        groups.insert(STANDARD_GROUP, Vec::new());
        for bp in &BREAKPOINTS {
            groups.insert(bp.prefix, Vec::new());
        }
        Self { groups }
    }
}

impl RuleGroups {
    pub fn get(&self, name: &str) -> &[UtilityRule] {
        self.groups.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Group names with their rendered blocks, in insertion order.
    pub fn rendered(&self) -> impl Iterator<Item = (&'static str, String)> + '_ {
        self.groups.iter().map(|(name, rules)| {
            let text: String = rules.iter().map(ToString::to_string).collect();
            (*name, text)
        })
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, rule: UtilityRule) {
        let group = rule.breakpoint.unwrap_or(STANDARD_GROUP);
        self.groups.entry(group).or_default().push(rule);
    }
}

/// Matches class tokens against one compiler's tables.
pub struct Matcher<'a> {
    classes: &'a ClassTable,
    units: &'a UnitTable,
    patterns: &'a PatternSet,
}

impl<'a> Matcher<'a> {
    pub fn new(classes: &'a ClassTable, units: &'a UnitTable, patterns: &'a PatternSet) -> Self {
        Self {
            classes,
            units,
            patterns,
        }
    }

    /// Runs every family pattern over the tokens.
    pub fn tokenize<'t>(
        &self,
        tokens: impl IntoIterator<Item = &'t str>,
    ) -> Vec<(UtilityToken, &'a CompiledPattern)> {
        let joined = tokens.into_iter().collect::<Vec<_>>().join("  ");
        if joined.trim().is_empty() {
            return Vec::new();
        }
        let padded = format!(" {joined} ");

        let patterns: &'a PatternSet = self.patterns;
        let mut matches = Vec::new();
        for pattern in patterns.iter() {
            for caps in pattern.regex.captures_iter(&padded) {
                if let Some(token) = UtilityToken::from_captures(&caps) {
                    matches.push((token, pattern));
                }
            }
        }
        matches
    }

    /// Compiles class tokens into ordered, grouped rule blocks.
    pub fn compile<'t>(&self, tokens: impl IntoIterator<Item = &'t str>) -> RuleGroups {
        let mut rules: Vec<UtilityRule> = self
            .tokenize(tokens)
            .into_iter()
            .filter_map(|(token, pattern)| self.resolve(&token, pattern))
            .collect();
        rules.sort_by(|a, b| a.weight.total_cmp(&b.weight));

        let mut groups = RuleGroups::default();
        for rule in rules {
            groups.push(rule);
        }
        groups
    }

    /// Resolves one match into a rule, or `None` when it cannot be emitted.
    pub fn resolve(&self, token: &UtilityToken, pattern: &CompiledPattern) -> Option<UtilityRule> {
        let Some(class) = self.classes.get(&token.key) else {
            debug!("unknown utility class `{}`, skipping", token.key);
            return None;
        };
        let value = self.resolve_value(class, token, pattern)?;

        let pseudo = token
            .pseudo
            .as_deref()
            .and_then(pseudo_class)
            .unwrap_or_default();
        let declarations = class
            .properties
            .iter()
            .map(|&property| Declaration {
                property,
                value: value.clone(),
                important: token.important,
            })
            .collect();

        Some(UtilityRule {
            selector: format!("{}{}", token.text, pseudo),
            declarations,
            breakpoint: token
                .breakpoint
                .as_deref()
                .and_then(breakpoint)
                .map(|bp| bp.prefix),
            weight: token.weight(class.priority),
        })
    }

    fn resolve_value(
        &self,
        class: &ClassDef,
        token: &UtilityToken,
        pattern: &CompiledPattern,
    ) -> Option<String> {
        let payload = token.raw_value.as_str();
        match class.unit {
            UnitKind::Color => Some(if is_hex_color(payload) {
                format!("#{payload}")
            } else {
                payload.to_string()
            }),
            UnitKind::Keyword => Some(pattern.alias(payload).unwrap_or(payload).to_string()),
            UnitKind::Numeric(default_unit) => {
                let unit = match token.unit_suffix.as_deref() {
                    Some(suffix) => {
                        let unit = NumericUnit::from_key(suffix).filter(|u| u.is_suffix())?;
                        if !class.unit_configurable {
                            debug!(
                                "class `{}` does not accept unit `{suffix}`, skipping `{}`",
                                class.key, token.text
                            );
                            return None;
                        }
                        unit
                    }
                    None => default_unit,
                };

                if RESERVED_VALUES.contains(&payload) {
                    return Some(payload.to_string());
                }
                if let Some((int, frac)) = payload.split_once('_') {
                    return Some(format!("{int}.{frac}{}", unit.symbol()));
                }
                let precision = class
                    .precision
                    .unwrap_or_else(|| self.units.precision(unit));
                Some(format!(
                    "{}{}",
                    with_precision(payload, precision),
                    unit.symbol()
                ))
            }
        }
    }
}

fn is_hex_color(payload: &str) -> bool {
    (3..=8).contains(&payload.len())
        && payload
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

/// Places a decimal point `precision` digits from the right, zero padding
/// on the left: `5` at precision 1 is `0.5`, `150` is `15.0`.
fn with_precision(payload: &str, precision: u32) -> String {
    if precision == 0 {
        return payload.to_string();
    }
    let (sign, digits) = match payload.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", payload),
    };
    let places = precision as usize;
    let padded = format!("{digits:0>width$}", width = places + 1);
    let (int, frac) = padded.split_at(padded.len() - places);
    format!("{sign}{int}.{frac}")
}
