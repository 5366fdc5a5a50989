//! The owned compiler instance.
//!
//! A [`Compiler`] bundles the class table, unit table, compiled pattern set
//! and at-rule policies of one invocation. It is built once from the base
//! tables plus overrides and never mutated afterwards; a watch loop compares
//! [`Overrides`] to decide whether the previous instance can be reused.

use log::{debug, error};

use crate::assemble::Template;
use crate::error::Result;
use crate::markup::ClassCollector;
use crate::matcher::{Matcher, RuleGroups};
use crate::merge::{Reassembler, ReassemblyMode};
use crate::parser::{CssForest, parse_css};
use crate::patterns::PatternSet;
use crate::policy::AtRulePolicyTable;
use crate::tables::{ClassOverride, ClassTable, UnitTable};

/// Class and unit overrides, in the order they are applied.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overrides {
    pub classes: Vec<(String, ClassOverride)>,
    pub unit_precision: Vec<(String, u32)>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.unit_precision.is_empty()
    }
}

/// Configures the tables of a [`Compiler`] before its patterns are compiled.
#[derive(Clone, Debug, Default)]
pub struct CompilerBuilder {
    classes: ClassTable,
    units: UnitTable,
    policies: AtRulePolicyTable,
    overrides: Overrides,
}

impl CompilerBuilder {
    /// Applies a class override. Returns whether the class changed.
    pub fn override_class(&mut self, key: &str, change: &ClassOverride) -> Result<bool> {
        let changed = self.classes.apply(key, change)?;
        self.overrides
            .classes
            .push((key.to_string(), change.clone()));
        Ok(changed)
    }

    /// Overrides the default precision of a numeric unit.
    pub fn set_unit_precision(&mut self, unit: &str, precision: u32) -> Result<()> {
        self.units.set_precision(unit, precision)?;
        self.overrides
            .unit_precision
            .push((unit.to_string(), precision));
        Ok(())
    }

    pub fn policies(mut self, policies: AtRulePolicyTable) -> Self {
        self.policies = policies;
        self
    }

    /// Compiles the pattern set against the configured tables.
    pub fn build(self) -> Result<Compiler> {
        let patterns = PatternSet::compile(&self.classes, &self.units)?;
        debug!(
            "compiled {} pattern families over {} classes",
            patterns.len(),
            self.classes.len()
        );
        Ok(Compiler {
            classes: self.classes,
            units: self.units,
            patterns,
            policies: self.policies,
            overrides: self.overrides,
        })
    }
}

/// A configured utility-class compiler and stylesheet re-assembler.
#[derive(Clone, Debug)]
pub struct Compiler {
    classes: ClassTable,
    units: UnitTable,
    patterns: PatternSet,
    policies: AtRulePolicyTable,
    overrides: Overrides,
}

impl Compiler {
    pub fn builder() -> CompilerBuilder {
        CompilerBuilder::default()
    }

    /// A compiler over the built-in tables.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Builds a compiler applying every override that can be applied.
    ///
    /// A failing override is logged and skipped; only a pattern compilation
    /// failure is returned.
    pub fn with_overrides(overrides: &Overrides) -> Result<Self> {
        let mut builder = Self::builder();
        for (key, change) in &overrides.classes {
            if let Err(e) = builder.override_class(key, change) {
                error!("class override `{key}` skipped: {e}");
            }
        }
        for (unit, precision) in &overrides.unit_precision {
            if let Err(e) = builder.set_unit_precision(unit, *precision) {
                error!("unit precision `{unit}` skipped: {e}");
            }
        }
        let mut compiler = builder.build()?;
        compiler.overrides = overrides.clone();
        Ok(compiler)
    }

    /// The overrides this compiler was configured with.
    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    pub fn classes(&self) -> &ClassTable {
        &self.classes
    }

    pub fn units(&self) -> &UnitTable {
        &self.units
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    pub fn policies(&self) -> &AtRulePolicyTable {
        &self.policies
    }

    pub fn matcher(&self) -> Matcher<'_> {
        Matcher::new(&self.classes, &self.units, &self.patterns)
    }

    /// Compiles distinct class tokens into grouped rule blocks.
    pub fn compile_classes<'t>(&self, tokens: impl IntoIterator<Item = &'t str>) -> RuleGroups {
        self.matcher().compile(tokens)
    }

    /// Compiles every class token collected from markup.
    pub fn compile_markup(&self, collector: &ClassCollector) -> RuleGroups {
        self.compile_classes(collector.tokens())
    }

    pub fn parse_css(&self, source: &str) -> CssForest {
        parse_css(source, &self.policies)
    }

    pub fn reassemble(&self, source: &str, mode: ReassemblyMode) -> String {
        Reassembler::new(&self.policies).reassemble(source, mode)
    }

    /// Fills `template` with the rule groups, then re-assembles the result
    /// together with `author_css` when there is any.
    pub fn assemble(
        &self,
        template: &Template,
        groups: &RuleGroups,
        author_css: Option<&str>,
        mode: ReassemblyMode,
    ) -> String {
        let utilities = template.render(groups.rendered());
        match author_css {
            Some(css) => {
                let combined = format!("{utilities}\n{css}");
                let mut out = self.reassemble(&combined, mode);
                out.push('\n');
                out
            }
            None => utilities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_overrides_are_skipped() {
        let overrides = Overrides {
            classes: vec![
                ("nope".into(), ClassOverride::default()),
                (
                    "z".into(),
                    ClassOverride {
                        priority: Some(0.0),
                        ..Default::default()
                    },
                ),
            ],
            unit_precision: vec![("parsec".into(), 2), ("rem".into(), 2)],
        };
        let compiler = Compiler::with_overrides(&overrides).unwrap();
        assert_eq!(compiler.classes().get("z").unwrap().priority, 0.0);
        assert_eq!(
            compiler.units().precision(crate::tables::NumericUnit::Rem),
            2
        );
        assert_eq!(compiler.overrides(), &overrides);
    }

    #[test]
    fn test_builder_records_overrides() {
        let mut builder = Compiler::builder();
        builder.set_unit_precision("px", 1).unwrap();
        let compiler = builder.build().unwrap();
        assert_eq!(compiler.overrides().unit_precision, vec![("px".to_string(), 1)]);
    }
}
