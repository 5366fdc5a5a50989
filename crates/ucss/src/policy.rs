//! At-rule ordering and merge policies.
//!
//! Every known at-rule has an ordering priority (plain rules are `0`), which
//! the structural parser uses to sort siblings, and a merge policy plus key
//! strategy used by the merge engine to detect and consolidate duplicates.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::CssNode;

/// Captures the whole `src` descriptor value of an `@font-face` block.
static FONT_FACE_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[{;\s])src\s*:\s*([^;}]+)").expect("font-face src pattern is valid")
});

/// How duplicates sharing a merge key are combined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergePolicy {
    /// Union all contributors' declarations and nested rules.
    Accumulate,
    /// Keep only the last contributor's body.
    ReplaceOnDuplicate,
}

/// How the merge key of a node is derived.
#[derive(Clone, Debug)]
pub enum MergeKey {
    /// The normalized rule head.
    RuleHead,
    /// The whole original text with whitespace removed.
    NormalizedText,
    /// The rule head followed by the captured groups of a fragment pattern
    /// matched against the original text.
    Fragment(Regex),
}

#[derive(Clone, Debug)]
pub struct AtRulePolicy {
    pub name: &'static str,
    pub priority: i32,
    pub merge: MergePolicy,
    pub key: MergeKey,
}

impl AtRulePolicy {
    fn new(name: &'static str, priority: i32) -> Self {
        Self {
            name,
            priority,
            merge: MergePolicy::Accumulate,
            key: MergeKey::RuleHead,
        }
    }

    fn keyed(mut self, key: MergeKey) -> Self {
        self.key = key;
        self
    }

    fn replacing(mut self) -> Self {
        self.merge = MergePolicy::ReplaceOnDuplicate;
        self
    }
}

/// The at-rule policy table of one compiler.
#[derive(Clone, Debug)]
pub struct AtRulePolicyTable {
    policies: Vec<AtRulePolicy>,
}

impl Default for AtRulePolicyTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl AtRulePolicyTable {
    /// The CSS-mandated ordering: namespace/import/charset first, conditional
    /// group rules last.
    pub fn standard() -> Self {
        let policies = vec![
            AtRulePolicy::new("@namespace", -11).keyed(MergeKey::NormalizedText),
            AtRulePolicy::new("@import", -10).keyed(MergeKey::NormalizedText),
            AtRulePolicy::new("@charset", -9).keyed(MergeKey::NormalizedText),
            AtRulePolicy::new("@font-face", -8)
                .keyed(MergeKey::Fragment(FONT_FACE_SRC.clone()))
                .replacing(),
            AtRulePolicy::new("@font-feature-values", -7),
            AtRulePolicy::new("@character-variant", -7),
            AtRulePolicy::new("@styleset", -7),
            AtRulePolicy::new("@stylistic", -7),
            AtRulePolicy::new("@ornaments", -7),
            AtRulePolicy::new("@annotation", -7),
            AtRulePolicy::new("@swash", -7),
            AtRulePolicy::new("@font-palette-values", -6),
            AtRulePolicy::new("@page", -5),
            AtRulePolicy::new("@color-profile", -4),
            AtRulePolicy::new("@container", -3),
            AtRulePolicy::new("@property", -2),
            AtRulePolicy::new("@starting-style", -1),
            AtRulePolicy::new("@keyframes", 1).replacing(),
            AtRulePolicy::new("@counter-style", 2),
            AtRulePolicy::new("@supports", 3),
            AtRulePolicy::new("@scope", 4),
            AtRulePolicy::new("@layer", 5),
            AtRulePolicy::new("@media", 6),
        ];
        Self { policies }
    }

    /// Looks up the policy for a rule head or statement by its at-rule name.
    pub fn get(&self, rule: &str) -> Option<&AtRulePolicy> {
        let name = at_rule_name(rule)?;
        self.policies.iter().find(|p| p.name == name)
    }

    pub fn priority(&self, rule: &str) -> i32 {
        self.get(rule).map_or(0, |p| p.priority)
    }

    pub fn merge_policy(&self, rule: &str) -> MergePolicy {
        self.get(rule).map_or(MergePolicy::Accumulate, |p| p.merge)
    }

    /// Derives the key under which duplicates of `node` are consolidated.
    pub fn merge_key(&self, node: &CssNode) -> String {
        match node {
            CssNode::Statement(text) => match self.get(text).map(|p| &p.key) {
                Some(MergeKey::NormalizedText) => strip_whitespace(text),
                _ => text.clone(),
            },
            CssNode::Block { rule, original, .. } => match self.get(rule).map(|p| &p.key) {
                Some(MergeKey::NormalizedText) => normalized_text(original),
                Some(MergeKey::Fragment(pattern)) => match pattern.captures(original) {
                    Some(caps) => {
                        let mut key = strip_whitespace(rule);
                        for group in caps.iter().skip(1).flatten() {
                            key.push_str(&strip_whitespace(group.as_str()));
                        }
                        key
                    }
                    None => rule.clone(),
                },
                Some(MergeKey::RuleHead) | None => rule.clone(),
            },
        }
    }
}

/// Extracts `@name` from the start of a rule head or statement.
fn at_rule_name(rule: &str) -> Option<&str> {
    if !rule.starts_with('@') {
        return None;
    }
    let end = rule[1..]
        .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .map_or(rule.len(), |i| i + 1);
    Some(&rule[..end])
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Whitespace-free text where a trailing `;` before `}` does not matter.
fn normalized_text(text: &str) -> String {
    strip_whitespace(text).replace(";}", "}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CssBody;

    fn block(rule: &str, original: &str) -> CssNode {
        CssNode::Block {
            rule: rule.to_string(),
            original: original.to_string(),
            body: CssBody::Leaf(String::new()),
        }
    }

    #[test]
    fn test_at_rule_name() {
        assert_eq!(at_rule_name("@media(max-width:1px)"), Some("@media"));
        assert_eq!(at_rule_name("@font-face"), Some("@font-face"));
        assert_eq!(at_rule_name("@import url(a.css);"), Some("@import"));
        assert_eq!(at_rule_name(".a"), None);
    }

    #[test]
    fn test_priorities() {
        let table = AtRulePolicyTable::standard();
        assert_eq!(table.priority("@import url(x);"), -10);
        assert_eq!(table.priority("@media screen"), 6);
        assert_eq!(table.priority(".a"), 0);
        assert_eq!(table.priority("@font-feature-values Font"), -7);
        assert_eq!(table.priority("@-webkit-keyframes spin"), 0);
    }

    #[test]
    fn test_font_face_key_uses_src() {
        let table = AtRulePolicyTable::standard();
        let a = block("@font-face", "@font-face{src:url(x)}");
        let b = block("@font-face", "@font-face{ src: url(x) ;}");
        let c = block("@font-face", "@font-face{src:url(y)}");
        assert_eq!(table.merge_key(&a), table.merge_key(&b));
        assert_ne!(table.merge_key(&a), table.merge_key(&c));
        assert_eq!(
            table.merge_policy("@font-face"),
            MergePolicy::ReplaceOnDuplicate
        );
    }

    #[test]
    fn test_font_face_key_keeps_whole_url() {
        let table = AtRulePolicyTable::standard();
        let a = block(
            "@font-face",
            "@font-face{font-family:A;src:url(https://cdn.example/a.woff2?v=1&x=2) format(\"woff2\")}",
        );
        let b = block("@font-face", "@font-face{font-family:B;src:url(https://cdn.example/b.woff2)}");
        let key = table.merge_key(&a);
        assert!(key.ends_with("url(https://cdn.example/a.woff2?v=1&x=2)format(\"woff2\")"));
        assert_ne!(key, table.merge_key(&b));
    }

    #[test]
    fn test_import_key_ignores_whitespace() {
        let table = AtRulePolicyTable::standard();
        let a = CssNode::Statement("@import url(a.css);".into());
        let b = CssNode::Statement("@import  url(a.css) ;".into());
        assert_eq!(table.merge_key(&a), table.merge_key(&b));
    }
}
