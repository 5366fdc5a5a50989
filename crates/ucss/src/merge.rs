//! Stylesheet re-assembly.
//!
//! A parsed [`CssForest`] is serialized back in one of two modes:
//!
//! - [`ReassemblyMode::Concat`] writes every node in priority order,
//!   normalizing each body's declarations on its own.
//! - [`ReassemblyMode::Merge`] additionally consolidates siblings sharing a
//!   merge key: declarations are unioned with last-write-wins values, nested
//!   rules are merged recursively, and statements are written once.
//!
//! Both modes share one output format:
//!
//! ```text
//! .a,
//! .b{
//!     color: red;
//! }
//!
//! @media(max-width:1023px){
//!     .a{
//!         margin: 0;
//!     }
//! }
//! ```
//!
//! Feeding merged output back through the merge is a no-op.

use indexmap::IndexMap;

use crate::parser::declarations::extend_declarations;
use crate::parser::{CssBody, CssForest, CssNode, Declarations, parse_css};
use crate::policy::{AtRulePolicyTable, MergePolicy};

/// How a stylesheet is re-assembled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReassemblyMode {
    /// Keep every rule, in priority order.
    #[default]
    Concat,
    /// Consolidate duplicate rules.
    Merge,
}

/// Serializes parsed stylesheets according to an at-rule policy table.
#[derive(Clone, Copy, Debug)]
pub struct Reassembler<'a> {
    policies: &'a AtRulePolicyTable,
}

impl<'a> Reassembler<'a> {
    pub fn new(policies: &'a AtRulePolicyTable) -> Self {
        Self { policies }
    }

    /// Parses and re-assembles `source`.
    pub fn reassemble(&self, source: &str, mode: ReassemblyMode) -> String {
        let forest = parse_css(source, self.policies);
        match mode {
            ReassemblyMode::Concat => self.concat(&forest),
            ReassemblyMode::Merge => self.merge(&forest),
        }
    }

    pub fn concat(&self, forest: &CssForest) -> String {
        self.concat_nodes(&forest.nodes, 0)
    }

    pub fn merge(&self, forest: &CssForest) -> String {
        self.merge_nodes(forest.nodes.iter(), 0)
    }

    fn concat_nodes(&self, nodes: &[CssNode], depth: usize) -> String {
        let blocks: Vec<String> = nodes
            .iter()
            .map(|node| match node {
                CssNode::Statement(text) => format!("{}{text}", indent(depth)),
                CssNode::Block { rule, body, .. } => {
                    let mut decls = Declarations::new();
                    let inner = match body {
                        CssBody::Leaf(text) => {
                            extend_declarations(&mut decls, text);
                            String::new()
                        }
                        CssBody::Nested(forest) => {
                            if let Some(residual) = &forest.residual {
                                extend_declarations(&mut decls, residual);
                            }
                            self.concat_nodes(&forest.nodes, depth + 1)
                        }
                    };
                    render_block(rule, &decls, &inner, depth)
                }
            })
            .collect();
        blocks.join("\n\n")
    }

    fn merge_nodes<'n>(&self, nodes: impl Iterator<Item = &'n CssNode>, depth: usize) -> String {
        let mut groups: IndexMap<String, Group<'n>> = IndexMap::new();
        for node in nodes {
            let key = self.policies.merge_key(node);
            match node {
                CssNode::Statement(text) => {
                    groups.entry(key).or_insert(Group::Statement(text));
                }
                CssNode::Block { rule, body, .. } => {
                    let group = groups.entry(key).or_insert_with(|| Group::Block {
                        rule,
                        bodies: Vec::new(),
                    });
                    if let Group::Block { bodies, .. } = group {
                        if self.policies.merge_policy(rule) == MergePolicy::ReplaceOnDuplicate {
                            bodies.clear();
                        }
                        bodies.push(body);
                    }
                }
            }
        }

        let blocks: Vec<String> = groups
            .into_values()
            .map(|group| match group {
                Group::Statement(text) => format!("{}{text}", indent(depth)),
                Group::Block { rule, bodies } => {
                    let mut decls = Declarations::new();
                    let mut nested = Vec::new();
                    for body in bodies {
                        match body {
                            CssBody::Leaf(text) => extend_declarations(&mut decls, text),
                            CssBody::Nested(forest) => {
                                if let Some(residual) = &forest.residual {
                                    extend_declarations(&mut decls, residual);
                                }
                                nested.extend(forest.nodes.iter());
                            }
                        }
                    }
                    // contributors are sorted individually, not as a whole
                    nested.sort_by_key(|node| self.policies.priority(node.rule_text()));
                    let inner = self.merge_nodes(nested.into_iter(), depth + 1);
                    render_block(rule, &decls, &inner, depth)
                }
            })
            .collect();
        blocks.join("\n\n")
    }
}

/// Consolidated contributors of one merge key.
enum Group<'n> {
    Statement(&'n str),
    Block {
        rule: &'n str,
        bodies: Vec<&'n CssBody>,
    },
}

fn indent(depth: usize) -> String {
    "\t".repeat(depth)
}

fn render_block(rule: &str, decls: &Declarations, inner: &str, depth: usize) -> String {
    let pad = indent(depth);
    let mut out = format!("{pad}{}{{", rule.replace(',', &format!(",\n{pad}")));
    for (property, value) in decls {
        out.push_str(&format!("\n\t{pad}{property}: {value};"));
    }
    if !inner.is_empty() {
        out.push('\n');
        out.push_str(inner);
    }
    out.push('\n');
    out.push_str(&pad);
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str, mode: ReassemblyMode) -> String {
        Reassembler::new(&AtRulePolicyTable::standard()).reassemble(source, mode)
    }

    #[test]
    fn test_render_block_splits_selector_lists() {
        let mut decls = Declarations::new();
        decls.insert("color".into(), "red".into());
        assert_eq!(
            render_block(".a,.b", &decls, "", 1),
            "\t.a,\n\t.b{\n\t\tcolor: red;\n\t}"
        );
    }

    #[test]
    fn test_merge_unions_declarations() {
        let out = run(".a{color:red}.a{margin:0;color:blue}", ReassemblyMode::Merge);
        assert_eq!(out, ".a{\n\tcolor: blue;\n\tmargin: 0;\n}");
    }

    #[test]
    fn test_concat_keeps_duplicates() {
        let out = run(".a{color:red}.a{color:blue}", ReassemblyMode::Concat);
        assert_eq!(out, ".a{\n\tcolor: red;\n}\n\n.a{\n\tcolor: blue;\n}");
    }

    #[test]
    fn test_keyframes_replace() {
        let out = run(
            "@keyframes spin{from{x:0}to{x:1}} @keyframes spin{to{x:2}}",
            ReassemblyMode::Merge,
        );
        assert_eq!(out, "@keyframes spin{\n\tto{\n\t\tx: 2;\n\t}\n}");
    }

    #[test]
    fn test_statements_written_once() {
        let out = run(
            "@import url(a.css); .a{x:1} @import  url(a.css) ;",
            ReassemblyMode::Merge,
        );
        assert_eq!(out, "@import url(a.css);\n\n.a{\n\tx: 1;\n}");
    }
}
