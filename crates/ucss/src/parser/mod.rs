//! Structural CSS parser.
//!
//! Splits a stylesheet into a forest of [`CssNode`]s without interpreting
//! declarations. Only what the re-assembly engine needs is recovered:
//!
//! - block rules (`head { body }`), with bodies that either hold plain
//!   declaration text or further nested rules
//! - bodiless at-statements (`@import url(x);`)
//! - residual text between constructs, which for nested bodies is the rule's
//!   own declarations
//!
//! ## Processing Steps
//!
//! 1. Block comments (`/* */`) are stripped
//! 2. The leftmost construct is located and removed from the input
//! 3. Bodies containing constructs are parsed recursively
//! 4. Siblings are stably sorted by at-rule priority
//!
//! Unbalanced braces are tolerated: an unclosed block swallows the rest of
//! its input. Top-level residual text is reported as an anomaly and dropped.

pub mod declarations;

use log::warn;

use crate::policy::AtRulePolicyTable;

pub use declarations::{Declarations, parse_declarations};

/// The body of a block rule.
#[derive(Clone, Debug, PartialEq)]
pub enum CssBody {
    /// Flat declaration text.
    Leaf(String),
    /// Nested rules plus the rule's own declarations as residual text.
    Nested(CssForest),
}

/// A parsed construct.
#[derive(Clone, Debug, PartialEq)]
pub enum CssNode {
    /// A bodiless at-rule, including its terminating `;`.
    Statement(String),
    Block {
        /// The normalized rule head.
        rule: String,
        /// The construct as written, head and body.
        original: String,
        body: CssBody,
    },
}

impl CssNode {
    /// The head of a block, or the full text of a statement.
    pub fn rule_text(&self) -> &str {
        match self {
            CssNode::Statement(text) => text,
            CssNode::Block { rule, .. } => rule,
        }
    }
}

/// Sibling nodes in priority order, plus leftover text between them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CssForest {
    pub nodes: Vec<CssNode>,
    pub residual: Option<String>,
}

/// Parses a whole stylesheet.
pub fn parse_css(source: &str, policies: &AtRulePolicyTable) -> CssForest {
    let clean = strip_comments(source);
    let forest = parse_forest(&clean, policies);
    if let Some(residual) = &forest.residual {
        warn!(
            "dropping unparsed css outside of any rule: {}",
            preview(residual)
        );
    }
    forest
}

/// Removes every `/* ... */` comment. An unterminated comment runs to the end.
pub fn strip_comments(source: &str) -> String {
    let mut clean = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            while let Some(inner) = chars.next() {
                if inner == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    break;
                }
            }
            continue;
        }
        clean.push(c);
    }
    clean
}

/// Collapses whitespace runs and drops whitespace around commas.
pub fn normalize_head(head: &str) -> String {
    head.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" ,", ",")
        .replace(", ", ",")
}

fn parse_forest(input: &str, policies: &AtRulePolicyTable) -> CssForest {
    let mut nodes = Vec::new();
    let mut residual = String::new();
    let mut rest = input;

    while let Some(found) = next_construct(rest) {
        residual.push_str(&rest[..found.start]);
        let text = &rest[found.start..found.end];
        match found.kind {
            ConstructKind::Statement => nodes.push(CssNode::Statement(text.trim().to_string())),
            ConstructKind::Block { open } => {
                let head = normalize_head(&rest[found.start..open]);
                if head.is_empty() {
                    warn!("dropping block without a rule head: {}", preview(text));
                } else {
                    let close = if found.closed { found.end - 1 } else { found.end };
                    let inner = &rest[open + 1..close];
                    let body = if next_construct(inner).is_some() {
                        CssBody::Nested(parse_forest(inner, policies))
                    } else {
                        CssBody::Leaf(inner.to_string())
                    };
                    nodes.push(CssNode::Block {
                        rule: head,
                        original: text.trim().to_string(),
                        body,
                    });
                }
            }
        }
        rest = &rest[found.end..];
    }
    residual.push_str(rest);

    nodes.sort_by_key(|node| policies.priority(node.rule_text()));
    CssForest {
        nodes,
        residual: (!residual.trim().is_empty()).then_some(residual),
    }
}

enum ConstructKind {
    Statement,
    /// Byte offset of the opening brace.
    Block { open: usize },
}

struct Construct {
    start: usize,
    end: usize,
    closed: bool,
    kind: ConstructKind,
}

/// Finds the leftmost construct in `input`.
///
/// A construct starts at a run of characters other than `{};`. A run whose
/// first non-blank character is `@` is an at-rule: followed by `;` it is a
/// statement. Any run followed by `{` is a block. Inside parentheses,
/// brackets and quotes, `@` and `;` are ordinary characters.
fn next_construct(input: &str) -> Option<Construct> {
    let mut run: Option<(usize, bool)> = None;
    let mut run_len = 0usize;
    let mut blank = true;
    let mut nesting = 0usize;
    let mut quote: Option<char> = None;

    for (i, c) in input.char_indices() {
        let guarded = run.is_some() && (nesting > 0 || quote.is_some());
        match c {
            '{' => {
                if let Some((start, _)) = run {
                    if run_len > 0 {
                        let (end, closed) = match_brace(input, i);
                        return Some(Construct {
                            start,
                            end,
                            closed,
                            kind: ConstructKind::Block { open: i },
                        });
                    }
                }
                run = None;
            }
            '}' => run = None,
            ';' if !guarded => {
                if let Some((start, true)) = run {
                    if run_len > 0 {
                        return Some(Construct {
                            start,
                            end: i + 1,
                            closed: true,
                            kind: ConstructKind::Statement,
                        });
                    }
                }
                run = None;
            }
            '@' if run.is_none() || (blank && !guarded) => {
                run = Some((i, true));
                run_len = 0;
                blank = false;
                nesting = 0;
                quote = None;
            }
            _ => {
                if run.is_none() {
                    run = Some((i, false));
                    run_len = 0;
                    blank = true;
                    nesting = 0;
                    quote = None;
                }
                run_len += 1;
                if !c.is_whitespace() {
                    blank = false;
                }
                match quote {
                    Some(q) if c == q => quote = None,
                    Some(_) => {}
                    None => match c {
                        '"' | '\'' => quote = Some(c),
                        '(' | '[' => nesting += 1,
                        ')' | ']' => nesting = nesting.saturating_sub(1),
                        _ => {}
                    },
                }
            }
        }
    }
    None
}

/// Returns the offset just past the brace closing the one at `open`, and
/// whether it was found at all.
fn match_brace(input: &str, open: usize) -> (usize, bool) {
    let mut depth = 0usize;
    for (i, c) in input[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return (open + i + 1, true);
                }
            }
            _ => {}
        }
    }
    warn!("unbalanced braces, block runs to end of input");
    (input.len(), false)
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(60) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> CssForest {
        parse_css(source, &AtRulePolicyTable::standard())
    }

    fn heads(forest: &CssForest) -> Vec<&str> {
        forest.nodes.iter().map(CssNode::rule_text).collect()
    }

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("a/* x */b/* unterminated"), "ab");
        assert_eq!(strip_comments("a / * b"), "a / * b");
    }

    #[test]
    fn test_normalize_head() {
        assert_eq!(normalize_head("  .a ,\n .b  > p "), ".a,.b > p");
    }

    #[test]
    fn test_leaf_and_statement() {
        let forest = parse("@import url(a.css);\n.a { color: red; }");
        assert_eq!(heads(&forest), vec!["@import url(a.css);", ".a"]);
        assert_eq!(forest.residual, None);
        match &forest.nodes[1] {
            CssNode::Block { body, original, .. } => {
                assert_eq!(body, &CssBody::Leaf(" color: red; ".into()));
                assert_eq!(original, ".a { color: red; }");
            }
            other => panic!("expected block, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_body_keeps_own_declarations_as_residual() {
        let forest = parse(".a{color:red; .b{x:1}}");
        let CssNode::Block { body: CssBody::Nested(inner), .. } = &forest.nodes[0] else {
            panic!("expected nested block");
        };
        assert_eq!(heads(inner), vec![".b"]);
        assert_eq!(inner.residual.as_deref(), Some("color:red;"));
    }

    #[test]
    fn test_siblings_sorted_by_priority() {
        let forest = parse("@media screen{.a{x:1}} .b{x:1} @import url(a);");
        assert_eq!(heads(&forest), vec!["@import url(a);", ".b", "@media screen"]);
    }

    #[test]
    fn test_unbalanced_block_runs_to_end() {
        let forest = parse(".a{color:red; .b{x:1}");
        assert_eq!(forest.nodes.len(), 1);
        assert_eq!(forest.nodes[0].rule_text(), ".a");
    }

    #[test]
    fn test_top_level_residual_is_reported() {
        let forest = parse("stray; .a{x:1}");
        assert_eq!(forest.residual.as_deref(), Some("stray;"));
        assert_eq!(heads(&forest), vec![".a"]);
    }

    #[test]
    fn test_at_sign_inside_value_stays_in_leaf() {
        let forest = parse(".logo{background:url(logo@2x.png);color:red}");
        assert_eq!(heads(&forest), vec![".logo"]);
        assert_eq!(forest.residual, None);
        match &forest.nodes[0] {
            CssNode::Block { body, .. } => assert_eq!(
                body,
                &CssBody::Leaf("background:url(logo@2x.png);color:red".into())
            ),
            other => panic!("expected block, got {other:?}"),
        }
    }

    #[test]
    fn test_at_sign_inside_attribute_selector() {
        let forest = parse(r#"a[href^="mailto:x@y"]{color:red} @import url(a@b.css);"#);
        assert_eq!(
            heads(&forest),
            vec!["@import url(a@b.css);", r#"a[href^="mailto:x@y"]"#]
        );
    }

    #[test]
    fn test_at_rule_after_declarations() {
        let forest = parse(".a{color:red;\n  @media print{x:1}}");
        let CssNode::Block { body: CssBody::Nested(inner), .. } = &forest.nodes[0] else {
            panic!("expected nested block");
        };
        assert_eq!(heads(inner), vec!["@media print"]);
        assert_eq!(inner.residual.as_deref(), Some("color:red;\n  "));
    }

    #[test]
    fn test_headless_block_is_dropped() {
        let forest = parse(" {x:1} .a{x:1}");
        assert_eq!(heads(&forest), vec![".a"]);
    }
}
