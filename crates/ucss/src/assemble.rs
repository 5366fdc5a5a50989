//! Output assembler.
//!
//! Fills a template stylesheet's `---name---` placeholders with rendered
//! rule groups. Placeholders left unfilled are removed, as are the blank
//! lines they leave behind.

use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"---\w+---").expect("placeholder pattern is valid"));

const BUILTIN_TEMPLATE: &str = include_str!("../css/template.css");

/// A template stylesheet with named placeholders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    source: String,
}

impl Default for Template {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Template {
    /// The built-in template: `standard`, then one media block per breakpoint.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_TEMPLATE)
    }

    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Names of the placeholders present in the template, in order.
    pub fn placeholders(&self) -> Vec<&str> {
        PLACEHOLDER
            .find_iter(&self.source)
            .map(|m| m.as_str().trim_matches('-'))
            .collect()
    }

    /// Substitutes each group into its placeholder, in the groups' order.
    pub fn render<'g, I, S>(&self, groups: I) -> String
    where
        I: IntoIterator<Item = (&'g str, S)>,
        S: AsRef<str>,
    {
        let mut out = self.source.clone();
        for (name, text) in groups {
            out = out.replacen(&format!("---{name}---"), text.as_ref(), 1);
        }
        let out = PLACEHOLDER.replace_all(&out, "");
        collapse_blank_lines(&out)
    }
}

/// Drops whitespace-only lines.
fn collapse_blank_lines(text: &str) -> String {
    let mut out = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_placeholders() {
        assert_eq!(
            Template::builtin().placeholders(),
            vec!["standard", "md", "mdl", "mdp"]
        );
    }

    #[test]
    fn test_unfilled_and_unknown_placeholders_are_emptied() {
        let template = Template::new("a\n---one---\n\n\n---two---\nb\n---three---");
        let out = template.render([("one", "X")]);
        assert_eq!(out, "a\nX\nb\n");
    }

    #[test]
    fn test_empty_output() {
        assert_eq!(Template::new("---x---\n\n").render(Vec::<(&str, &str)>::new()), "");
    }
}
