//! Class token extraction from markup.
//!
//! Only `class="..."` / `class='...'` attributes whose content is made of word
//! characters, hyphens and whitespace are considered; anything else (template
//! expressions, escaped quotes) is skipped rather than guessed at.

use indexmap::IndexSet;
use nom::{
    IResult,
    bytes::complete::{tag, take_while},
    character::complete::{char, one_of},
};

const ATTRIBUTE: &str = "class=";

fn is_class_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c.is_whitespace()
}

/// Parses `class="..."` at the start of `input`, returning the attribute value.
fn class_attribute(input: &str) -> IResult<&str, &str> {
    let (input, _) = tag(ATTRIBUTE)(input)?;
    let (input, quote) = one_of("\"'")(input)?;
    let (input, value) = take_while(is_class_char)(input)?;
    let (input, _) = char(quote)(input)?;
    Ok((input, value))
}

/// Returns every class token of every class attribute, in document order.
pub fn scan_classes(markup: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = markup;
    while let Some(pos) = rest.find(ATTRIBUTE) {
        match class_attribute(&rest[pos..]) {
            Ok((remaining, value)) => {
                tokens.extend(value.split_whitespace());
                rest = remaining;
            }
            Err(_) => rest = &rest[pos + ATTRIBUTE.len()..],
        }
    }
    tokens
}

/// Distinct class tokens across any number of documents, first-seen order.
#[derive(Clone, Debug, Default)]
pub struct ClassCollector {
    seen: IndexSet<String>,
}

impl ClassCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_markup(&mut self, markup: &str) {
        for token in scan_classes(markup) {
            if !self.seen.contains(token) {
                self.seen.insert(token.to_string());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.seen.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_double_and_single_quotes() {
        let html = r#"<div class="d-flex  jc-center"><p class='c-red'>x</p></div>"#;
        assert_eq!(scan_classes(html), vec!["d-flex", "jc-center", "c-red"]);
    }

    #[test]
    fn test_skips_attributes_with_foreign_characters() {
        let html = r#"<div class="{{ dynamic }}"></div><i class="m-2"></i>"#;
        assert_eq!(scan_classes(html), vec!["m-2"]);
    }

    #[test]
    fn test_unterminated_attribute() {
        assert!(scan_classes(r#"<div class="d-flex"#).is_empty());
    }

    #[test]
    fn test_collector_deduplicates_in_first_seen_order() {
        let mut collector = ClassCollector::new();
        collector.add_markup(r#"<a class="b a"></a>"#);
        collector.add_markup(r#"<a class="a c b"></a>"#);
        assert_eq!(collector.tokens().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }
}
