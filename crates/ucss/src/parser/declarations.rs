//! Declaration lists inside rule bodies.
//!
//! A body is split on `;` outside of parentheses, so values such as
//! `url(data:image/png;base64,...)` survive intact. Each part is then parsed
//! as `property: value`; parts that do not have that shape are skipped.

use indexmap::IndexMap;
use log::debug;
use nom::{
    IResult,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::rest,
    sequence::tuple,
};

/// Property to value, last write wins, first-seen order.
pub type Declarations = IndexMap<String, String>;

fn is_property_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn declaration(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, _) = multispace0(input)?;
    let (input, property) = take_while1(is_property_char)(input)?;
    let (input, _) = tuple((multispace0, char(':'), multispace0))(input)?;
    let (input, value) = rest(input)?;
    Ok((input, (property, value)))
}

/// Splits on `;` at parenthesis depth zero.
pub fn split_declarations(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Parses a body into its declarations, values whitespace-collapsed.
pub fn parse_declarations(text: &str) -> Declarations {
    let mut decls = Declarations::new();
    extend_declarations(&mut decls, text);
    decls
}

/// Adds the declarations of `text` to `decls`, overwriting values in place.
pub fn extend_declarations(decls: &mut Declarations, text: &str) {
    for part in split_declarations(text) {
        if part.trim().is_empty() {
            continue;
        }
        match declaration(part) {
            Ok((_, (property, value))) => {
                let value = value.split_whitespace().collect::<Vec<_>>().join(" ");
                if value.is_empty() {
                    debug!("skipping empty declaration `{property}`");
                    continue;
                }
                decls.insert(property.to_string(), value);
            }
            Err(_) => debug!("skipping malformed declaration `{}`", part.trim()),
        }
    }
}
