//! Single pass tokenizer for `{{...}}` markup.
//!
//! A tag runs from `{{` to the first `}}` before the next `{{`. An
//! opening `{{` without such a `}}` stays literal text, unless all
//! that follows it up to the next `{{` is whitespace, in which case
//! it is dropped.

use std::borrow::Cow;


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'t> {
    Text(Cow<'t, str>),
    /// The tag body between the braces, untrimmed.
    Tag(Cow<'t, str>),
}

impl<'t> Token<'t> {
    pub fn into_owned(self) -> Token<'static> {
        match self {
            Token::Text(s) => Token::Text(Cow::Owned(s.into_owned())),
            Token::Tag(s) => Token::Tag(Cow::Owned(s.into_owned())),
        }
    }
}

pub const OPEN: &str = "{{";
pub const CLOSE: &str = "}}";

pub fn tokenize<'t>(text: &'t str) -> Vec<Token<'t>> {
    let mut out = Vec::new();
    let mut open = match text.find(OPEN) {
        Some(i) => i,
        None => {
            if !text.is_empty() {
                out.push(Token::Text(Cow::Borrowed(text)));
            }
            return out
        }
    };
    if open > 0 {
        out.push(Token::Text(Cow::Borrowed(&text[..open])));
    }
    loop {
        let body_start = open + OPEN.len();
        let next_open = match text[body_start..].find(OPEN) {
            Some(i) => body_start + i,
            None => text.len()
        };
        let chunk = &text[body_start..next_open];
        match chunk.find(CLOSE) {
            Some(i) => {
                out.push(Token::Tag(Cow::Borrowed(&chunk[..i])));
                let after = &chunk[i + CLOSE.len()..];
                if !after.is_empty() {
                    out.push(Token::Text(Cow::Borrowed(after)));
                }
            }
            None =>
                if !chunk.trim().is_empty() {
                    out.push(Token::Text(Cow::Borrowed(&text[open..next_open])));
                }
        }
        if next_open == text.len() {
            break
        }
        open = next_open;
    }
    out
}

/// Insert `prefix` in front of the name in a tag body, after the `/`
/// of a closing tag. Leading whitespace is dropped.
pub fn prefix_tag(body: &str, prefix: &str) -> String {
    let body = body.trim_start();
    match body.strip_prefix('/') {
        Some(name) => format!("/{prefix}{name}"),
        None => format!("{prefix}{body}"),
    }
}
