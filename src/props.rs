//! Inline tag properties: `title:"Save, now", style:outline`.

use std::collections::HashMap;

use itertools::Itertools;


/// Split at `:` and `,` outside of double quotes. Items are trimmed;
/// a trailing empty item (from a trailing comma) is dropped.
pub fn split_properties(s: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        if in_quotes {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ':' | ',' => {
                    items.push(s[start..i].trim());
                    start = i + c.len_utf8();
                }
                _ => ()
            }
        }
    }
    let last = s[start..].trim();
    if !last.is_empty() {
        items.push(last);
    }
    items
}

fn json_string(item: &str) -> String {
    if item.starts_with('"') {
        item.to_string()
    } else {
        serde_json::Value::from(item).to_string()
    }
}

/// Parse a property list into a map. Bare words are taken as strings.
/// Returns None for anything malformed: an empty list, empty items,
/// a key without value, or broken quoting.
pub fn parse_properties(s: &str) -> Option<HashMap<String, String>> {
    let items = split_properties(s);
    if items.is_empty()
        || items.len() % 2 != 0
        || items.iter().any(|item| item.is_empty())
    {
        return None
    }
    let json = format!(
        "{{{}}}",
        items.chunks(2)
            .map(|kv| format!("{}:{}", json_string(kv[0]), json_string(kv[1])))
            .join(","));
    serde_json::from_str(&json).ok()
}
