//! Template text to `Template`: section extraction, partial
//! inclusion with variable prefixing, element and block indexing.

use std::{collections::HashMap, sync::Arc};

use kstring::KString;

use crate::{element::{Element, Fields, Partial, Template},
            data::ViewData,
            error::ViewWarning,
            path::strip_leading_slash,
            props::parse_properties,
            render::render,
            scanner::{Token, tokenize, prefix_tag}};


/// Opening tags of sections whose `}}` is further away than this from
/// their `{{` are not recognized.
pub const SECTION_TAG_LIMIT: usize = 256;

/// Partials nested deeper than this are dropped (guards against
/// templates including themselves).
pub const MAX_PARTIAL_DEPTH: usize = 16;


/// How the parser gets at included templates.
pub trait PartialLoader {
    /// Canonical path for a partial path as written in a template.
    fn resolve(&self, raw: &str) -> String;

    /// The parsed partial, or None if there is no such file. `depth`
    /// is the nesting level the partial will be parsed at.
    fn load_partial(&self, path: &str, depth: usize) -> Option<Arc<Template>>;
}

/// For inline templates without access to files: every include is
/// missing.
pub struct NoPartials;

impl PartialLoader for NoPartials {
    fn resolve(&self, raw: &str) -> String {
        format!("/{}", strip_leading_slash(raw))
    }

    fn load_partial(&self, _path: &str, _depth: usize) -> Option<Arc<Template>> {
        None
    }
}


/// Byte length of the start of `text` that lower-cases to `lower`.
fn lowercase_prefix_len(text: &str, lower: &str) -> Option<usize> {
    if lower.is_empty() {
        return Some(0)
    }
    let mut acc = String::new();
    for (i, c) in text.char_indices() {
        acc.extend(c.to_lowercase());
        if acc.len() >= lower.len() {
            return if acc == lower { Some(i + c.len_utf8()) } else { None }
        }
        if !lower.starts_with(&*acc) {
            return None
        }
    }
    None
}

/// The content between `{{section ...}}` and `{{/section}}`, the
/// section name matched case-insensitively. None if not found.
pub fn extract_section<'t>(text: &'t str, section: &str) -> Option<&'t str> {
    let section = section.to_lowercase();
    let mut from = 0;
    let (start, name_end) = loop {
        let i = from + text[from..].find("{{")?;
        let name_start = i + 2;
        if let Some(n) = lowercase_prefix_len(&text[name_start..], &section) {
            let name_end = name_start + n;
            match text[name_end..].chars().next() {
                Some(c) if c == '}' || c.is_whitespace() => break (i, name_end),
                _ => ()
            }
        }
        from = name_start;
    };
    let tag_close = name_end + text[name_end..].find("}}")?;
    if tag_close - start > SECTION_TAG_LIMIT {
        return None
    }
    let open_end = tag_close + 2;
    let mut from = open_end;
    loop {
        let close = from + text[from..].find("{{/")?;
        let name_start = close + 3;
        if let Some(n) = lowercase_prefix_len(&text[name_start..], &section) {
            if text[name_start + n..].starts_with("}}") {
                return Some(&text[open_end..close])
            }
        }
        from = name_start;
    }
}


/// A tag of the form `name "path" key:"value", ...`.
#[derive(Debug, PartialEq, Eq)]
struct PartialInclude {
    name: KString,
    path: String,
    overrides: String,
}

fn partial_include(body: &str) -> Option<PartialInclude> {
    let quote = body.find('"')?;
    let name = body[..quote].trim();
    if name.is_empty() || quote + 2 >= body.len() {
        return None
    }
    if let Some(colon) = body.find(':') {
        if colon < quote {
            return None
        }
    }
    let rest = &body[quote + 1..];
    let (path, overrides) = match rest.find('"') {
        Some(end) => (&rest[..end], rest[end + 1..].trim()),
        None => ("", "")
    };
    Some(PartialInclude {
        name: KString::from_string(name.to_lowercase()),
        path: path.into(),
        overrides: overrides.into(),
    })
}


struct Parser<'l> {
    loader: &'l dyn PartialLoader,
    depth: usize,
    partials: Vec<Partial>,
    warnings: Vec<ViewWarning>,
}

impl<'l> Parser<'l> {
    fn expand<'t>(&mut self, tokens: Vec<Token<'t>>) -> Vec<Token<'t>> {
        let mut out = Vec::with_capacity(tokens.len());
        for token in tokens {
            match token {
                Token::Tag(body) => {
                    if let Some(include) = partial_include(&body) {
                        self.include(include, &mut out);
                    } else {
                        out.push(Token::Tag(body));
                    }
                }
                text => out.push(text)
            }
        }
        out
    }

    /// Replace an include tag with the partial's markup, prefixed.
    fn include<'t>(&mut self, include: PartialInclude, out: &mut Vec<Token<'t>>) {
        let PartialInclude { name, path, overrides } = include;
        if path.is_empty() {
            self.warnings.push(ViewWarning::EmptyPartialPath { name: name.to_string() });
            return
        }
        let path = self.loader.resolve(&path);
        if self.depth >= MAX_PARTIAL_DEPTH {
            self.warnings.push(ViewWarning::PartialTooDeep {
                name: name.to_string(),
                path,
                limit: MAX_PARTIAL_DEPTH
            });
            return
        }
        let sub = match self.loader.load_partial(&path, self.depth + 1) {
            Some(sub) => sub,
            None => {
                self.warnings.push(ViewWarning::MissingPartial {
                    name: name.to_string(),
                    path
                });
                return
            }
        };

        let mut data = ViewData::new();
        if overrides.contains(':') {
            match parse_properties(&overrides) {
                Some(props) =>
                    for (k, v) in props {
                        data.set(&k, v);
                    },
                None => self.warnings.push(ViewWarning::MalformedProperties {
                    tag: format!("{name} \"{path}\" {overrides}")
                })
            }
        }
        let prefix = format!("{name}-");
        let html = render(&sub.elements, &data, false);

        self.partials.push(Partial {
            name,
            path,
            prefix: prefix.clone(),
        });
        self.partials.extend(sub.partials.iter().map(|p| Partial {
            prefix: format!("{prefix}{}", p.prefix),
            ..p.clone()
        }));
        self.warnings.extend(sub.warnings.iter().cloned());

        // Only tags get the prefix, literal `{{` in text stays as is
        for token in tokenize(&html) {
            out.push(match token {
                Token::Tag(body) => Token::Tag(prefix_tag(&body, &prefix).into()),
                text => text.into_owned(),
            });
        }
    }

    fn tag_element(&mut self, body: &str) -> Element {
        let body = body.trim();
        let (name, var) = match body.find(char::is_whitespace) {
            Some(i) => (&body[..i], Some(body[i..].trim())),
            None => (body, None)
        };
        let mut element = Element::literal("");
        element.name = KString::from_string(name.to_lowercase());
        if let Some(var) = var {
            element.vars = parse_properties(var);
            if element.vars.is_none() {
                self.warnings.push(ViewWarning::MalformedProperties {
                    tag: body.into()
                });
            }
            element.var = Some(var.into());
        }
        element
    }

    fn build<'t>(mut self, tokens: Vec<Token<'t>>) -> Template {
        let mut elements = vec![Element::literal("")];
        for token in tokens {
            match token {
                Token::Text(s) =>
                    elements.last_mut().expect("never empty").html.push_str(&s),
                Token::Tag(body) => {
                    let element = self.tag_element(&body);
                    elements.push(element);
                }
            }
        }

        // Closing tag name -> its indices, ascending
        let mut closings: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, e) in elements.iter().enumerate() {
            if e.is_closing() && e.var.is_none() {
                closings.entry(&e.name[1..]).or_default().push(i);
            }
        }
        let mut block_ends = Vec::with_capacity(elements.len());
        let mut fields = Fields::new();
        for (i, e) in elements.iter().enumerate() {
            let mut block_end = None;
            if !e.name.is_empty() && !e.name.contains('/') {
                fields.entry(e.name.clone()).or_default().push(i);
                if let Some(ends) = closings.get(e.name.as_str()) {
                    let j = ends.partition_point(|&j| j <= i);
                    block_end = ends.get(j).copied();
                }
            }
            block_ends.push(block_end);
        }
        for (e, block_end) in elements.iter_mut().zip(block_ends) {
            e.block_end = block_end;
        }

        Template {
            elements,
            fields,
            partials: self.partials,
            warnings: self.warnings,
        }
    }
}


/// Parse template text. `section`, if non-empty, restricts parsing to
/// that section (whole text if it isn't found); `file` is only used
/// in warnings. `depth` is the partial nesting level of this text.
pub fn parse(
    text: &str,
    file: &str,
    section: &str,
    loader: &dyn PartialLoader,
    depth: usize
) -> Template {
    let mut warnings = Vec::new();
    let mut text = text;
    if !section.is_empty() && !text.trim().is_empty() {
        match extract_section(text, section) {
            Some(s) => text = s,
            None => warnings.push(ViewWarning::MissingSection {
                file: file.into(),
                section: section.into()
            })
        }
    }
    if text.trim().is_empty() {
        return Template { warnings, ..Template::default() }
    }
    let mut parser = Parser {
        loader,
        depth,
        partials: Vec::new(),
        warnings,
    };
    let tokens = parser.expand(tokenize(text));
    parser.build(tokens)
}

/// Parse inline text that has no access to partials.
pub fn parse_text(text: &str) -> Template {
    parse(text, "", "", &NoPartials, 0)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn names(t: &Template) -> Vec<&str> {
        t.elements.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn t_elements() {
        let t = parse_text("a{{x}}b{{/x}}c");
        assert_eq!(names(&t), vec!["", "x", "/x"]);
        assert_eq!(t.elements[0].html, "a");
        assert_eq!(t.elements[1].html, "b");
        assert_eq!(t.elements[2].html, "c");
        assert_eq!(t.elements[1].block_end, Some(2));
        assert!(t.elements[1].is_block());
        assert_eq!(t.elements[2].block_end, None);
        assert_eq!(t.field_indices("x"), &[1]);
        assert!(t.fields.get("/x").is_none());
    }

    #[test]
    fn t_leading_tag_and_blank() {
        let t = parse_text("{{x}}");
        assert_eq!(names(&t), vec!["", "x"]);
        assert_eq!(t.elements[0].html, "");
        assert!(parse_text("").is_empty());
        assert!(parse_text(" \n\t").is_empty());
    }

    #[test]
    fn t_case_insensitive_fields() {
        let t = parse_text("{{Name}} and {{name}} and {{NAME}}");
        assert_eq!(t.field_indices("name"), &[1, 2, 3]);
        assert_eq!(t.field_indices("Name"), &[1, 2, 3]);
        assert_eq!(t.fields.len(), 1);
    }

    #[test]
    fn t_first_closing_wins() {
        let t = parse_text("{{x}}1{{/x}}2{{x}}3{{/x}}");
        assert_eq!(t.elements[1].block_end, Some(2));
        assert_eq!(t.elements[3].block_end, Some(4));
        // A closing tag before the opener doesn't count
        let t = parse_text("{{/y}}{{y}}");
        assert_eq!(t.elements[2].block_end, None);
        // Closing tags with trailing junk are no closing tags
        let t = parse_text("{{y}}{{/y z}}");
        assert_eq!(t.elements[1].block_end, None);
    }

    #[test]
    fn t_empty_tags() {
        let t = parse_text("a{{ }}b{{}}c");
        assert_eq!(render(&t.elements, &ViewData::new(), true), "abc");
        assert!(t.fields.is_empty());
    }

    #[test]
    fn t_inline_vars() {
        let t = parse_text("{{btn title:\"Save, now\", style:\"outline\"}}");
        let e = &t.elements[1];
        assert_eq!(e.name.as_str(), "btn");
        assert_eq!(e.var("title"), Some("Save, now"));
        assert_eq!(e.var("style"), Some("outline"));
        assert_eq!(e.var.as_deref(), Some("title:\"Save, now\", style:\"outline\""));
        assert!(t.warnings.is_empty());
    }

    #[test]
    fn t_malformed_vars() {
        let t = parse_text("x{{btn title:\"Save}}y{{z}}");
        assert_eq!(names(&t), vec!["", "btn", "z"]);
        assert_eq!(t.elements[1].vars, None);
        assert_eq!(t.elements[1].html, "y");
        assert_eq!(t.warnings, vec![ViewWarning::MalformedProperties {
            tag: "btn title:\"Save".into()
        }]);
    }

    #[test]
    fn t_partial_include() {
        assert_eq!(partial_include("hello \"/partials/greet\""),
                   Some(PartialInclude {
                       name: KString::from_static("hello"),
                       path: "/partials/greet".into(),
                       overrides: "".into(),
                   }));
        assert_eq!(partial_include("Btn \"/ui/button\" title:\"save\", x:\"1\""),
                   Some(PartialInclude {
                       name: KString::from_static("btn"),
                       path: "/ui/button".into(),
                       overrides: "title:\"save\", x:\"1\"".into(),
                   }));
        // colon before the quote: a variable with properties
        assert_eq!(partial_include("btn title:\"save\""), None);
        // no name
        assert_eq!(partial_include("\"/a\""), None);
        assert_eq!(partial_include("plain"), None);
        assert_eq!(partial_include("x \"/a"),
                   Some(PartialInclude {
                       name: KString::from_static("x"),
                       path: "".into(),
                       overrides: "".into(),
                   }));
    }

    #[test]
    fn t_missing_partials_collapse() {
        let t = parse_text("a{{hello \"/partials/greet\"}}b{{x \"/b\"}}c");
        assert_eq!(render(&t.elements, &ViewData::new(), true), "abc");
        assert_eq!(t.warnings, vec![
            ViewWarning::MissingPartial {
                name: "hello".into(), path: "/partials/greet".into()
            },
            ViewWarning::MissingPartial {
                name: "x".into(), path: "/b".into()
            }]);
        assert!(t.partials.is_empty());
    }

    #[test]
    fn t_extract_section() {
        let text = "x{{head}}H{{/head}}{{Body id:\"b\"}}B{{/body}}y";
        assert_eq!(extract_section(text, "head"), Some("H"));
        assert_eq!(extract_section(text, "body"), Some("B"));
        assert_eq!(extract_section(text, "BODY"), Some("B"));
        assert_eq!(extract_section(text, "foot"), None);
        assert_eq!(extract_section("{{head}}unclosed", "head"), None);
        // prefix of a longer name
        assert_eq!(extract_section("{{header}}a{{/header}}{{head}}b{{/head}}", "head"),
                   Some("b"));
        assert_eq!(extract_section("{{e}}{{/e}}", "e"), Some(""));
        assert_eq!(extract_section("{{a}}x{{/ab}}y{{/A}}", "a"), Some("x{{/ab}}y"));
    }

    #[test]
    fn t_extract_section_unicode() {
        let text = "top{{Über}}in{{/Über}}bottom";
        assert_eq!(extract_section(text, "Über"), Some("in"));
        assert_eq!(extract_section(text, "über"), Some("in"));
        assert_eq!(extract_section(text, "ÜBER"), Some("in"));
        assert_eq!(extract_section("{{ÜBER}}x{{/über}}", "Über"), Some("x"));
        assert_eq!(extract_section(text, "übe"), None);
        assert_eq!(lowercase_prefix_len("ÜberX", "über"), Some("Über".len()));
        assert_eq!(lowercase_prefix_len("Üb", "über"), None);
    }

    #[test]
    fn t_section_tag_limit() {
        let long = format!("{{{{s {}}}}}in{{{{/s}}}}", "a".repeat(SECTION_TAG_LIMIT));
        assert_eq!(extract_section(&long, "s"), None);
        let short = format!("{{{{s {}}}}}in{{{{/s}}}}",
                            "a".repeat(SECTION_TAG_LIMIT - 4));
        assert_eq!(extract_section(&short, "s"), Some("in"));
    }

    #[test]
    fn t_parse_section() {
        let text = "top{{row}}<tr>{{cell}}</tr>{{/row}}bottom";
        let t = parse(text, "f.html", "row", &NoPartials, 0);
        let mut d = ViewData::new();
        d.set("cell", "1");
        assert_eq!(render(&t.elements, &d, true), "<tr>1</tr>");

        // not found: whole document
        let t = parse(text, "f.html", "nope", &NoPartials, 0);
        assert_eq!(render(&t.elements, &d, true), "topbottom");
        assert_eq!(t.warnings, vec![ViewWarning::MissingSection {
            file: "f.html".into(), section: "nope".into()
        }]);
    }

    #[test]
    fn t_passive_round_trip() {
        let text = "a{{x}}b{{v k:\"1\"}}{{/x}}c{{w}}d{{ }}e";
        let t = parse_text(text);
        for d in [
            ViewData::new(),
            [("x", "True"), ("w", "W")].into_iter().collect(),
            [("x", "False"), ("v", "V")].into_iter().collect(),
        ] {
            let direct = render(&t.elements, &d, true);
            let passive = render(&t.elements, &d, false);
            let again = parse_text(&passive);
            assert_eq!(render(&again.elements, &d, true), direct);
        }
    }
}
