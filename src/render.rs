//! Turning parsed elements plus data into output.

use crate::{element::Element, data::{ViewData, TRUE}};


fn is_shown(element: &Element, data: &ViewData) -> bool {
    !element.name.contains('/')
        && data.get_lowercase(&element.name) == Some(TRUE)
}

/// Render `elements[start..end]`. With `hide_elements` (the normal
/// mode) blocks that are not shown are skipped up to their closing
/// element; without it (passive mode) tags whose name has no data are
/// reproduced as written.
pub fn render_range(
    elements: &[Element],
    start: usize,
    end: usize,
    data: &ViewData,
    hide_elements: bool
) -> String {
    let end = end.min(elements.len());
    let mut out = String::new();
    let mut i = start;
    while i < end {
        let element = &elements[i];
        if !element.is_block() && !element.name.is_empty() {
            if let Some(value) = data.get_lowercase(&element.name) {
                out.push_str(value);
                out.push_str(&element.html);
                i += 1;
                continue
            }
        }
        match element.block_end {
            Some(block_end) if hide_elements && !is_shown(element, data) => {
                // Continue with the closing element, which emits its
                // own html
                i = block_end;
                continue
            }
            _ => {
                if !hide_elements {
                    element.write_tag(&mut out);
                }
                out.push_str(&element.html);
            }
        }
        i += 1;
    }
    out
}

pub fn render(elements: &[Element], data: &ViewData, hide_elements: bool) -> String {
    render_range(elements, 0, elements.len(), data, hide_elements)
}

/// The source markup of the body of the block opened at `index`, tags
/// reproduced literally, no data applied. Empty if `index` does not
/// open a block.
pub fn block_markup(elements: &[Element], index: usize) -> String {
    let mut out = String::new();
    let element = match elements.get(index) {
        Some(e) => e,
        None => return out
    };
    if let Some(block_end) = element.block_end {
        out.push_str(&element.html);
        for inner in &elements[index + 1..block_end] {
            inner.write_tag(&mut out);
            out.push_str(&inner.html);
        }
    }
    out
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_text;

    fn data(kvs: &[(&str, &str)]) -> ViewData {
        kvs.iter().copied().collect()
    }

    macro_rules! t {
        ($template:expr, $kvs:expr, $r:expr) => {
            let template = parse_text($template);
            assert_eq!(render(&template.elements, &data($kvs), true), $r);
        }
    }

    #[test]
    fn t_substitution() {
        t!("hi {{name}}!", &[("name", "Sam")], "hi Sam!");
        t!("hi {{name}}!", &[], "hi !");
        t!("hi {{Name}}!", &[("NAME", "Sam")], "hi Sam!");
        t!("{{a}}{{a}}", &[("a", "x")], "xx");
        t!("{{btn title:\"Save\"}}.", &[("btn", "<button/>")], "<button/>.");
        t!("", &[("a", "x")], "");
        t!("   ", &[], "");
    }

    #[test]
    fn t_block_suppression() {
        t!("a{{x}}b{{/x}}c", &[], "ac");
        t!("a{{x}}b{{/x}}c", &[("x", "True")], "abc");
        t!("a{{x}}b{{/x}}c", &[("x", "False")], "ac");
        t!("a{{x}}b{{/x}}c", &[("x", "true")], "ac");
        t!("a{{x}}b{{/x}}c", &[("x", "1")], "ac");
    }

    #[test]
    fn t_nested_blocks() {
        let s = "<{{outer}}o{{inner}}i{{v}}{{/inner}}O{{/outer}}>";
        t!(s, &[], "<>");
        t!(s, &[("inner", "True"), ("v", "!")], "<>");
        t!(s, &[("outer", "True")], "<oO>");
        t!(s, &[("outer", "True"), ("inner", "True"), ("v", "!")], "<oi!O>");
    }

    #[test]
    fn t_unclosed_block_is_variable() {
        t!("a{{x}}b", &[("x", "X")], "aXb");
        t!("a{{x}}b", &[], "ab");
    }

    #[test]
    fn t_passive() {
        let template = parse_text("a{{x}}b{{/x}}{{v k:\"1\"}}c{{w}}");
        assert_eq!(render(&template.elements, &data(&[("w", "W")]), false),
                   "a{{x}}b{{/x}}{{v k:\"1\"}}cW");
    }

    #[test]
    fn t_render_range() {
        let template = parse_text("a{{x}}b{{v}}{{/x}}c");
        let mut d = data(&[("v", "V")]);
        assert_eq!(render_range(&template.elements, 1, 3, &d, true), "");
        assert_eq!(render_range(&template.elements, 2, 3, &d, true), "V");
        assert_eq!(render_range(&template.elements, 2, 99, &d, true), "Vc");
        d.set_bool("x", true);
        assert_eq!(render_range(&template.elements, 1, 3, &d, true), "bV");
        assert_eq!(render_range(&template.elements, 5, 3, &d, true), "");
    }

    #[test]
    fn t_block_markup() {
        let template = parse_text("a{{x}}b{{v k:\"1\"}}B{{/x}}c");
        assert_eq!(block_markup(&template.elements, 1), "b{{v k:\"1\"}}B");
        assert_eq!(block_markup(&template.elements, 0), "");
        assert_eq!(block_markup(&template.elements, 42), "");
    }

    #[test]
    fn t_idempotent() {
        let template = parse_text("{{a}}-{{b}}x{{/b}}");
        let d = data(&[("a", "1"), ("b", "True")]);
        let r1 = render(&template.elements, &d, true);
        let r2 = render(&template.elements, &d, true);
        assert_eq!(r1, r2);
        assert_eq!(r1, "1-x");
    }
}
