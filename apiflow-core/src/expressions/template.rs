use std::sync::LazyLock;

use regex::Regex;

static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(.+)$").expect("valid regex"));

/// `{{<index>.<path>}}` reference to a field of an earlier step result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRef {
    pub index: usize,
    pub path: String,
}

/// A string split around its single template reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template<'a> {
    pub prefix: &'a str,
    pub reference: TemplateRef,
    pub suffix: &'a str,
}

/// Finds the first well-formed `{{index.path}}` reference in `input`.
///
/// Returns `None` when the string has no reference; malformed `{{...}}` openings are
/// treated as literal text and scanning continues after them.
pub fn parse_template(input: &str) -> Option<Template<'_>> {
    let mut search_from = 0;
    while let Some(rel_open) = input[search_from..].find("{{") {
        let open = search_from + rel_open;
        let inner_start = open + 2;
        let rel_close = input[inner_start..].find("}}")?;
        let close = inner_start + rel_close;

        if let Some(reference) = parse_reference(&input[inner_start..close]) {
            return Some(Template {
                prefix: &input[..open],
                reference,
                suffix: &input[close + 2..],
            });
        }
        search_from = open + 1;
    }
    None
}

fn parse_reference(inner: &str) -> Option<TemplateRef> {
    let caps = REFERENCE_RE.captures(inner)?;
    let index = caps.get(1)?.as_str().parse::<usize>().ok()?;
    let path = caps.get(2)?.as_str().to_string();
    Some(TemplateRef { index, path })
}
