//! Placeholder substitution for section text, info and column templates.
//!
//! `{{ page.title }}` inserts an HTML-escaped value, `{< page.title >}`
//! inserts it raw. The root alias is `page` for pages, `file` for files and
//! `model` for either; anything that does not resolve renders empty.

use crate::domain::entities::ItemRecord;
use crate::domain::types::ModelKind;

/// Render `template` against `item`.
pub fn render_safe(template: &str, item: &ItemRecord) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some((start, open, close, escape)) = next_placeholder(rest) {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + open.len()..];

        let Some(end) = after_open.find(close) else {
            output.push_str(&rest[start..]);
            return output;
        };

        let expression = after_open[..end].trim();
        let value = resolve(expression, item).unwrap_or_default();
        if escape {
            output.push_str(&html_escape::encode_quoted_attribute(&value));
        } else {
            output.push_str(&value);
        }

        rest = &after_open[end + close.len()..];
    }

    output.push_str(rest);
    output
}

fn next_placeholder(haystack: &str) -> Option<(usize, &'static str, &'static str, bool)> {
    let escaped = haystack.find("{{").map(|at| (at, "{{", "}}", true));
    let raw = haystack.find("{<").map(|at| (at, "{<", ">}", false));

    match (escaped, raw) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

fn resolve(expression: &str, item: &ItemRecord) -> Option<String> {
    let mut segments = expression.split('.').map(str::trim);
    let alias = segments.next()?;
    if !alias_matches(alias, item.kind) {
        return None;
    }

    let path: Vec<&str> = segments.collect();
    match path.as_slice() {
        [] => Some(item.id.clone()),
        ["content", key] => item.content.get(key).map(str::to_string),
        [field] => item.field(field),
        _ => None,
    }
}

fn alias_matches(alias: &str, kind: ModelKind) -> bool {
    match alias {
        "model" => true,
        "page" => kind == ModelKind::Page,
        "file" => kind == ModelKind::File,
        _ => false,
    }
}
