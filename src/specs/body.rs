// src/specs/body.rs
//
// Issue-form bodies look like:
//
//   ### Design House
//
//   Acme
//
//   ### Size (mL)
//
//   _No response_
//
// The body is cut into (heading, content) sections in one pass; fields are
// then plain key lookups.

use crate::config::consts::{H_HOUSE, H_KIND, H_NAME, H_PRICE, H_SOURCE, H_VOLUME, NO_RESPONSE};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section<'a> {
    pub heading: &'a str,
    pub content: String,
}

/// All `###` sections of a body, in document order. Text before the first
/// heading belongs to no section and is dropped.
pub fn sections(body: &str) -> Vec<Section<'_>> {
    let mut out: Vec<Section<'_>> = Vec::new();
    let mut current: Option<(&str, Vec<&str>)> = None;

    for line in body.split('\n') {
        if let Some(heading) = heading_text(line) {
            if let Some((h, lines)) = current.take() {
                out.push(Section { heading: h, content: clean_content(&lines) });
            }
            current = Some((heading, Vec::new()));
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(line);
        }
    }
    if let Some((h, lines)) = current {
        out.push(Section { heading: h, content: clean_content(&lines) });
    }
    out
}

/// `### Heading text` → `Heading text`. Needs at least one space or tab
/// after the hashes; `####` is not a match.
fn heading_text(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("###")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let text = rest.trim();
    if text.is_empty() { None } else { Some(text) }
}

fn clean_content(lines: &[&str]) -> String {
    let joined = lines.join("\n").replace('\r', "");
    let trimmed = joined.trim();
    if trimmed.eq_ignore_ascii_case(NO_RESPONSE) { s!() } else { s!(trimmed) }
}

/// The six listing fields as found in the body. A missing heading and an
/// empty section both read as `""`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BodyFields {
    pub house: String,
    pub name: String,
    pub kind: String,
    pub volume: String,
    pub price: String,
    pub source_link: String,
}

impl BodyFields {
    pub fn parse(body: &str) -> Self {
        let secs = sections(body);
        let field = |heading: &str| -> String {
            secs.iter()
                .find(|s| s.heading == heading)
                .map(|s| s.content.clone())
                .unwrap_or_default()
        };
        Self {
            house: field(H_HOUSE),
            name: field(H_NAME),
            kind: field(H_KIND),
            volume: field(H_VOLUME),
            price: field(H_PRICE),
            source_link: field(H_SOURCE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_runs_to_next_heading() {
        let body = "intro\n### A\n\nline 1\nline 2\n\n### B\nb\n";
        let secs = sections(body);
        assert_eq!(secs.len(), 2);
        assert_eq!(secs[0], Section { heading: "A", content: s!("line 1\nline 2") });
        assert_eq!(secs[1].content, "b");
    }

    #[test]
    fn heading_needs_space_and_exact_level() {
        assert_eq!(heading_text("### Type  "), Some("Type"));
        assert_eq!(heading_text("###\tType"), Some("Type"));
        assert_eq!(heading_text("###Type"), None);
        assert_eq!(heading_text("#### Type"), None);
        assert_eq!(heading_text("### "), None);
    }

    #[test]
    fn crlf_and_placeholder() {
        let body = "### Type\r\n\r\n_no response_\r\n### Size (mL)\r\n\r\n50\r\n";
        let f = BodyFields::parse(body);
        assert_eq!(f.kind, "");
        assert_eq!(f.volume, "50");
    }

    #[test]
    fn first_duplicate_wins() {
        let f = BodyFields::parse("### Type\nEDP\n### Type\nEDT");
        assert_eq!(f.kind, "EDP");
    }

    #[test]
    fn headings_are_case_sensitive() {
        let f = BodyFields::parse("### design house\nAcme");
        assert_eq!(f.house, "");
    }
}
