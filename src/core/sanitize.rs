// src/core/sanitize.rs

/// Collapse every whitespace run to one space and trim the ends.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Drop one leading `[ ... ]` tag (e.g. `[Decant]`, `[FS]`) and the
/// whitespace after it. Anything else is returned trimmed.
pub fn strip_leading_tag(s: &str) -> &str {
    let t = s.trim_start();
    if let Some(rest) = t.strip_prefix('[') {
        if let Some(close) = rest.find(']') {
            // `[]` is not a tag
            if close > 0 {
                return rest[close + 1..].trim();
            }
        }
    }
    t.trim()
}

/// Remove every `( ... )` group, non-greedy, no nesting. An unclosed `(`
/// is kept as text.
pub fn strip_parentheticals(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(open) = rest.find('(') {
        match rest[open..].find(')') {
            Some(close) => {
                out.push_str(&rest[..open]);
                out.push(' ');
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    normalize_ws(&out)
}

/// Keep digits and `.` only, then parse. Empty, unparsable (`1.2.3`) or
/// non-finite input gives `None`.
pub fn coerce_number(s: &str) -> Option<f64> {
    let kept: String = s.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    if kept.is_empty() { return None; }
    kept.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// URL/file-safe slug: lowercase, `&` → `and`, quotes dropped, any other
/// run of non-alphanumerics → `-`, no leading/trailing dashes.
pub fn slugify(s: &str) -> String {
    let lowered = s.trim().to_lowercase().replace('&', "and");
    let mut out = String::with_capacity(lowered.len());
    let mut pending_dash = false;
    for ch in lowered.chars() {
        if ch == '\'' || ch == '"' { continue; }
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !out.is_empty() { out.push('-'); }
            pending_dash = false;
            out.push(ch);
        } else {
            pending_dash = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_tag_only_once() {
        assert_eq!(strip_leading_tag("[Decant] Acme - X"), "Acme - X");
        assert_eq!(strip_leading_tag("[A][B] Acme"), "[B] Acme");
        assert_eq!(strip_leading_tag("Acme [x]"), "Acme [x]");
        assert_eq!(strip_leading_tag("[] Acme"), "[] Acme");
    }

    #[test]
    fn parentheticals_removed_everywhere() {
        assert_eq!(strip_parentheticals("Midnight Bloom (EDP, 30mL)"), "Midnight Bloom");
        assert_eq!(strip_parentheticals("A (x) B (y)"), "A B");
        assert_eq!(strip_parentheticals("A (open"), "A (open");
    }

    #[test]
    fn numbers_are_coerced_leniently() {
        assert_eq!(coerce_number("$1,250.50"), Some(1250.5));
        assert_eq!(coerce_number("50 mL"), Some(50.0));
        assert_eq!(coerce_number("n/a"), None);
        assert_eq!(coerce_number("1.2.3"), None);
        assert_eq!(coerce_number("."), None);
        assert_eq!(coerce_number(""), None);
    }

    #[test]
    fn slugs() {
        assert_eq!(slugify("Maison Francis Kurkdjian"), "maison-francis-kurkdjian");
        assert_eq!(slugify("D.S. & Durga"), "d-s-and-durga");
        assert_eq!(slugify("  L'Artisan \"Parfumeur\" "), "lartisan-parfumeur");
        assert_eq!(slugify("--"), "");
    }
}
