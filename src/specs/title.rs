// src/specs/title.rs
//
// Best-effort hints from a listing title such as
// `[Decant] Acme - Midnight Bloom (EDP, 30mL)`. Only used to fill fields the
// body left empty.

use crate::config::consts::KIND_CODES;
use crate::core::sanitize::{normalize_ws, strip_leading_tag, strip_parentheticals};

const SEPARATOR: &str = " - ";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TitleHints {
    pub house: Option<String>,
    pub name: Option<String>,
    /// Uppercased concentration code.
    pub kind: Option<String>,
    /// Number text exactly as written, e.g. `"30"` or `"7.5"`.
    pub volume: Option<String>,
}

impl TitleHints {
    pub fn infer(title: &str) -> Self {
        let t = strip_leading_tag(title);

        let volume = find_volume(t).map(|(_, _, num)| s!(num));
        let kind = find_kind(t).map(|(_, _, code)| code.to_ascii_uppercase());

        let (house, name) = match t.split_once(SEPARATOR) {
            Some((house, rest)) => {
                let house = house.trim();
                let name = clean_name(rest);
                (
                    (!house.is_empty()).then(|| s!(house)),
                    (!name.is_empty()).then_some(name),
                )
            }
            None => (None, None),
        };

        Self { house, name, kind, volume }
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// First `<digits>[.<digits>]<spaces>ml` match (unit `ml` or `mL`, word
/// boundary after it). Returns the byte span of the whole match and the
/// number text.
fn find_volume(s: &str) -> Option<(usize, usize, &str)> {
    let b = s.as_bytes();
    let mut i = 0;
    while i < b.len() {
        if !b[i].is_ascii_digit() || (i > 0 && b[i - 1].is_ascii_digit()) {
            i += 1;
            continue;
        }
        let start = i;
        let mut j = i;
        while j < b.len() && b[j].is_ascii_digit() { j += 1; }
        if j + 1 < b.len() && b[j] == b'.' && b[j + 1].is_ascii_digit() {
            j += 1;
            while j < b.len() && b[j].is_ascii_digit() { j += 1; }
        }
        let num_end = j;
        while j < b.len() && b[j].is_ascii_whitespace() { j += 1; }
        let unit_ok = j + 1 < b.len()
            && b[j] == b'm'
            && (b[j + 1] == b'l' || b[j + 1] == b'L')
            && (j + 2 == b.len() || !is_word_byte(b[j + 2]));
        if unit_ok {
            return Some((start, j + 2, &s[start..num_end]));
        }
        i = num_end.max(i + 1);
    }
    None
}

/// First whole-word concentration code, case-insensitive.
fn find_kind(s: &str) -> Option<(usize, usize, &str)> {
    words(s).find(|(_, _, w)| KIND_CODES.iter().any(|k| k.eq_ignore_ascii_case(w)))
}

/// Maximal runs of word bytes (`[A-Za-z0-9_]`), with byte spans.
fn words(s: &str) -> impl Iterator<Item = (usize, usize, &str)> {
    let b = s.as_bytes();
    let mut i = 0;
    std::iter::from_fn(move || {
        while i < b.len() && !is_word_byte(b[i]) { i += 1; }
        if i >= b.len() { return None; }
        let start = i;
        while i < b.len() && is_word_byte(b[i]) { i += 1; }
        Some((start, i, &s[start..i]))
    })
}

/// Words after which a concentration word is part of the name
/// (`Eau de Parfum`, `Eau de Cologne`).
const CONNECTIVES: &[&str] = &["de", "du", "di", "of"];

/// Name part of the title: parentheticals and volume tokens go, whitespace
/// collapses, and a trailing concentration code is dropped when it reads as
/// a suffix (`Fragrance Name EDP`) rather than part of the name.
fn clean_name(rest: &str) -> String {
    let mut name = strip_parentheticals(rest);
    while let Some((a, z, _)) = find_volume(&name) {
        name.replace_range(a..z, " ");
    }
    let name = normalize_ws(&name);
    let mut words: Vec<&str> = name.split_whitespace().collect();

    if words.len() > 1 {
        let bare = |w: &str| w.trim_matches(|c: char| !c.is_ascii_alphanumeric()).to_string();
        let last = bare(words[words.len() - 1]);
        let before = bare(words[words.len() - 2]);
        let is_code = KIND_CODES.iter().any(|k| k.eq_ignore_ascii_case(&last));
        let joined = CONNECTIVES.iter().any(|c| c.eq_ignore_ascii_case(&before));
        if is_code && !joined {
            words.pop();
        }
    }

    words
        .join(" ")
        .trim_matches(|c: char| c == ',' || c == '-' || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_forms() {
        assert_eq!(find_volume("Foo 30mL").map(|v| v.2), Some("30"));
        assert_eq!(find_volume("Foo 7.5 ml").map(|v| v.2), Some("7.5"));
        assert_eq!(find_volume("Foo 100ML bar"), None);
        assert_eq!(find_volume("Foo 30Ml"), None);
        assert_eq!(find_volume("Foo 30mls"), None);
        assert_eq!(find_volume("Foo 30 g"), None);
    }

    #[test]
    fn kind_is_a_whole_word() {
        assert_eq!(find_kind("x edp y").map(|k| k.2), Some("edp"));
        assert_eq!(find_kind("EDPX"), None);
        assert_eq!(find_kind("(Extrait, 2ml)").map(|k| k.2), Some("Extrait"));
    }

    #[test]
    fn name_is_cleaned() {
        assert_eq!(clean_name("Fragrance Name EDP (50 mL)"), "Fragrance Name");
        assert_eq!(clean_name("Oud Wood 50ml EDT"), "Oud Wood");
        assert_eq!(clean_name("Part - Two"), "Part - Two");
    }

    #[test]
    fn concentration_words_inside_names_survive() {
        assert_eq!(clean_name("Eau de Parfum"), "Eau de Parfum");
        assert_eq!(clean_name("Parfum de Nuit 50ml"), "Parfum de Nuit");
        assert_eq!(clean_name("Cologne Blanche"), "Cologne Blanche");
        assert_eq!(clean_name("Echt Kolnisch Wasser Eau de Cologne (100ml)"), "Echt Kolnisch Wasser Eau de Cologne");
        assert_eq!(clean_name("Extrait"), "Extrait");
        assert_eq!(clean_name("Tobacco Vanille EDP,"), "Tobacco Vanille");
    }

    #[test]
    fn no_separator_no_house() {
        let h = TitleHints::infer("Midnight Bloom EDP 30ml");
        assert_eq!(h.house, None);
        assert_eq!(h.name, None);
        assert_eq!(h.kind.as_deref(), Some("EDP"));
        assert_eq!(h.volume.as_deref(), Some("30"));
    }
}
