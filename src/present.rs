// src/present.rs
//
// Plain-text rendering of query results for terminal frontends.

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::product::Product;
use crate::query::{Group, QueryResult, Rollup};

const DASH: &str = "—";

/// `$12.00`, or `—` when missing.
pub fn money(n: Option<f64>) -> String {
    match n.filter(|v| v.is_finite()) {
        Some(v) => format!("${v:.2}"),
        None => s!(DASH),
    }
}

/// Per-mL prices need more precision.
pub fn money4(n: Option<f64>) -> String {
    match n.filter(|v| v.is_finite()) {
        Some(v) => format!("${v:.4}"),
        None => s!(DASH),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 { format!("{n} {word}") } else { format!("{n} {word}s") }
}

/// `120 mL • Value $310.00`, dropping zero parts; `—` when both are zero.
pub fn rollup_meta(r: &Rollup) -> String {
    let mut parts = Vec::new();
    if r.total_volume_ml > 0.0 { parts.push(format!("{:.0} mL", r.total_volume_ml)); }
    if r.total_value > 0.0 { parts.push(format!("Value {}", money(Some(r.total_value)))); }
    if parts.is_empty() { s!(DASH) } else { parts.join(" • ") }
}

/// One line per house in the roll-up, marking the selected one.
pub fn house_rows(result: &QueryResult<'_>, selected: &str) -> Vec<String> {
    if result.rollup.is_empty() {
        return vec![s!("No houses.")];
    }
    result.rollup
        .iter()
        .map(|(house, r)| {
            let marker = if house == selected { '*' } else { ' ' };
            format!("{marker} {house}  ({})  {}", r.count, rollup_meta(r))
        })
        .collect()
}

/// Subtitle under the product name: `House • EDP • 50 mL`.
pub fn card_subtitle(p: &Product) -> String {
    let mut parts: Vec<String> = vec![s!(p.house())];
    if !p.kind().is_empty() { parts.push(s!(p.kind())); }
    if let Some(ml) = p.volume_ml() { parts.push(format!("{ml} mL")); }
    parts.join(" • ")
}

pub fn card(p: &Product, image: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{}  {}", p.number(), p.name());
    let _ = writeln!(out, "    {}", card_subtitle(p));
    let _ = writeln!(
        out,
        "    Price {}   $/mL {}   10mL {}",
        money(p.asking_price()),
        money4(p.unit_price()),
        money(p.sample_unit_price()),
    );
    if !p.source_link().is_empty() {
        let _ = writeln!(out, "    Source  {}", p.source_link());
    }
    if let Some(img) = image {
        let _ = writeln!(out, "    Image   {img}");
    }
    let _ = write!(out, "    Listing {}", p.url());
    out
}

/// Section header for one house group.
pub fn group_header(g: &Group<'_>) -> String {
    let meta = rollup_meta(&g.summary);
    let mut line = format!("== {} == {}", g.house, plural(g.items.len(), "item"));
    if meta != DASH {
        line.push_str(" • ");
        line.push_str(&meta);
    }
    line
}

/// The grouped listing. Each house shows `preview` cards unless it is in
/// `expanded`, followed by a `Show N more` hint for what was cut.
pub fn listing(
    result: &QueryResult<'_>,
    preview: usize,
    expanded: &HashSet<String>,
    image_for: impl Fn(&Product) -> Option<String>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", plural(result.visible.len(), "item"));
    if result.visible.is_empty() {
        out.push_str("No matches.\n");
        return out;
    }

    for g in result.groups() {
        let open = expanded.contains(g.house);
        let shown = if open { g.items.len() } else { preview.max(1).min(g.items.len()) };
        let hidden = g.items.len() - shown;

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", group_header(&g));
        for p in g.items.iter().take(shown) {
            let img = image_for(*p);
            let _ = writeln!(out, "{}", card(p, img.as_deref()));
        }
        if hidden > 0 {
            let _ = writeln!(out, "    … Show {hidden} more");
        }
    }
    out
}
