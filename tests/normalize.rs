// tests/normalize.rs
use fragshop::{normalize, RawTicket};
use proptest::prelude::*;

fn ticket(title: &str, body: Option<&str>) -> RawTicket {
    RawTicket {
        id: 1,
        number: 42,
        url: "https://github.com/o/r/issues/42".into(),
        updated_at: "2024-05-01T12:00:00Z".into(),
        title: title.into(),
        body: body.map(String::from),
        labels: vec!["list:inventory".into(), "In Stock".into()],
        pull_request: None,
    }
}

const FULL_BODY: &str = "\
### Design House

Maison Example

### Fragrance Name

Night Garden

### Type

edp

### Size (mL)

50

### Desired Sell Price (USD)

$125.00

### Source Link (optional)

https://example.com/night-garden
";

#[test]
fn body_wins_over_title() {
    let p = normalize(&ticket("Other - Thing EDT 100ml", Some(FULL_BODY)));
    assert_eq!(p.house(), "Maison Example");
    assert_eq!(p.name(), "Night Garden");
    assert_eq!(p.kind(), "EDP");
    assert_eq!(p.volume_ml(), Some(50.0));
    assert_eq!(p.asking_price(), Some(125.0));
    assert_eq!(p.unit_price(), Some(2.5));
    assert_eq!(p.sample_unit_price(), Some(25.0));
    assert_eq!(p.source_link(), "https://example.com/night-garden");
    assert_eq!(p.labels(), ["list:inventory", "In Stock"]);
    assert_eq!(p.number(), 42);
    assert_eq!(p.url(), "https://github.com/o/r/issues/42");
}

#[test]
fn title_fills_missing_body_fields() {
    let p = normalize(&ticket("House - Fragrance Name EDP (50 mL)", None));
    assert_eq!(p.house(), "House");
    assert_eq!(p.name(), "Fragrance Name");
    assert_eq!(p.kind(), "EDP");
    assert_eq!(p.volume_ml(), Some(50.0));
    assert_eq!(p.asking_price(), None);
    assert_eq!(p.unit_price(), None);
    assert_eq!(p.sample_unit_price(), None);
}

#[test]
fn tagged_title_with_bracketed_details() {
    let p = normalize(&ticket("[Decant] Acme - Midnight Bloom (EDP, 30mL)", None));
    assert_eq!(p.house(), "Acme");
    assert_eq!(p.name(), "Midnight Bloom");
    assert_eq!(p.kind(), "EDP");
    assert_eq!(p.volume_ml(), Some(30.0));
}

#[test]
fn placeholder_sections_count_as_empty() {
    let body = "### Design House\n\n_No response_\n\n### Fragrance Name\n\n_No response_\n\n### Desired Sell Price (USD)\n\n80";
    let p = normalize(&ticket("Brand - Eau Fraiche EDT 100ml", Some(body)));
    assert_eq!(p.house(), "Brand");
    assert_eq!(p.name(), "Eau Fraiche");
    assert_eq!(p.asking_price(), Some(80.0));
    assert_eq!(p.unit_price(), Some(0.8));
}

#[test]
fn concentration_words_in_real_names_are_kept() {
    let cases = [
        ("Acme - Eau de Parfum", "Eau de Parfum"),
        ("Acme - Parfum de Nuit 50ml", "Parfum de Nuit"),
        ("Acme - Cologne Blanche", "Cologne Blanche"),
        ("4711 - Echt Kolnisch Wasser Eau de Cologne (100ml)", "Echt Kolnisch Wasser Eau de Cologne"),
    ];
    for (title, name) in cases {
        assert_eq!(normalize(&ticket(title, None)).name(), name, "{title}");
    }
    assert_eq!(normalize(&ticket("4711 - Echt Kolnisch Wasser Eau de Cologne (100ml)", None)).volume_ml(), Some(100.0));
}

#[test]
fn uppercase_unit_is_not_a_volume() {
    let p = normalize(&ticket("Acme - Rain 100ML", None));
    assert_eq!(p.volume_ml(), None);
}

#[test]
fn title_without_separator_keeps_house_unknown() {
    let p = normalize(&ticket("Mystery Bottle", None));
    assert_eq!(p.house(), "Unknown");
    assert_eq!(p.name(), "Mystery Bottle");
    assert_eq!(p.kind(), "");
}

#[test]
fn empty_ticket_still_has_house_and_name() {
    let p = normalize(&ticket("", None));
    assert_eq!(p.house(), "Unknown");
    assert_eq!(p.name(), "Unknown");
}

#[test]
fn zero_or_garbled_numbers_drop_derived_prices() {
    let body = "### Size (mL)\n\n0\n\n### Desired Sell Price (USD)\n\n120";
    let p = normalize(&ticket("A - B", Some(body)));
    assert_eq!(p.volume_ml(), None);
    assert_eq!(p.asking_price(), Some(120.0));
    assert_eq!(p.unit_price(), None);

    let body = "### Size (mL)\n\nabout fifty\n\n### Desired Sell Price (USD)\n\nask me";
    let p = normalize(&ticket("A - B", Some(body)));
    assert_eq!(p.volume_ml(), None);
    assert_eq!(p.asking_price(), None);

    let body = "### Size (mL)\n\n50\n\n### Desired Sell Price (USD)\n\n0";
    let p = normalize(&ticket("A - B", Some(body)));
    assert_eq!(p.asking_price(), Some(0.0));
    assert_eq!(p.unit_price(), None);
    assert_eq!(p.sample_unit_price(), None);
}

#[test]
fn price_only_comes_from_the_body() {
    let p = normalize(&ticket("A - B $300 50ml", None));
    assert_eq!(p.asking_price(), None);
}

#[test]
fn sections_parse_in_any_order() {
    let body = "### Desired Sell Price (USD)\n\n60\n\n### Size (mL)\n\n30\n\n### Fragrance Name\n\nRain\n\n### Design House\n\nCloud Co";
    let p = normalize(&ticket("", Some(body)));
    assert_eq!(p.house(), "Cloud Co");
    assert_eq!(p.name(), "Rain");
    assert_eq!(p.unit_price(), Some(2.0));
    assert_eq!(p.sample_unit_price(), Some(20.0));
}

#[test]
fn crlf_bodies_parse() {
    let body = FULL_BODY.replace('\n', "\r\n");
    let p = normalize(&ticket("x", Some(&body)));
    assert_eq!(p.house(), "Maison Example");
    assert_eq!(p.volume_ml(), Some(50.0));
}

#[test]
fn search_text_covers_labels() {
    let p = normalize(&ticket("House - Fragrance Name EDP (50 mL)", None));
    let hay = p.search_haystack();
    assert!(hay.contains("in stock"));
    assert!(hay.contains("fragrance name"));
    assert!(hay.contains("edp"));
    assert_eq!(p.display_title(), "House - Fragrance Name");
}

proptest! {
    #[test]
    fn normalize_is_total(title in ".{0,80}", body in proptest::option::of(".{0,400}")) {
        let p = normalize(&ticket(&title, body.as_deref()));
        prop_assert!(!p.house().trim().is_empty());
        prop_assert!(!p.name().trim().is_empty());
        prop_assert_eq!(p.unit_price().is_some(), p.sample_unit_price().is_some());
        if let Some(v) = p.volume_ml() {
            prop_assert!(v > 0.0 && v.is_finite());
        }
    }

    #[test]
    fn unit_prices_follow_price_and_size(price in 1u32..5000, cents in 0u32..100, ml in 1u32..500) {
        let body = format!(
            "### Size (mL)\n\n{ml}\n\n### Desired Sell Price (USD)\n\n${price}.{cents:02}"
        );
        let p = normalize(&ticket("A - B", Some(&body)));
        let expected = (price as f64 + cents as f64 / 100.0) / ml as f64;
        let unit = p.unit_price().unwrap();
        prop_assert!((unit - expected).abs() < 1e-9);
        prop_assert!((p.sample_unit_price().unwrap() - unit * 10.0).abs() < 1e-9);
    }
}
