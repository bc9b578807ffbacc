// src/product.rs
use crate::config::consts::{SAMPLE_ML, UNKNOWN};
use crate::core::sanitize::coerce_number;
use crate::specs::{BodyFields, TitleHints};
use crate::ticket::RawTicket;

/// One sellable item, derived from a listing ticket.
///
/// Built only by [`normalize`]; there are no setters. A re-sync produces a
/// new set of products rather than touching existing ones.
#[derive(Clone, Debug, PartialEq)]
pub struct Product {
    id: u64,
    number: u64,
    url: String,
    updated_at: String,

    house: String,
    name: String,
    kind: String,
    volume_ml: Option<f64>,

    asking_price: Option<f64>,
    unit_price: Option<f64>,
    sample_unit_price: Option<f64>,

    source_link: String,
    labels: Vec<String>,
}

/// Turn one ticket into a product. Never fails: every missing or garbled
/// field degrades to a default.
///
/// Body sections win; title hints only fill what the body left empty.
/// `house` falls back to `"Unknown"` and `name` to the raw title, so both
/// are always non-empty.
pub fn normalize(ticket: &RawTicket) -> Product {
    let body = BodyFields::parse(ticket.body());
    let hints = TitleHints::infer(&ticket.title);

    let house = first_non_empty([Some(body.house.as_str()), hints.house.as_deref()])
        .unwrap_or(UNKNOWN);
    let name = first_non_empty([Some(body.name.as_str()), hints.name.as_deref()])
        .or_else(|| first_non_empty([Some(ticket.title.trim())]))
        .unwrap_or(UNKNOWN);
    let kind = first_non_empty([Some(body.kind.as_str()), hints.kind.as_deref()])
        .unwrap_or("")
        .to_uppercase();

    let volume_text = first_non_empty([Some(body.volume.as_str()), hints.volume.as_deref()]);
    let volume_ml = volume_text.and_then(coerce_number).filter(|v| *v > 0.0);
    let asking_price = coerce_number(&body.price);

    let unit_price = match (asking_price, volume_ml) {
        (Some(price), Some(ml)) => Some(price / ml).filter(|u| u.is_finite() && *u > 0.0),
        _ => None,
    };
    let sample_unit_price = unit_price.map(|u| u * SAMPLE_ML).filter(|s| s.is_finite());
    // keep the pair consistent if the multiply ever overflows
    let unit_price = unit_price.filter(|_| sample_unit_price.is_some());

    Product {
        id: ticket.id,
        number: ticket.number,
        url: ticket.url.clone(),
        updated_at: ticket.updated_at.clone(),
        house: s!(house),
        name: s!(name),
        kind,
        volume_ml,
        asking_price,
        unit_price,
        sample_unit_price,
        source_link: body.source_link,
        labels: ticket.label_names(),
    }
}

fn first_non_empty<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
}

impl From<&RawTicket> for Product {
    fn from(ticket: &RawTicket) -> Self {
        normalize(ticket)
    }
}

impl Product {
    pub fn id(&self) -> u64 { self.id }
    pub fn number(&self) -> u64 { self.number }
    pub fn url(&self) -> &str { &self.url }
    pub fn updated_at(&self) -> &str { &self.updated_at }

    pub fn house(&self) -> &str { &self.house }
    pub fn name(&self) -> &str { &self.name }
    pub fn kind(&self) -> &str { &self.kind }
    pub fn volume_ml(&self) -> Option<f64> { self.volume_ml }

    pub fn asking_price(&self) -> Option<f64> { self.asking_price }
    /// Price per mL.
    pub fn unit_price(&self) -> Option<f64> { self.unit_price }
    /// Reference price for a 10 mL sample at the unit price.
    pub fn sample_unit_price(&self) -> Option<f64> { self.sample_unit_price }

    pub fn source_link(&self) -> &str { &self.source_link }
    pub fn labels(&self) -> &[String] { &self.labels }

    /// `House - Name`, whitespace collapsed.
    pub fn display_title(&self) -> String {
        crate::core::sanitize::normalize_ws(&format!("{} - {}", self.house, self.name))
    }

    /// Lowercased text the search box matches against.
    pub fn search_haystack(&self) -> String {
        let volume = self.volume_ml.map(|v| v.to_string()).unwrap_or_default();
        [
            self.house.as_str(),
            self.name.as_str(),
            self.kind.as_str(),
            volume.as_str(),
            self.labels.join(" ").as_str(),
        ]
        .join(" ")
        .to_lowercase()
    }
}
