// src/query.rs
//
// Filter, sort and group the product list for display.
//
// The house roll-up is always built from the search-filtered set *before*
// the house filter applies, so the house list keeps showing every house that
// matches the search while one of them is selected.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::product::Product;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Most recently updated first (string order on the timestamp).
    UpdatedDesc,
    /// Cheapest first; unpriced last.
    PriceAsc,
    /// Dearest first; unpriced last.
    PriceDesc,
    HouseAsc,
    NameAsc,
    /// Keep input order.
    #[default]
    Unsorted,
}

impl SortMode {
    pub const ALL: [SortMode; 6] = [
        SortMode::UpdatedDesc,
        SortMode::PriceAsc,
        SortMode::PriceDesc,
        SortMode::HouseAsc,
        SortMode::NameAsc,
        SortMode::Unsorted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::UpdatedDesc => "updated_desc",
            SortMode::PriceAsc => "price_asc",
            SortMode::PriceDesc => "price_desc",
            SortMode::HouseAsc => "house_asc",
            SortMode::NameAsc => "name_asc",
            SortMode::Unsorted => "none",
        }
    }

    /// Unknown names mean "no reordering".
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Total order for this mode. Ties compare equal; the sort is stable.
    pub fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortMode::UpdatedDesc => b.updated_at().cmp(a.updated_at()),
            SortMode::PriceAsc => {
                let key = |p: &Product| p.asking_price().unwrap_or(f64::INFINITY);
                key(a).total_cmp(&key(b))
            }
            SortMode::PriceDesc => {
                let key = |p: &Product| p.asking_price().unwrap_or(f64::NEG_INFINITY);
                key(b).total_cmp(&key(a))
            }
            SortMode::HouseAsc => a.house().cmp(b.house()),
            SortMode::NameAsc => a.name().cmp(b.name()),
            SortMode::Unsorted => Ordering::Equal,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SortMode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown sort mode: {s}"))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// Case-insensitive substring; blank means no search.
    pub search: String,
    /// Exact house; blank means all houses.
    pub house: String,
    pub sort: SortMode,
}

/// Per-house aggregate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rollup {
    pub count: usize,
    pub total_volume_ml: f64,
    pub total_value: f64,
}

impl Rollup {
    fn add(&mut self, p: &Product) {
        self.count += 1;
        self.total_volume_ml += p.volume_ml().unwrap_or(0.0);
        self.total_value += p.asking_price().unwrap_or(0.0);
    }
}

#[derive(Clone, Debug)]
pub struct QueryResult<'a> {
    pub visible: Vec<&'a Product>,
    /// Keyed by house, ascending.
    pub rollup: BTreeMap<String, Rollup>,
}

impl QueryResult<'_> {
    /// Visible products grouped by house, houses ascending, sort order kept
    /// inside each group.
    pub fn groups(&self) -> Vec<Group<'_>> {
        group_by_house(self.visible.iter().copied())
    }
}

pub fn matches_search(p: &Product, needle_lower: &str) -> bool {
    needle_lower.is_empty() || p.search_haystack().contains(needle_lower)
}

pub fn query<'a>(records: &'a [Product], params: &QueryParams) -> QueryResult<'a> {
    let needle = params.search.trim().to_lowercase();
    let house = params.house.trim();

    let searched: Vec<&Product> = records.iter().filter(|p| matches_search(p, &needle)).collect();
    let rollup = rollup(searched.iter().copied());

    let mut visible: Vec<&Product> = searched
        .into_iter()
        .filter(|p| house.is_empty() || p.house() == house)
        .collect();
    visible.sort_by(|a, b| params.sort.compare(a, b));

    QueryResult { visible, rollup }
}

pub fn rollup<'a>(items: impl IntoIterator<Item = &'a Product>) -> BTreeMap<String, Rollup> {
    let mut out: BTreeMap<String, Rollup> = BTreeMap::new();
    for p in items {
        out.entry(p.house().to_string()).or_default().add(p);
    }
    out
}

#[derive(Clone, Debug)]
pub struct Group<'a> {
    pub house: &'a str,
    pub items: Vec<&'a Product>,
    pub summary: Rollup,
}

/// Partition by exact house; keys ascending, input order kept within a key.
pub fn group_by_house<'a>(items: impl IntoIterator<Item = &'a Product>) -> Vec<Group<'a>> {
    let mut map: BTreeMap<&'a str, Vec<&'a Product>> = BTreeMap::new();
    for p in items {
        map.entry(p.house()).or_default().push(p);
    }
    map.into_iter()
        .map(|(house, items)| {
            let mut summary = Rollup::default();
            for p in &items { summary.add(p); }
            Group { house, items, summary }
        })
        .collect()
}
