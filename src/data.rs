// src/data.rs
//
// The in-memory record set.
//
// - Inventory: read-only for everyone except the syncer, which replaces the
//              whole set (never patches it) via a crate-private method.

use crate::product::Product;
use crate::sync::SyncStatus;

/// Authoritative product list plus the status of the sync that produced it.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    products: Vec<Product>,
    status: Option<SyncStatus>,
}

impl Inventory {
    pub fn new() -> Self { Self::default() }

    pub fn products(&self) -> &[Product] { &self.products }
    pub fn len(&self) -> usize { self.products.len() }
    pub fn is_empty(&self) -> bool { self.products.is_empty() }

    /// Outcome of the last refresh, `None` before the first one.
    pub fn status(&self) -> Option<&SyncStatus> { self.status.as_ref() }

    pub fn find_by_number(&self, number: u64) -> Option<&Product> {
        self.products.iter().find(|p| p.number() == number)
    }

    /// The only mutator: swap in a freshly normalized set.
    pub(crate) fn replace(&mut self, products: Vec<Product>, status: SyncStatus) {
        self.products = products;
        self.status = Some(status);
    }
}
