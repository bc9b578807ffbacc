// src/sync.rs
//
// Inventory refresh: conditional first page, sequential pagination, snapshot
// fallback, normalization. One call runs to completion; there is no
// background work and nothing to cancel.

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::config::consts::{MAX_PAGES, PAGE_SIZE};
use crate::config::ShopOptions;
use crate::data::Inventory;
use crate::error::SyncError;
use crate::product::{normalize, Product};
use crate::progress::Progress;
use crate::store::{KvStore, Snapshot, SnapshotStore};
use crate::ticket::RawTicket;

/// One page of the labeled, open-issue listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based.
    pub page: u32,
    pub per_page: usize,
    /// Revalidation token; only ever sent with page 1.
    pub if_none_match: Option<String>,
}

impl PageRequest {
    pub fn page(page: u32, per_page: usize) -> Self {
        Self { page, per_page, if_none_match: None }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PageResponse {
    NotModified,
    Page {
        tickets: Vec<RawTicket>,
        etag: Option<String>,
    },
}

/// Anything that can list inventory tickets page by page.
pub trait TicketSource {
    fn fetch_page(&mut self, req: &PageRequest) -> Result<PageResponse, SyncError>;
}

impl<T: TicketSource + ?Sized> TicketSource for Box<T> {
    fn fetch_page(&mut self, req: &PageRequest) -> Result<PageResponse, SyncError> {
        (**self).fetch_page(req)
    }
}

/// Where the records of a refresh came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Full fetch from the remote.
    Remote,
    /// Remote said "not modified"; snapshot reused.
    Revalidated,
    /// Remote failed; snapshot reused. `error` says why.
    Fallback,
    /// Remote failed and there was no snapshot. `error` says why.
    Unavailable,
    /// Fresh snapshot shown while the remote is still being asked.
    Preview,
    /// Snapshot loaded without touching the network.
    Offline,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncStatus {
    pub origin: Origin,
    pub count: usize,
    pub error: Option<SyncError>,
}

impl SyncStatus {
    pub fn new(origin: Origin, count: usize, error: Option<SyncError>) -> Self {
        Self { origin, count, error }
    }

    pub fn from_cache(&self) -> bool {
        !matches!(self.origin, Origin::Remote | Origin::Unavailable)
    }

    /// Error with nothing to show for it (as opposed to an advisory warning
    /// over cached data).
    pub fn is_blocking(&self) -> bool {
        self.origin == Origin::Unavailable
    }

    /// One-line status for the header.
    pub fn summary(&self) -> String {
        match self.origin {
            Origin::Remote => format!("Loaded {} items.", self.count),
            Origin::Revalidated => s!("Loaded (cached, unchanged)."),
            Origin::Fallback => s!("Loaded (cached)."),
            Origin::Unavailable => s!("Error loading inventory."),
            Origin::Preview => format!("Showing {} saved items; checking for updates…", self.count),
            Origin::Offline if self.count == 0 => s!("No saved inventory."),
            Origin::Offline => format!("Loaded {} saved items (offline).", self.count),
        }
    }

    /// Banner text when something went wrong.
    pub fn banner(&self) -> Option<String> {
        let err = self.error.as_ref()?;
        Some(if self.is_blocking() {
            format!("Couldn’t load inventory. {err}")
        } else {
            format!("Using last saved data. {err}")
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncOptions {
    pub page_size: usize,
    pub max_pages: u32,
    pub ttl: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            max_pages: MAX_PAGES,
            ttl: Duration::from_secs(crate::config::consts::CACHE_MINUTES * 60),
        }
    }
}

impl From<&ShopOptions> for SyncOptions {
    fn from(opts: &ShopOptions) -> Self {
        Self { ttl: opts.cache_ttl(), ..Self::default() }
    }
}

enum Fetched {
    Unchanged,
    Fresh { items: Vec<RawTicket>, etag: Option<String> },
}

/// Sole writer of the [`Inventory`] and the snapshot store.
///
/// `refresh` takes `&mut self` and `&mut Inventory`, so two refreshes can
/// never interleave; a second trigger waits for the first to return.
pub struct Syncer<S: TicketSource, K: KvStore> {
    source: S,
    store: SnapshotStore<K>,
    opts: SyncOptions,
}

impl<S: TicketSource, K: KvStore> Syncer<S, K> {
    pub fn new(source: S, store: SnapshotStore<K>, opts: SyncOptions) -> Self {
        Self { source, store, opts }
    }

    pub fn source(&self) -> &S { &self.source }
    pub fn store(&self) -> &SnapshotStore<K> { &self.store }
    pub fn options(&self) -> &SyncOptions { &self.opts }

    pub fn refresh(
        &mut self,
        inventory: &mut Inventory,
        progress: Option<&mut (dyn Progress + '_)>,
    ) -> SyncStatus {
        self.refresh_at(inventory, Utc::now().timestamp_millis(), progress)
    }

    /// [`Syncer::refresh`] with an explicit clock (epoch millis).
    pub fn refresh_at(
        &mut self,
        inventory: &mut Inventory,
        now_ms: i64,
        mut progress: Option<&mut (dyn Progress + '_)>,
    ) -> SyncStatus {
        if let Some(p) = progress.as_deref_mut() {
            p.log("Loading inventory…");
        }

        let cached = self.store.load();

        if let Some(snap) = cached.as_ref()
            && inventory.is_empty()
            && snap.is_fresh(now_ms, self.opts.ttl)
        {
            let products = normalize_all(&snap.items);
            let count = products.len();
            debug!(count, "showing fresh snapshot while revalidating");
            inventory.replace(products, SyncStatus::new(Origin::Preview, count, None));
            if let Some(p) = progress.as_deref_mut() {
                p.preview(count);
            }
        }

        let (products, status) = match self.fetch(cached.is_some(), progress.as_deref_mut()) {
            Ok(Fetched::Unchanged) => {
                let products = cached.map(|s| normalize_all(&s.items)).unwrap_or_default();
                info!(count = products.len(), "inventory unchanged; reusing snapshot");
                let status = SyncStatus::new(Origin::Revalidated, products.len(), None);
                (products, status)
            }
            Ok(Fetched::Fresh { items, etag }) => {
                let snap = Snapshot::new(now_ms, items);
                self.store.commit(&snap, etag.as_deref());
                let products = normalize_all(&snap.items);
                info!(count = products.len(), "inventory refreshed");
                let status = SyncStatus::new(Origin::Remote, products.len(), None);
                (products, status)
            }
            Err(err) => match cached {
                Some(snap) => {
                    warn!(error = %err, "refresh failed; falling back to snapshot");
                    let products = normalize_all(&snap.items);
                    let status = SyncStatus::new(Origin::Fallback, products.len(), Some(err));
                    (products, status)
                }
                None => {
                    error!(error = %err, "refresh failed and no snapshot exists");
                    (Vec::new(), SyncStatus::new(Origin::Unavailable, 0, Some(err)))
                }
            },
        };

        inventory.replace(products, status.clone());
        if let Some(p) = progress.as_deref_mut() {
            p.log(&status.summary());
            p.finish();
        }
        status
    }

    /// Publish the stored snapshot without any network I/O.
    pub fn load_cached(&self, inventory: &mut Inventory) -> SyncStatus {
        let products = self.store.load()
            .map(|s| normalize_all(&s.items))
            .unwrap_or_default();
        let status = SyncStatus::new(Origin::Offline, products.len(), None);
        inventory.replace(products, status.clone());
        status
    }

    fn fetch(
        &mut self,
        have_snapshot: bool,
        mut progress: Option<&mut (dyn Progress + '_)>,
    ) -> Result<Fetched, SyncError> {
        let per_page = self.opts.page_size.max(1);
        let max_pages = self.opts.max_pages.max(1);

        let first_req = PageRequest { if_none_match: self.store.etag(), ..PageRequest::page(1, per_page) };
        let mut first = self.source.fetch_page(&first_req)?;

        if matches!(first, PageResponse::NotModified) {
            if have_snapshot {
                return Ok(Fetched::Unchanged);
            }
            // The token outlived its snapshot. Forget it and ask again plainly.
            warn!("remote reported not-modified but no snapshot is stored; token and store out of sync, refetching");
            self.store.set_etag(None);
            first = self.source.fetch_page(&PageRequest::page(1, per_page))?;
        }

        let PageResponse::Page { tickets, etag } = first else {
            return Err(SyncError::UnexpectedNotModified);
        };

        let mut page = 1;
        let mut last_len = tickets.len();
        if let Some(p) = progress.as_deref_mut() {
            p.page_done(page, last_len);
        }
        let mut items = issues_only(tickets);

        while last_len >= per_page && page < max_pages {
            page += 1;
            match self.source.fetch_page(&PageRequest::page(page, per_page))? {
                PageResponse::Page { tickets, .. } => {
                    last_len = tickets.len();
                    if let Some(p) = progress.as_deref_mut() {
                        p.page_done(page, last_len);
                    }
                    items.extend(issues_only(tickets));
                }
                PageResponse::NotModified => return Err(SyncError::UnexpectedNotModified),
            }
        }
        if last_len >= per_page {
            warn!(pages = page, "page limit reached; listing may be truncated");
        }
        debug!(pages = page, items = items.len(), "fetched inventory pages");

        Ok(Fetched::Fresh { items, etag })
    }
}

fn issues_only(tickets: Vec<RawTicket>) -> Vec<RawTicket> {
    tickets.into_iter().filter(|t| !t.is_pull_request()).collect()
}

/// Normalize a raw listing, skipping pull requests.
pub fn normalize_all(items: &[RawTicket]) -> Vec<Product> {
    items.iter().filter(|t| !t.is_pull_request()).map(normalize).collect()
}
