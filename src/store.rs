// src/store.rs
//
// Local best-effort persistence. Two values live here: the last complete
// ticket snapshot and the revalidation token (ETag) that goes with it.
// Every read failure is a cache miss and every write failure is logged and
// swallowed; nothing in this module can fail a sync.

use std::{collections::HashMap, fs, io, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::consts::{CACHE_KEY, ETAG_KEY, STORE_DIR};
use crate::file::{key_to_filename, write_atomic};
use crate::ticket::RawTicket;

/// String key-value persistence.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&mut self, key: &str) -> io::Result<()>;
}

/// One file per key under a directory (default `.store/`).
#[derive(Clone, Debug)]
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &std::path::Path { &self.dir }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key_to_filename(key))
    }
}

impl Default for FileKv {
    fn default() -> Self { Self::new(STORE_DIR) }
}

impl KvStore for FileKv {
    fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path(key)) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                debug!(key, error = %e, "store read failed");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        write_atomic(&self.path(key), value.as_bytes())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// In-process store; nothing survives the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryKv {
    map: HashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self { Self::default() }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.map.insert(s!(key), s!(value));
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        self.map.remove(key);
        Ok(())
    }
}

/// Last complete ticket list and when it was captured (epoch millis).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub captured_at: i64,
    #[serde(deserialize_with = "crate::ticket::lenient_tickets")]
    pub items: Vec<RawTicket>,
}

impl Snapshot {
    pub fn new(captured_at: i64, items: Vec<RawTicket>) -> Self {
        Self { captured_at, items }
    }

    /// Younger than `ttl` as of `now_ms`. Timestamps from the future count
    /// as fresh.
    pub fn is_fresh(&self, now_ms: i64, ttl: Duration) -> bool {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        now_ms.saturating_sub(self.captured_at) < ttl_ms
    }
}

/// Snapshot + token persistence on top of any [`KvStore`].
#[derive(Clone, Debug, Default)]
pub struct SnapshotStore<K: KvStore> {
    kv: K,
}

impl<K: KvStore> SnapshotStore<K> {
    pub fn new(kv: K) -> Self { Self { kv } }

    pub fn kv(&self) -> &K { &self.kv }

    /// Stored snapshot, or `None` when missing or unreadable.
    pub fn load(&self) -> Option<Snapshot> {
        let raw = self.kv.get(CACHE_KEY)?;
        match serde_json::from_str::<Snapshot>(&raw) {
            Ok(snap) if snap.captured_at > 0 => Some(snap),
            Ok(_) => {
                warn!("ignoring snapshot without capture time");
                None
            }
            Err(e) => {
                warn!(error = %e, "ignoring corrupt snapshot");
                None
            }
        }
    }

    /// Replace the stored snapshot. Returns whether the write stuck.
    pub fn save(&mut self, snap: &Snapshot) -> bool {
        let text = match serde_json::to_string(snap) {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "could not serialize snapshot");
                return false;
            }
        };
        match self.kv.set(CACHE_KEY, &text) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "could not persist snapshot");
                false
            }
        }
    }

    pub fn etag(&self) -> Option<String> {
        self.kv.get(ETAG_KEY)
            .map(|t| s!(t.trim()))
            .filter(|t| !t.is_empty())
    }

    /// Store `tag`, or forget the current one when `None`.
    pub fn set_etag(&mut self, tag: Option<&str>) {
        let result = match tag.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => self.kv.set(ETAG_KEY, t),
            None => self.kv.remove(ETAG_KEY),
        };
        if let Err(e) = result {
            warn!(error = %e, "could not persist revalidation token");
        }
    }

    /// Persist a complete fetch: snapshot first, then its token. If the
    /// snapshot did not stick the token is dropped too, so a later
    /// "not modified" can't pair it with older data.
    pub fn commit(&mut self, snap: &Snapshot, etag: Option<&str>) -> bool {
        if self.save(snap) {
            self.set_etag(etag);
            true
        } else {
            self.set_etag(None);
            false
        }
    }
}
