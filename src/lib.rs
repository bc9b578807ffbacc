// src/lib.rs

#[macro_use]
pub mod macros;

pub mod config;
pub mod core;
pub mod error;
pub mod log;
pub mod specs;

pub mod data;
pub mod file;
pub mod image;
pub mod present;
pub mod product;
pub mod progress;
pub mod query;
pub mod reserve;
pub mod store;
pub mod sync;
pub mod ticket;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::ShopOptions;
pub use data::Inventory;
pub use error::{ReserveError, SyncError};
pub use product::{normalize, Product};
pub use query::{query, QueryParams, QueryResult, SortMode};
pub use store::{FileKv, KvStore, MemoryKv, Snapshot, SnapshotStore};
pub use sync::{Origin, PageRequest, PageResponse, SyncOptions, SyncStatus, Syncer, TicketSource};
pub use ticket::{Label, RawTicket};
