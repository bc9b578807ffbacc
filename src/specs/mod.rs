// src/specs/mod.rs
//! # Listing “specs” module
//!
//! This module knows how to **read an inventory listing**. A listing is a
//! GitHub issue whose body was (usually) produced by an issue form, and whose
//! title was typed by a human. Neither is guaranteed to be well formed.
//!
//! ## What lives here
//! - **Body sections** (`body`): the body is tokenized once into
//!   `(heading, content)` pairs keyed by `### Heading` lines, then the six
//!   listing fields are looked up by heading text. Order, extra sections and
//!   missing sections don't matter; the `_No response_` placeholder reads as
//!   empty.
//! - **Title hints** (`title`): when the body is silent, the title is scanned
//!   for a `<number> mL` volume, a concentration code (`EDP`, `EDT`, …) and a
//!   `House - Name` split.
//!
//! ## What does **not** live here
//! - Defaults, numeric coercion and derived prices – that is
//!   `product::normalize`, which combines both sources.
//! - Fetching, caching, filtering.
//!
//! ## Conventions & invariants
//! - Nothing here fails. Missing or garbled text yields empty strings or
//!   `None`, never an error, so one bad listing can't abort a sync.
//! - Hand-rolled scanning over small strings; no document-wide patterns.
//! - Heading text is matched case-sensitively; concentration codes and the
//!   `mL` unit are matched case-insensitively.
//!
//! ## Typical call chain
//! ```text
//! sync::Syncer → product::normalize(ticket)
//!                  ├─ specs::body::BodyFields::parse(body)
//!                  └─ specs::title::TitleHints::infer(title)
//! ```
pub mod body;
pub mod title;

pub use body::BodyFields;
pub use title::TitleHints;
