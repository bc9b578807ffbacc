// src/config/consts.rs

// Net config
pub const API_BASE: &str = "https://api.github.com";
pub const WEB_BASE: &str = "https://github.com";
pub const ACCEPT: &str = "application/vnd.github+json";
pub const USER_AGENT: &str = concat!("fragshop/", env!("CARGO_PKG_VERSION"));
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Pagination
pub const PAGE_SIZE: usize = 100;
pub const MAX_PAGES: u32 = 10; // runaway guard

// Local cache
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";
pub const CACHE_KEY: &str = "shop_cache_v1";
pub const ETAG_KEY: &str = "shop_etag_v1";
pub const CACHE_MINUTES: u64 = 10;

// Listing
pub const UNKNOWN: &str = "Unknown";
pub const NO_RESPONSE: &str = "_No response_";
pub const SAMPLE_ML: f64 = 10.0;
pub const KIND_CODES: &[&str] = &["EDP", "EDT", "PARFUM", "EXTRAIT", "EDC", "COLOGNE"];

// Listing body headings (issue form)
pub const H_HOUSE: &str = "Design House";
pub const H_NAME: &str = "Fragrance Name";
pub const H_KIND: &str = "Type";
pub const H_VOLUME: &str = "Size (mL)";
pub const H_PRICE: &str = "Desired Sell Price (USD)";
pub const H_SOURCE: &str = "Source Link (optional)";

// Reservation
pub const RESERVE_TAG: &str = "[RESERVE]";

// Display
pub const HOUSE_PREVIEW_COUNT: usize = 4;
pub const IMG_DIR: &str = "imgs";
pub const IMG_EXTS: &[&str] = &["png", "jpg", "jpeg", "webp"];
