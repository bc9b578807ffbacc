// src/config/options.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::consts::*;
use crate::error::ConfigError;

/// Everything a storefront deployment can tune. Every field has a default,
/// so a config file only needs the keys it wants to change.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShopOptions {
    // Inventory "database" repo (read only)
    pub inventory_owner: String,
    pub inventory_repo: String,

    // Both labels are required for an item to show in the shop
    pub inventory_list_label: String,
    pub in_stock_label: String,

    // Repo where reservation issues are created
    pub shop_owner: String,
    pub shop_repo: String,
    pub reservation_label: String,
    pub reservation_instructions: String,

    // Form-post reservations; issue links are used when unset
    pub form_endpoint: Option<String>,
    pub form_subject_prefix: String,

    // Display
    pub house_preview_count: usize,
    pub cache_minutes: u64,
    pub img_dir: String,
    pub img_exts: Vec<String>,

    pub request_timeout_secs: u64,
}

impl Default for ShopOptions {
    fn default() -> Self {
        Self {
            inventory_owner: s!("IsThatToasted"),
            inventory_repo: s!("fragtrack"),
            inventory_list_label: s!("list:inventory"),
            in_stock_label: s!("In Stock"),
            shop_owner: s!("IsThatToasted"),
            shop_repo: s!("fragshop"),
            reservation_label: s!("reservation"),
            reservation_instructions: s!(
                "Fill in your contact info below. The seller will confirm availability and reach out to finalize."
            ),
            form_endpoint: None,
            form_subject_prefix: s!("Reservation:"),
            house_preview_count: HOUSE_PREVIEW_COUNT,
            cache_minutes: CACHE_MINUTES,
            img_dir: s!(IMG_DIR),
            img_exts: IMG_EXTS.iter().map(|e| s!(*e)).collect(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ShopOptions {
    /// Read options from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: PathBuf::from(path),
            source,
        })?;
        Self::from_json_str(&text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from(path),
            source,
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Labels an issue must carry, in the order the API expects them.
    pub fn required_labels(&self) -> Vec<String> {
        [&self.inventory_list_label, &self.in_stock_label]
            .into_iter()
            .filter(|l| !l.trim().is_empty())
            .cloned()
            .collect()
    }

    /// Snapshot freshness window. Zero minutes falls back to the default.
    pub fn cache_ttl(&self) -> Duration {
        let mins = if self.cache_minutes == 0 { CACHE_MINUTES } else { self.cache_minutes };
        Duration::from_secs(mins * 60)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn inventory_repo_url(&self) -> String {
        format!("{WEB_BASE}/{}/{}", self.inventory_owner, self.inventory_repo)
    }
}
