// src/image.rs
//
// Product image lookup is purely conventional: `imgs/<house>-<name>.<ext>`
// first, then `imgs/<name>.<ext>`. This module only builds the candidate
// list; whoever renders decides which one exists.

use std::path::Path;

use crate::config::ShopOptions;
use crate::core::sanitize::slugify;
use crate::product::Product;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageMeta {
    /// `<house-slug>__<name-slug>`, stable across runs.
    pub key: String,
    pub candidates: Vec<String>,
}

pub fn image_meta(house: &str, name: &str, dir: &str, exts: &[String]) -> ImageMeta {
    let dir = dir.trim_matches('/');
    let house_slug = slugify(house);
    let name_slug = slugify(name);

    let mut candidates = Vec::new();
    if !house_slug.is_empty() && !name_slug.is_empty() {
        for ext in exts {
            candidates.push(format!("{dir}/{house_slug}-{name_slug}.{ext}"));
        }
    }
    if !name_slug.is_empty() {
        for ext in exts {
            candidates.push(format!("{dir}/{name_slug}.{ext}"));
        }
    }

    ImageMeta { key: format!("{house_slug}__{name_slug}"), candidates }
}

impl ImageMeta {
    pub fn for_product(p: &Product, opts: &ShopOptions) -> Self {
        image_meta(p.house(), p.name(), &opts.img_dir, &opts.img_exts)
    }

    /// First candidate that exists under `root`.
    pub fn first_existing(&self, root: &Path) -> Option<&str> {
        self.candidates
            .iter()
            .find(|c| root.join(c.as_str()).is_file())
            .map(String::as_str)
    }
}
