// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashMap;

use crate::{api::Fetch, types::ImageRecord};

/// Case-insensitive lookup from character name to image url.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageIndex {
    by_name: HashMap<String, String>,
}

impl ImageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later records overwrite earlier ones with the same lower-cased name.
    pub fn from_records(records: impl IntoIterator<Item = ImageRecord>) -> Self {
        let by_name = records
            .into_iter()
            .map(|r| (r.name.to_lowercase(), r.image))
            .collect();
        Self { by_name }
    }

    /// Returns the image url for `name`, or `""` when there is none.
    pub fn lookup(&self, name: &str) -> &str {
        self.by_name
            .get(&name.to_lowercase())
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Fetches the image dataset and indexes it.
///
/// Images are cosmetic, so any failure yields an empty index instead of an error.
pub fn build_image_index<F: Fetch>(fetcher: &F, dataset_url: &str) -> ImageIndex {
    match fetcher.fetch::<Vec<ImageRecord>>(dataset_url) {
        Ok(records) => {
            let index = ImageIndex::from_records(records);
            log::debug!(target: "images", "indexed {} image(s)", index.len());
            index
        }
        Err(e) => {
            log::warn!(target: "images", "image dataset unavailable, continuing without images: {e}");
            ImageIndex::new()
        }
    }
}
