// SPDX-License-Identifier: MIT OR Apache-2.0

use rayon::prelude::*;
use serde::Serialize;

use crate::{
    Error, Result,
    api::{DEFAULT_IMAGE_DATASET_URL, DEFAULT_LISTING_URL, Fetch},
    config::Config,
    images::build_image_index,
    resolver::resolve_character,
    types::{ListingPage, PageCursors, ResolvedCharacter},
};

/// One fully resolved listing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedPage {
    pub characters: Vec<ResolvedCharacter>,
    pub cursors: PageCursors,
    /// Total number of characters reported by the listing endpoint.
    pub total_count: u32,
}

/// Fetches listing pages and resolves every character on them.
pub struct PageLoader<F> {
    fetcher: F,
    listing_url: String,
    image_dataset_url: String,
    pool: Option<rayon::ThreadPool>,
}

impl<F: Fetch> PageLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            listing_url: DEFAULT_LISTING_URL.to_string(),
            image_dataset_url: DEFAULT_IMAGE_DATASET_URL.to_string(),
            pool: None,
        }
    }

    /// Builds a dedicated thread pool when `config.threads` is set.
    pub fn from_config(fetcher: F, config: &Config) -> Result<Self> {
        let pool = match config.threads {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?,
            ),
            None => None,
        };

        Ok(Self {
            fetcher,
            listing_url: config.listing_url.clone(),
            image_dataset_url: config.image_dataset_url.clone(),
            pool,
        })
    }

    pub fn first_page_url(&self) -> &str {
        &self.listing_url
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Loads the listing page at `url` and resolves all of its characters.
    ///
    /// Only a failed listing fetch is an error; image and related-resource
    /// failures degrade silently.
    pub fn load(&self, url: &str) -> Result<LoadedPage> {
        match &self.pool {
            Some(pool) => pool.install(|| self.load_page(url)),
            None => self.load_page(url),
        }
    }

    fn load_page(&self, url: &str) -> Result<LoadedPage> {
        log::debug!(target: "loader", "loading {url}");

        let (images, listing) = rayon::join(
            || build_image_index(&self.fetcher, &self.image_dataset_url),
            || self.fetcher.fetch::<ListingPage>(url),
        );
        let listing = listing.map_err(|e| Error::listing(url, e))?;

        let characters: Vec<ResolvedCharacter> = listing
            .results
            .into_par_iter()
            .map(|character| resolve_character(&self.fetcher, character, &images))
            .collect();

        log::info!(
            target: "loader",
            "resolved {} character(s) from {url}",
            characters.len()
        );

        Ok(LoadedPage {
            characters,
            cursors: PageCursors {
                next: listing.next,
                previous: listing.previous,
            },
            total_count: listing.count,
        })
    }
}
