// SPDX-License-Identifier: MIT OR Apache-2.0

mod client;
mod config;
#[cfg(test)]
pub(crate) mod mock;

pub use client::{ApiClient, Fetch};
pub use config::{ApiConfig, USER_AGENT};
pub(crate) use config::{DEFAULT_IMAGE_DATASET_URL, DEFAULT_LISTING_URL};
