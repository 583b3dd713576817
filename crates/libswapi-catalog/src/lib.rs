// SPDX-License-Identifier: MIT OR Apache-2.0

//! # libswapi-catalog
//!
//! Fetches Star Wars characters from a SWAPI-style REST service, resolves
//! their homeworld, species, films and image, and exposes the result as a
//! searchable, filterable, paginated catalog.
//!
//! ## Features
//!
//! - **Aggregation**: every character on a listing page is resolved in parallel
//! - **Graceful degradation**: a failed related lookup becomes `"Unknown"`, never an error
//! - **Facets**: sorted, de-duplicated homeworld/film/species values for filtering
//! - **Two pagination modes**: listing cursors when unfiltered, local 12-item pages otherwise
//! - **Stale load protection**: only the most recent page load may update the catalog
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use libswapi_catalog::{Config, load_catalog};
//!
//! # fn main() -> libswapi_catalog::Result<()> {
//! let mut catalog = load_catalog(&Config::new())?;
//!
//! catalog.state_mut().set_search("sky");
//! for character in catalog.state().visible() {
//!     println!("{} ({})", character.name(), character.homeworld_name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod details;
pub mod error;
pub mod facets;
pub mod filter;
pub mod images;
pub mod loader;
pub mod pagination;
pub mod resolver;
pub mod types;

pub use api::{ApiClient, ApiConfig, Fetch};
pub use auth::{Credentials, LoginGate};
pub use catalog::{Catalog, CatalogState, CatalogView, LoadOutcome, LoadTicket, Navigation};
pub use config::Config;
pub use details::{CharacterDetails, HomeworldDetails};
pub use error::{Error, Result};
pub use facets::Facets;
pub use filter::{filter_characters, matches};
pub use images::{ImageIndex, build_image_index};
pub use loader::{LoadedPage, PageLoader};
pub use pagination::{PAGE_SIZE, PageAvailability, PaginationMode};
pub use resolver::resolve_character;
pub use types::{
    ActiveFilter, ActiveFilters, Character, FacetKind, Film, JsonOutput, PageCursors, Planet,
    ResolvedCharacter, Species, UNKNOWN,
};

/// Builds a catalog backed by an [`ApiClient`] and loads the first listing page.
///
/// A failed first load is returned as an error.
pub fn load_catalog(config: &Config) -> Result<Catalog<ApiClient>> {
    let client = ApiClient::with_config(config.api.clone())?;
    let mut catalog = Catalog::from_config(client, config)?;
    catalog.load_first_page()?;
    Ok(catalog)
}
