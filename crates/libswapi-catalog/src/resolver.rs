// SPDX-License-Identifier: MIT OR Apache-2.0

use rayon::prelude::*;
use serde::de::DeserializeOwned;

use crate::{
    Result,
    api::Fetch,
    images::ImageIndex,
    types::{Character, Film, Planet, ResolvedCharacter, Species, UNKNOWN},
};

/// Resolves the homeworld, species, films and image of one character.
///
/// Never fails: each related resource degrades on its own.
/// - homeworld: name falls back to `"Unknown"`, record left empty
/// - species: any failed fetch drops the whole batch; names fall back to `["Unknown"]`
/// - films: any failed fetch drops the whole batch; titles stay empty
///
/// The three lookups run concurrently, and each batch keeps the order of
/// the character's reference list.
pub fn resolve_character<F: Fetch>(
    fetcher: &F,
    character: Character,
    images: &ImageIndex,
) -> ResolvedCharacter {
    let image = images.lookup(&character.name).to_string();

    let (homeworld_record, (species_records, film_records)) = rayon::join(
        || resolve_homeworld(fetcher, &character),
        || {
            rayon::join(
                || fetch_batch::<_, Species>(fetcher, &character.species, "species", &character.name),
                || fetch_batch::<_, Film>(fetcher, &character.films, "films", &character.name),
            )
        },
    );

    let homeworld_name = homeworld_record
        .as_ref()
        .map_or_else(|| UNKNOWN.to_string(), |p| p.name.clone());

    let species_names = if species_records.is_empty() {
        vec![UNKNOWN.to_string()]
    } else {
        species_records.iter().map(|s| s.name.clone()).collect()
    };

    let film_titles = film_records.iter().map(|f| f.title.clone()).collect();

    ResolvedCharacter {
        character,
        image,
        homeworld_name,
        homeworld_record,
        species_names,
        species_records,
        film_titles,
        film_records,
    }
}

fn resolve_homeworld<F: Fetch>(fetcher: &F, character: &Character) -> Option<Planet> {
    let url = character.homeworld.as_deref()?;

    match fetcher.fetch::<Planet>(url) {
        Ok(planet) => Some(planet),
        Err(e) => {
            log::debug!(
                target: "resolver",
                "homeworld of '{}' unavailable: {e}",
                character.name
            );
            None
        }
    }
}

fn fetch_batch<F: Fetch, T: DeserializeOwned + Send>(
    fetcher: &F,
    urls: &[String],
    what: &str,
    owner: &str,
) -> Vec<T> {
    if urls.is_empty() {
        return Vec::new();
    }

    let batch: Result<Vec<T>> = urls.par_iter().map(|url| fetcher.fetch(url)).collect();

    batch.unwrap_or_else(|e| {
        log::debug!(
            target: "resolver",
            "dropping {} {what} reference(s) of '{owner}': {e}",
            urls.len()
        );
        Vec::new()
    })
}
