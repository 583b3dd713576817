// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::{ActiveFilters, FacetKind, ResolvedCharacter};

/// Distinct, sorted facet values derived from a character collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub homeworlds: Vec<String>,
    pub films: Vec<String>,
    pub species: Vec<String>,
}

impl Facets {
    pub fn derive(characters: &[ResolvedCharacter]) -> Self {
        let mut homeworlds = BTreeSet::new();
        let mut films = BTreeSet::new();
        let mut species = BTreeSet::new();

        for character in characters {
            if !character.homeworld_name.is_empty() {
                homeworlds.insert(character.homeworld_name.as_str());
            }
            films.extend(character.film_titles.iter().map(String::as_str));
            species.extend(character.species_names.iter().map(String::as_str));
        }

        Self {
            homeworlds: into_owned(homeworlds),
            films: into_owned(films),
            species: into_owned(species),
        }
    }

    pub fn values(&self, kind: FacetKind) -> &[String] {
        match kind {
            FacetKind::Homeworld => &self.homeworlds,
            FacetKind::Film => &self.films,
            FacetKind::Species => &self.species,
        }
    }

    /// Facet values of `kind` that are not already used by an active filter.
    pub fn available(&self, kind: FacetKind, active: &ActiveFilters) -> Vec<&str> {
        let used: Vec<&str> = active.values_for(kind).collect();
        self.values(kind)
            .iter()
            .map(String::as_str)
            .filter(|v| !used.contains(v))
            .collect()
    }
}

fn into_owned(set: BTreeSet<&str>) -> Vec<String> {
    set.into_iter().map(str::to_string).collect()
}
