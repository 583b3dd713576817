// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::types::{ActiveFilter, ActiveFilters, FacetKind, ResolvedCharacter};

/// Returns `true` when `character` matches the search text and every filter.
///
/// Search is a case-insensitive substring match on the name; an empty
/// search matches everything. Filter values are compared exactly.
pub fn matches(character: &ResolvedCharacter, search: &str, filters: &ActiveFilters) -> bool {
    matches_search(character, &search.to_lowercase())
        && filters.iter().all(|f| matches_filter(character, f))
}

/// Returns the matching characters in collection order.
pub fn filter_characters<'a>(
    characters: &'a [ResolvedCharacter],
    search: &str,
    filters: &ActiveFilters,
) -> Vec<&'a ResolvedCharacter> {
    let needle = search.to_lowercase();
    characters
        .iter()
        .filter(|c| matches_search(c, &needle) && filters.iter().all(|f| matches_filter(c, f)))
        .collect()
}

fn matches_search(character: &ResolvedCharacter, needle: &str) -> bool {
    needle.is_empty() || character.name().to_lowercase().contains(needle)
}

fn matches_filter(character: &ResolvedCharacter, filter: &ActiveFilter) -> bool {
    match filter.kind {
        FacetKind::Homeworld => character.homeworld_name == filter.value,
        FacetKind::Film => character.film_titles.contains(&filter.value),
        FacetKind::Species => character.species_names.contains(&filter.value),
    }
}
