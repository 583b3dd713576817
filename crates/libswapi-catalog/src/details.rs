// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::types::{Planet, ResolvedCharacter, UNKNOWN};

/// Display-ready fields of one character.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterDetails {
    pub name: String,
    pub url: String,
    pub image: String,
    pub height: String,
    pub mass: String,
    pub birth_year: String,
    pub date_added: String,
    pub number_of_films: usize,
    /// Comma-separated species names, absent when none are known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homeworld: Option<HomeworldDetails>,
    pub films: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeworldDetails {
    pub name: String,
    pub terrain: String,
    pub climate: String,
    pub population: String,
}

impl From<&Planet> for HomeworldDetails {
    fn from(planet: &Planet) -> Self {
        Self {
            name: planet.name.clone(),
            terrain: or_unknown(&planet.terrain),
            climate: or_unknown(&planet.climate),
            population: or_unknown(&planet.population),
        }
    }
}

impl From<&ResolvedCharacter> for CharacterDetails {
    fn from(resolved: &ResolvedCharacter) -> Self {
        let character = &resolved.character;
        let species = (!resolved.species_names.is_empty()).then(|| resolved.species_names.join(", "));

        Self {
            name: character.name.clone(),
            url: character.url.clone(),
            image: resolved.image.clone(),
            height: format_height(&character.height),
            mass: format_mass(&character.mass),
            birth_year: or_unknown(&character.birth_year),
            date_added: format_date(&character.created),
            number_of_films: resolved.number_of_films(),
            species,
            homeworld: resolved.homeworld_record.as_ref().map(HomeworldDetails::from),
            films: resolved.film_titles.clone(),
        }
    }
}

fn is_unknown(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("unknown")
}

/// Maps the remote `"unknown"` marker (and empty values) to [`UNKNOWN`].
pub fn or_unknown(value: &str) -> String {
    if is_unknown(value) {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}

/// Centimetres to metres, e.g. `"172"` becomes `"1.72m"`.
pub fn format_height(height: &str) -> String {
    if is_unknown(height) {
        return UNKNOWN.to_string();
    }
    match height.replace(',', "").parse::<f64>() {
        Ok(cm) => format!("{:.2}m", cm / 100.0),
        Err(_) => UNKNOWN.to_string(),
    }
}

pub fn format_mass(mass: &str) -> String {
    if is_unknown(mass) {
        UNKNOWN.to_string()
    } else {
        format!("{mass} kg")
    }
}

/// Formats an RFC 3339 timestamp as `dd-MM-yyyy` in UTC.
pub fn format_date(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(parsed) => {
            let utc = parsed.with_timezone(&Utc);
            format!("{:02}-{:02}-{:04}", utc.day(), utc.month(), utc.year())
        }
        Err(_) => UNKNOWN.to_string(),
    }
}
