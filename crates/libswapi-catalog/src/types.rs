// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::Error;

/// Literal shown wherever a related value could not be resolved.
pub const UNKNOWN: &str = "Unknown";

/// A character as returned by the people listing endpoint.
///
/// `url` is the character's identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub mass: String,
    #[serde(default)]
    pub hair_color: String,
    #[serde(default)]
    pub skin_color: String,
    #[serde(default)]
    pub eye_color: String,
    #[serde(default)]
    pub birth_year: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default, deserialize_with = "homeworld_ref")]
    pub homeworld: Option<String>,
    #[serde(default)]
    pub films: Vec<String>,
    #[serde(default)]
    pub species: Vec<String>,
    #[serde(default)]
    pub vehicles: Vec<String>,
    #[serde(default)]
    pub starships: Vec<String>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub edited: String,
    pub url: String,
}

/// `null`, `""` and the literal `"null"` all mean "no homeworld".
fn homeworld_ref<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty() && v != "null"))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub name: String,
    #[serde(default)]
    pub rotation_period: String,
    #[serde(default)]
    pub orbital_period: String,
    #[serde(default)]
    pub diameter: String,
    #[serde(default)]
    pub climate: String,
    #[serde(default)]
    pub gravity: String,
    #[serde(default)]
    pub terrain: String,
    #[serde(default)]
    pub surface_water: String,
    #[serde(default)]
    pub population: String,
    #[serde(default)]
    pub residents: Vec<String>,
    #[serde(default)]
    pub films: Vec<String>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub edited: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub name: String,
    #[serde(default)]
    pub classification: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub average_height: String,
    #[serde(default)]
    pub skin_colors: String,
    #[serde(default)]
    pub hair_colors: String,
    #[serde(default)]
    pub eye_colors: String,
    #[serde(default)]
    pub average_lifespan: String,
    #[serde(default)]
    pub homeworld: Option<String>,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub films: Vec<String>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub edited: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub title: String,
    #[serde(default)]
    pub episode_id: u32,
    #[serde(default)]
    pub opening_crawl: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub producer: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub planets: Vec<String>,
    #[serde(default)]
    pub starships: Vec<String>,
    #[serde(default)]
    pub vehicles: Vec<String>,
    #[serde(default)]
    pub species: Vec<String>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub edited: String,
    #[serde(default)]
    pub url: String,
}

/// One record of the auxiliary image dataset. Other fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImageRecord {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub image: String,
}

/// One page of the people listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListingPage {
    #[serde(default)]
    pub count: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<Character>,
}

/// Next/previous listing locators from the most recent successful fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageCursors {
    pub next: Option<String>,
    pub previous: Option<String>,
}

/// A character with its homeworld, species, films and image resolved.
///
/// Built once per page load and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedCharacter {
    #[serde(flatten)]
    pub character: Character,
    /// Image url, empty when the image dataset has no entry for this name.
    pub image: String,
    /// Planet name, or [`UNKNOWN`] when there is no homeworld or it failed to load.
    pub homeworld_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homeworld_record: Option<Planet>,
    /// Never empty: `["Unknown"]` when nothing resolved.
    pub species_names: Vec<String>,
    pub species_records: Vec<Species>,
    pub film_titles: Vec<String>,
    pub film_records: Vec<Film>,
}

impl ResolvedCharacter {
    pub fn name(&self) -> &str {
        &self.character.name
    }

    pub fn url(&self) -> &str {
        &self.character.url
    }

    /// Resolved title count, falling back to the number of film references.
    pub fn number_of_films(&self) -> usize {
        if self.film_titles.is_empty() {
            self.character.films.len()
        } else {
            self.film_titles.len()
        }
    }
}

/// A filterable dimension of the character collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetKind {
    Homeworld,
    Film,
    Species,
}

impl FacetKind {
    pub const fn all() -> &'static [FacetKind] {
        &[Self::Homeworld, Self::Film, Self::Species]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Homeworld => "homeworld",
            Self::Film => "film",
            Self::Species => "species",
        }
    }
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Homeworld => write!(f, "Homeworld"),
            Self::Film => write!(f, "Film"),
            Self::Species => write!(f, "Species"),
        }
    }
}

impl FromStr for FacetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "homeworld" | "planet" => Ok(Self::Homeworld),
            "film" | "films" => Ok(Self::Film),
            "species" => Ok(Self::Species),
            other => Err(Error::other(format!(
                "unknown filter kind '{other}' (expected homeworld, film or species)"
            ))),
        }
    }
}

/// A `(kind, value)` filter selected by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveFilter {
    pub kind: FacetKind,
    pub value: String,
}

impl ActiveFilter {
    pub fn new(kind: FacetKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.value)
    }
}

/// Parses `kind=value`, e.g. `homeworld=Tatooine`.
impl FromStr for ActiveFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((kind, value)) = s.split_once('=') else {
            return Err(Error::other(format!(
                "invalid filter '{s}' (expected kind=value)"
            )));
        };
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::other(format!("filter '{s}' has an empty value")));
        }
        Ok(Self::new(kind.parse()?, value))
    }
}

/// Insertion-ordered set of active filters, unique by `(kind, value)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActiveFilters(Vec<ActiveFilter>);

impl ActiveFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the filter was already present.
    pub fn insert(&mut self, filter: ActiveFilter) -> bool {
        if self.0.contains(&filter) {
            return false;
        }
        self.0.push(filter);
        true
    }

    pub fn remove(&mut self, filter: &ActiveFilter) -> bool {
        let before = self.0.len();
        self.0.retain(|f| f != filter);
        self.0.len() != before
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ActiveFilter> {
        self.0.iter()
    }

    pub fn values_for(&self, kind: FacetKind) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(move |f| f.kind == kind)
            .map(|f| f.value.as_str())
    }
}

impl FromIterator<ActiveFilter> for ActiveFilters {
    fn from_iter<I: IntoIterator<Item = ActiveFilter>>(iter: I) -> Self {
        let mut filters = Self::new();
        for filter in iter {
            filters.insert(filter);
        }
        filters
    }
}

impl<'a> IntoIterator for &'a ActiveFilters {
    type Item = &'a ActiveFilter;
    type IntoIter = std::slice::Iter<'a, ActiveFilter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// JSON output structures for CLI
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn resolved(
        name: &str,
        homeworld: &str,
        species: &[&str],
        films: &[&str],
    ) -> ResolvedCharacter {
        ResolvedCharacter {
            character: Character {
                name: name.to_string(),
                url: format!("https://swapi.dev/api/people/{name}/"),
                ..Default::default()
            },
            image: String::new(),
            homeworld_name: homeworld.to_string(),
            homeworld_record: None,
            species_names: species.iter().map(|s| s.to_string()).collect(),
            species_records: Vec::new(),
            film_titles: films.iter().map(|s| s.to_string()).collect(),
            film_records: Vec::new(),
        }
    }

    #[test]
    fn test_character_homeworld_sentinels() {
        for raw in [
            serde_json::json!(null),
            serde_json::json!(""),
            serde_json::json!("null"),
        ] {
            let character: Character = serde_json::from_value(serde_json::json!({
                "name": "R2-D2",
                "homeworld": raw,
                "url": "https://swapi.dev/api/people/3/",
            }))
            .unwrap();
            assert_eq!(character.homeworld, None);
        }

        let character: Character = serde_json::from_value(serde_json::json!({
            "name": "R2-D2",
            "homeworld": "https://swapi.dev/api/planets/8/",
            "url": "https://swapi.dev/api/people/3/",
        }))
        .unwrap();
        assert_eq!(
            character.homeworld.as_deref(),
            Some("https://swapi.dev/api/planets/8/")
        );
        assert!(character.films.is_empty());
        assert!(character.species.is_empty());
    }

    #[test]
    fn test_listing_page_parses_cursors() {
        let page: ListingPage = serde_json::from_value(serde_json::json!({
            "count": 82,
            "next": "https://swapi.dev/api/people/?page=2",
            "previous": null,
            "results": [],
        }))
        .unwrap();
        assert_eq!(page.count, 82);
        assert_eq!(page.next.as_deref(), Some("https://swapi.dev/api/people/?page=2"));
        assert_eq!(page.previous, None);
    }

    #[test]
    fn test_image_record_ignores_extra_fields() {
        let records: Vec<ImageRecord> = serde_json::from_value(serde_json::json!([
            { "id": 1, "name": "Luke Skywalker", "image": "https://img/luke.jpg", "mass": 77 },
        ]))
        .unwrap();
        assert_eq!(records[0].image, "https://img/luke.jpg");
    }

    #[test]
    fn test_filter_parse() {
        let filter: ActiveFilter = "homeworld=Tatooine".parse().unwrap();
        assert_eq!(filter, ActiveFilter::new(FacetKind::Homeworld, "Tatooine"));

        let filter: ActiveFilter = "film = A New Hope".parse().unwrap();
        assert_eq!(filter, ActiveFilter::new(FacetKind::Film, "A New Hope"));

        assert!("vehicle=Speeder".parse::<ActiveFilter>().is_err());
        assert!("species".parse::<ActiveFilter>().is_err());
        assert!("species=".parse::<ActiveFilter>().is_err());
    }

    #[test]
    fn test_active_filters_set_semantics() {
        let mut filters = ActiveFilters::new();
        assert!(filters.insert(ActiveFilter::new(FacetKind::Film, "A New Hope")));
        assert!(filters.insert(ActiveFilter::new(FacetKind::Homeworld, "Tatooine")));
        assert!(!filters.insert(ActiveFilter::new(FacetKind::Film, "A New Hope")));
        assert_eq!(filters.len(), 2);

        let order: Vec<_> = filters.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(order, ["A New Hope", "Tatooine"]);

        assert!(filters.remove(&ActiveFilter::new(FacetKind::Film, "A New Hope")));
        assert!(!filters.remove(&ActiveFilter::new(FacetKind::Film, "A New Hope")));
        assert_eq!(filters.values_for(FacetKind::Homeworld).collect::<Vec<_>>(), ["Tatooine"]);

        filters.clear();
        assert!(filters.is_empty());
    }

    #[test]
    fn test_number_of_films_falls_back_to_references() {
        let mut resolved = ResolvedCharacter {
            character: Character {
                name: "Luke Skywalker".to_string(),
                films: vec![
                    "https://swapi.dev/api/films/1/".to_string(),
                    "https://swapi.dev/api/films/2/".to_string(),
                ],
                url: "https://swapi.dev/api/people/1/".to_string(),
                ..Default::default()
            },
            image: String::new(),
            homeworld_name: UNKNOWN.to_string(),
            homeworld_record: None,
            species_names: vec![UNKNOWN.to_string()],
            species_records: Vec::new(),
            film_titles: Vec::new(),
            film_records: Vec::new(),
        };
        assert_eq!(resolved.number_of_films(), 2);

        resolved.film_titles = vec!["A New Hope".to_string()];
        assert_eq!(resolved.number_of_films(), 1);
    }
}
