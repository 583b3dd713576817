// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::Serialize;

use crate::{
    Result,
    api::Fetch,
    config::Config,
    facets::Facets,
    filter,
    loader::{LoadedPage, PageLoader},
    pagination::{PageAvailability, PaginationMode, page_slice},
    types::{ActiveFilter, ActiveFilters, FacetKind, PageCursors, ResolvedCharacter},
};

/// Handle for one in-flight page load.
///
/// Only the most recently issued ticket may update the catalog.
#[derive(Debug, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    url: String,
    target_page: usize,
}

impl LoadTicket {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Listing page number this load will show once applied.
    pub fn target_page(&self) -> usize {
        self.target_page
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Failed,
    /// A newer load was started after this one; the result was discarded.
    Stale,
}

/// Result of a next/previous request.
#[derive(Debug, PartialEq, Eq)]
pub enum Navigation {
    /// A listing page must be fetched and handed back via [`CatalogState::finish_load`].
    Fetch(LoadTicket),
    /// The local page changed.
    Local,
    /// There is no page in that direction.
    Unavailable,
}

/// Snapshot of everything the presentation layer renders.
#[derive(Debug, Serialize)]
pub struct CatalogView<'a> {
    pub characters: Vec<&'a ResolvedCharacter>,
    pub facets: &'a Facets,
    pub filters: &'a ActiveFilters,
    pub search: &'a str,
    pub mode: PaginationMode,
    pub current_page: usize,
    pub has_next: bool,
    pub has_previous: bool,
    pub filtered_count: usize,
    pub loading: bool,
    pub last_error: Option<&'a str>,
}

/// Owns the loaded characters and all search, filter and page state.
///
/// Every mutation recomputes the derived views before returning, so reads
/// never observe a half-updated catalog.
#[derive(Debug, Clone)]
pub struct CatalogState {
    characters: Vec<ResolvedCharacter>,
    facets: Facets,
    search: String,
    filters: ActiveFilters,
    /// Indices into `characters` that pass the search and filters.
    filtered: Vec<usize>,
    cursors: PageCursors,
    total_count: u32,
    server_page: usize,
    client_page: usize,
    page_size: usize,
    loading: bool,
    last_error: Option<String>,
    latest_seq: u64,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new(crate::pagination::PAGE_SIZE)
    }
}

impl CatalogState {
    pub fn new(page_size: usize) -> Self {
        Self {
            characters: Vec::new(),
            facets: Facets::default(),
            search: String::new(),
            filters: ActiveFilters::new(),
            filtered: Vec::new(),
            cursors: PageCursors::default(),
            total_count: 0,
            server_page: 1,
            client_page: 1,
            page_size: page_size.max(1),
            loading: false,
            last_error: None,
            latest_seq: 0,
        }
    }

    /// Starts a load of the listing page at `url`, superseding any load in flight.
    pub fn begin_load(&mut self, url: impl Into<String>, target_page: usize) -> LoadTicket {
        self.latest_seq += 1;
        self.loading = true;
        self.last_error = None;

        LoadTicket {
            seq: self.latest_seq,
            url: url.into(),
            target_page: target_page.max(1),
        }
    }

    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<LoadedPage>) -> LoadOutcome {
        match result {
            Ok(page) => self.apply_page(ticket, page),
            Err(e) => self.record_failure(ticket, e.to_string()),
        }
    }

    /// Replaces the collection and cursors with `page` if `ticket` is current.
    pub fn apply_page(&mut self, ticket: LoadTicket, page: LoadedPage) -> LoadOutcome {
        if self.is_stale(&ticket) {
            return LoadOutcome::Stale;
        }

        self.characters = page.characters;
        self.cursors = page.cursors;
        self.total_count = page.total_count;
        self.server_page = ticket.target_page;
        self.client_page = 1;
        self.loading = false;
        self.last_error = None;
        self.facets = Facets::derive(&self.characters);
        self.recompute();

        log::debug!(
            target: "catalog",
            "showing listing page {} ({} character(s))",
            self.server_page,
            self.characters.len()
        );
        LoadOutcome::Applied
    }

    /// Keeps the current collection and records `message` if `ticket` is current.
    pub fn record_failure(&mut self, ticket: LoadTicket, message: String) -> LoadOutcome {
        if self.is_stale(&ticket) {
            return LoadOutcome::Stale;
        }

        log::warn!(target: "catalog", "{message}");
        self.loading = false;
        self.last_error = Some(message);
        LoadOutcome::Failed
    }

    fn is_stale(&self, ticket: &LoadTicket) -> bool {
        if ticket.seq == self.latest_seq {
            return false;
        }
        log::debug!(
            target: "catalog",
            "discarding stale load #{} of {} (latest is #{})",
            ticket.seq,
            ticket.url,
            self.latest_seq
        );
        true
    }

    pub fn next_page(&mut self) -> Navigation {
        match self.mode() {
            PaginationMode::Server => match self.cursors.next.clone() {
                Some(url) => Navigation::Fetch(self.begin_load(url, self.server_page + 1)),
                None => Navigation::Unavailable,
            },
            PaginationMode::Client => {
                if !self.availability().has_next {
                    return Navigation::Unavailable;
                }
                self.client_page += 1;
                Navigation::Local
            }
        }
    }

    pub fn previous_page(&mut self) -> Navigation {
        match self.mode() {
            PaginationMode::Server => match self.cursors.previous.clone() {
                Some(url) => {
                    let target = self.server_page.saturating_sub(1).max(1);
                    Navigation::Fetch(self.begin_load(url, target))
                }
                None => Navigation::Unavailable,
            },
            PaginationMode::Client => {
                if !self.availability().has_previous {
                    return Navigation::Unavailable;
                }
                self.client_page -= 1;
                Navigation::Local
            }
        }
    }

    /// Sets the search text and returns to the first local page.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.client_page = 1;
        self.recompute();
    }

    /// Returns `false` if the filter was already active.
    pub fn add_filter(&mut self, filter: ActiveFilter) -> bool {
        let added = self.filters.insert(filter);
        self.client_page = 1;
        self.recompute();
        added
    }

    pub fn remove_filter(&mut self, filter: &ActiveFilter) -> bool {
        let removed = self.filters.remove(filter);
        self.client_page = 1;
        self.recompute();
        removed
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.client_page = 1;
        self.recompute();
    }

    fn recompute(&mut self) {
        let needle = self.search.as_str();
        self.filtered = self
            .characters
            .iter()
            .enumerate()
            .filter(|(_, c)| filter::matches(c, needle, &self.filters))
            .map(|(i, _)| i)
            .collect();
    }

    pub fn mode(&self) -> PaginationMode {
        PaginationMode::select(&self.search, &self.filters)
    }

    /// 1-based page number for the active pagination mode.
    pub fn current_page(&self) -> usize {
        match self.mode() {
            PaginationMode::Server => self.server_page,
            PaginationMode::Client => self.client_page,
        }
    }

    pub fn availability(&self) -> PageAvailability {
        match self.mode() {
            PaginationMode::Server => PageAvailability::server(&self.cursors),
            PaginationMode::Client => {
                PageAvailability::client(self.client_page, self.filtered.len(), self.page_size)
            }
        }
    }

    /// Characters passing the search and filters, in collection order.
    pub fn filtered(&self) -> Vec<&ResolvedCharacter> {
        self.filtered.iter().map(|&i| &self.characters[i]).collect()
    }

    /// The characters to render on the current page.
    pub fn visible(&self) -> Vec<&ResolvedCharacter> {
        match self.mode() {
            PaginationMode::Server => self.filtered(),
            PaginationMode::Client => page_slice(&self.filtered, self.client_page, self.page_size)
                .iter()
                .map(|&i| &self.characters[i])
                .collect(),
        }
    }

    pub fn view(&self) -> CatalogView<'_> {
        let availability = self.availability();
        CatalogView {
            characters: self.visible(),
            facets: &self.facets,
            filters: &self.filters,
            search: &self.search,
            mode: self.mode(),
            current_page: self.current_page(),
            has_next: availability.has_next,
            has_previous: availability.has_previous,
            filtered_count: self.filtered.len(),
            loading: self.loading,
            last_error: self.last_error.as_deref(),
        }
    }

    /// Names containing `input` (case-insensitive); nothing for empty input.
    pub fn suggestions(&self, input: &str) -> Vec<&str> {
        if input.is_empty() {
            return Vec::new();
        }
        let needle = input.to_lowercase();
        self.characters
            .iter()
            .map(ResolvedCharacter::name)
            .filter(|name| name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn available_facet_values(&self, kind: FacetKind) -> Vec<&str> {
        self.facets.available(kind, &self.filters)
    }

    pub fn find(&self, url: &str) -> Option<&ResolvedCharacter> {
        self.characters.iter().find(|c| c.url() == url)
    }

    /// Looks a character up by resource locator or case-insensitive name.
    pub fn find_by_name_or_url(&self, key: &str) -> Option<&ResolvedCharacter> {
        self.find(key).or_else(|| {
            let key = key.to_lowercase();
            self.characters
                .iter()
                .find(|c| c.name().to_lowercase() == key)
        })
    }

    pub fn characters(&self) -> &[ResolvedCharacter] {
        &self.characters
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filters(&self) -> &ActiveFilters {
        &self.filters
    }

    pub fn cursors(&self) -> &PageCursors {
        &self.cursors
    }

    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// A [`CatalogState`] driven synchronously by a [`PageLoader`].
pub struct Catalog<F> {
    loader: PageLoader<F>,
    state: CatalogState,
}

impl<F: Fetch> Catalog<F> {
    pub fn new(loader: PageLoader<F>, page_size: usize) -> Self {
        Self {
            loader,
            state: CatalogState::new(page_size),
        }
    }

    pub fn from_config(fetcher: F, config: &Config) -> Result<Self> {
        Ok(Self::new(
            PageLoader::from_config(fetcher, config)?,
            config.page_size,
        ))
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CatalogState {
        &mut self.state
    }

    pub fn load_first_page(&mut self) -> Result<LoadOutcome> {
        let ticket = self
            .state
            .begin_load(self.loader.first_page_url().to_string(), 1);
        self.run(ticket)
    }

    /// Loads an arbitrary listing page, shown as page `page_number`.
    pub fn load_page(&mut self, url: &str, page_number: usize) -> Result<LoadOutcome> {
        let ticket = self.state.begin_load(url, page_number);
        self.run(ticket)
    }

    /// Returns `false` when there is no next page.
    pub fn next_page(&mut self) -> Result<bool> {
        let navigation = self.state.next_page();
        self.navigate(navigation)
    }

    /// Returns `false` when there is no previous page.
    pub fn previous_page(&mut self) -> Result<bool> {
        let navigation = self.state.previous_page();
        self.navigate(navigation)
    }

    fn navigate(&mut self, navigation: Navigation) -> Result<bool> {
        match navigation {
            Navigation::Fetch(ticket) => self.run(ticket).map(|_| true),
            Navigation::Local => Ok(true),
            Navigation::Unavailable => Ok(false),
        }
    }

    /// Listing failures are recorded in the state and also returned.
    fn run(&mut self, ticket: LoadTicket) -> Result<LoadOutcome> {
        match self.loader.load(ticket.url()) {
            Ok(page) => Ok(self.state.apply_page(ticket, page)),
            Err(e) => {
                self.state.record_failure(ticket, e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Error,
        loader::tests::{PAGE_1, PAGE_2, swapi_fixture},
        types::tests::resolved,
    };

    fn catalog() -> Catalog<crate::api::mock::MockFetcher> {
        Catalog::new(PageLoader::new(swapi_fixture()), 12)
    }

    fn troopers(count: usize) -> LoadedPage {
        LoadedPage {
            characters: (1..=count)
                .map(|i| resolved(&format!("Trooper {i:02}"), "Kamino", &["Human"], &[]))
                .collect(),
            cursors: PageCursors {
                next: Some("https://swapi.dev/api/people/?page=4".to_string()),
                previous: Some("https://swapi.dev/api/people/?page=2".to_string()),
            },
            total_count: 82,
        }
    }

    fn names<'a>(characters: &[&'a ResolvedCharacter]) -> Vec<&'a str> {
        characters.iter().map(|c| c.name()).collect()
    }

    #[test]
    fn test_initial_state() {
        let state = CatalogState::default();
        assert!(!state.is_loading());
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.mode(), PaginationMode::Server);
        assert!(state.visible().is_empty());
        assert_eq!(state.availability(), PageAvailability::default());
    }

    #[test]
    fn test_load_first_page() {
        let mut catalog = catalog();
        assert_eq!(catalog.load_first_page().unwrap(), LoadOutcome::Applied);

        let view = catalog.state().view();
        assert_eq!(
            names(&view.characters),
            ["Luke Skywalker", "Leia Organa", "Darth Vader"]
        );
        assert_eq!(view.current_page, 1);
        assert!(view.has_next);
        assert!(!view.has_previous);
        assert!(!view.loading);
        assert_eq!(view.last_error, None);
        assert_eq!(view.facets.homeworlds, ["Alderaan", "Tatooine"]);
        assert_eq!(view.facets.films, ["A New Hope", "The Empire Strikes Back"]);
        assert_eq!(view.facets.species, ["Unknown"]);
    }

    #[test]
    fn test_server_navigation_follows_cursors() {
        let mut catalog = catalog();
        catalog.load_first_page().unwrap();

        assert!(catalog.next_page().unwrap());
        let state = catalog.state();
        assert_eq!(state.current_page(), 2);
        assert_eq!(names(&state.visible()), ["Obi-Wan Kenobi"]);
        assert!(!state.availability().has_next);
        assert!(state.availability().has_previous);

        assert!(!catalog.next_page().unwrap());
        assert_eq!(catalog.state().current_page(), 2);

        assert!(catalog.previous_page().unwrap());
        assert_eq!(catalog.state().current_page(), 1);
        assert_eq!(catalog.state().characters().len(), 3);
        assert!(!catalog.previous_page().unwrap());
    }

    #[test]
    fn test_listing_failure_keeps_previous_collection() {
        let fetcher = swapi_fixture().with_status(PAGE_2, 500);
        let mut catalog = Catalog::new(PageLoader::new(fetcher), 12);
        catalog.load_first_page().unwrap();

        let err = catalog.next_page().unwrap_err();
        assert!(matches!(err, Error::ListingFetch { .. }));

        let state = catalog.state();
        assert!(!state.is_loading());
        assert!(state.last_error().unwrap().contains("http status 500"));
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.characters().len(), 3);
        assert_eq!(state.cursors().next.as_deref(), Some(PAGE_2));
    }

    #[test]
    fn test_begin_load_sets_loading_and_clears_error() {
        let mut state = CatalogState::default();
        let ticket = state.begin_load(PAGE_1, 1);
        state.record_failure(ticket, "boom".to_string());
        assert_eq!(state.last_error(), Some("boom"));

        let ticket = state.begin_load(PAGE_1, 1);
        assert!(state.is_loading());
        assert_eq!(state.last_error(), None);
        assert_eq!(ticket.url(), PAGE_1);
    }

    #[test]
    fn test_stale_results_are_discarded() {
        let mut state = CatalogState::default();
        let slow_previous = state.begin_load(PAGE_1, 1);
        let newer_next = state.begin_load(PAGE_2, 2);
        assert!(newer_next.seq() > slow_previous.seq());

        assert_eq!(state.apply_page(newer_next, troopers(3)), LoadOutcome::Applied);
        assert_eq!(state.apply_page(slow_previous, troopers(20)), LoadOutcome::Stale);

        assert_eq!(state.characters().len(), 3);
        assert_eq!(state.current_page(), 2);
    }

    #[test]
    fn test_stale_failure_does_not_surface() {
        let mut state = CatalogState::default();
        let old = state.begin_load(PAGE_1, 1);
        let current = state.begin_load(PAGE_2, 2);

        assert_eq!(state.record_failure(old, "timed out".to_string()), LoadOutcome::Stale);
        assert!(state.is_loading());
        assert_eq!(state.last_error(), None);

        assert_eq!(
            state.finish_load(current, Err(Error::other("listing down"))),
            LoadOutcome::Failed
        );
        assert_eq!(state.last_error(), Some("listing down"));
    }

    #[test]
    fn test_search_resets_page() {
        let mut state = CatalogState::default();
        let ticket = state.begin_load("https://swapi.dev/api/people/?page=3", 3);
        state.apply_page(ticket, troopers(30));
        assert_eq!(state.current_page(), 3);

        state.set_search("a");
        assert_eq!(state.mode(), PaginationMode::Client);
        assert_eq!(state.current_page(), 1);

        state.set_search("");
        assert_eq!(state.mode(), PaginationMode::Server);
        assert_eq!(state.current_page(), 3);
    }

    #[test]
    fn test_client_pagination() {
        let mut state = CatalogState::default();
        let ticket = state.begin_load(PAGE_1, 1);
        state.apply_page(ticket, troopers(30));

        state.set_search("trooper");
        assert_eq!(state.visible().len(), 12);
        assert_eq!(state.visible()[0].name(), "Trooper 01");
        assert!(state.availability().has_next);
        assert!(!state.availability().has_previous);

        assert_eq!(state.next_page(), Navigation::Local);
        assert_eq!(state.next_page(), Navigation::Local);
        assert_eq!(state.current_page(), 3);
        assert_eq!(names(&state.visible()).first(), Some(&"Trooper 25"));
        assert_eq!(state.visible().len(), 6);
        assert_eq!(state.next_page(), Navigation::Unavailable);

        assert_eq!(state.previous_page(), Navigation::Local);
        assert_eq!(state.current_page(), 2);

        state.set_search("trooper 1");
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.view().filtered_count, 10);
        assert!(!state.availability().has_next);
    }

    #[test]
    fn test_client_mode_never_fetches() {
        let mut catalog = catalog();
        catalog.load_first_page().unwrap();
        catalog.state_mut().set_search("o");

        assert!(!catalog.next_page().unwrap());
        assert_eq!(catalog.loader.fetcher().request_count(PAGE_2), 0);
    }

    #[test]
    fn test_filters() {
        let mut catalog = catalog();
        catalog.load_first_page().unwrap();
        let state = catalog.state_mut();

        let tatooine = ActiveFilter::new(FacetKind::Homeworld, "Tatooine");
        assert!(state.add_filter(tatooine.clone()));
        assert!(!state.add_filter(tatooine.clone()));
        assert_eq!(names(&state.visible()), ["Luke Skywalker", "Darth Vader"]);
        assert_eq!(state.available_facet_values(FacetKind::Homeworld), ["Alderaan"]);

        state.add_filter(ActiveFilter::new(FacetKind::Film, "A New Hope"));
        assert_eq!(names(&state.visible()), ["Luke Skywalker"]);

        assert!(state.remove_filter(&tatooine));
        assert_eq!(names(&state.visible()), ["Luke Skywalker", "Leia Organa"]);

        state.clear_filters();
        assert_eq!(state.mode(), PaginationMode::Server);
        assert_eq!(state.visible().len(), 3);
    }

    #[test]
    fn test_filter_change_resets_client_page() {
        let mut state = CatalogState::default();
        let ticket = state.begin_load(PAGE_1, 1);
        state.apply_page(ticket, troopers(30));

        state.add_filter(ActiveFilter::new(FacetKind::Species, "Human"));
        state.next_page();
        state.next_page();
        assert_eq!(state.current_page(), 3);

        state.add_filter(ActiveFilter::new(FacetKind::Homeworld, "Kamino"));
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_suggestions_and_lookup() {
        let mut catalog = catalog();
        catalog.load_first_page().unwrap();
        let state = catalog.state();

        assert_eq!(state.suggestions("SKY"), ["Luke Skywalker"]);
        assert_eq!(state.suggestions("a"), ["Luke Skywalker", "Leia Organa", "Darth Vader"]);
        assert!(state.suggestions("").is_empty());

        let leia = state.find("https://swapi.dev/api/people/5/").unwrap();
        assert_eq!(leia.name(), "Leia Organa");
        assert_eq!(
            state.find_by_name_or_url("darth vader").unwrap().url(),
            "https://swapi.dev/api/people/4/"
        );
        assert!(state.find_by_name_or_url("Jar Jar Binks").is_none());
    }

    #[test]
    fn test_lookup_by_name_folds_non_ascii_case() {
        let mut state = CatalogState::default();
        let ticket = state.begin_load(PAGE_1, 1);
        let page = LoadedPage {
            characters: vec![resolved("Padmé Amidala", "Naboo", &["Human"], &[])],
            cursors: PageCursors::default(),
            total_count: 1,
        };
        state.apply_page(ticket, page);

        state.set_search("PADMÉ");
        assert_eq!(state.visible().len(), 1);
        assert_eq!(
            state.find_by_name_or_url("PADMÉ AMIDALA").map(|c| c.name()),
            Some("Padmé Amidala")
        );
    }
}
