// SPDX-License-Identifier: MIT OR Apache-2.0

use libswapi_catalog::{CatalogView, CharacterDetails, FacetKind, Facets, JsonOutput, ResolvedCharacter};
use serde::Serialize;

use crate::exit_code::ExitCode;

pub mod ansi {
    pub const BOLD: &str = "\x1b[1m";
    pub const RESET: &str = "\x1b[0m";

    #[inline]
    pub fn bold(s: &str) -> String {
        format!("{BOLD}{s}{RESET}")
    }
}

pub fn output_error(json: bool, msg: &str) {
    if json {
        let output: JsonOutput<()> = JsonOutput::err(msg);
        match serde_json::to_string(&output) {
            Ok(line) => println!("{line}"),
            Err(_) => eprintln!("error: {msg}"),
        }
    } else {
        eprintln!("{} {msg}", ansi::bold("error:"));
    }
}

pub fn output_json<T: Serialize>(data: T) -> libswapi_catalog::Result<ExitCode> {
    let output = JsonOutput::ok(&data);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(ExitCode::Success)
}

pub fn print_info(msg: &str) {
    println!("{} {msg}", ansi::bold("info:"));
}

fn column_width<T>(items: &[T], name: impl Fn(&T) -> &str) -> usize {
    items
        .iter()
        .map(|i| name(i).chars().count())
        .max()
        .unwrap_or(10)
        .max(10)
}

fn characters_table(characters: &[&ResolvedCharacter]) -> Vec<String> {
    let name_col = column_width(characters, |c| c.name());
    let world_col = column_width(characters, |c| &c.homeworld_name);

    let mut lines = Vec::with_capacity(characters.len() + 2);
    lines.push(format!(
        "{:<name_col$}  {:<world_col$}  {:>5}  SPECIES",
        "NAME", "HOMEWORLD", "FILMS"
    ));
    lines.push("-".repeat(name_col + world_col + 20));

    for c in characters {
        lines.push(format!(
            "{:<name_col$}  {:<world_col$}  {:>5}  {}",
            c.name(),
            c.homeworld_name,
            c.number_of_films(),
            c.species_names.join(", ")
        ));
    }
    lines
}

pub fn print_characters_table(characters: &[&ResolvedCharacter]) {
    for line in characters_table(characters) {
        println!("{line}");
    }
}

pub fn print_view(view: &CatalogView<'_>) {
    if let Some(error) = view.last_error {
        eprintln!("{} {error}", ansi::bold("warn:"));
    }

    if view.characters.is_empty() {
        print_info("no characters match");
    } else {
        print_characters_table(&view.characters);
    }

    println!();
    let mut status = format!("page {}", view.current_page);
    if view.has_previous {
        status.push_str("  [p]revious");
    }
    if view.has_next {
        status.push_str("  [n]ext");
    }
    if !view.search.is_empty() {
        status.push_str(&format!("  search: \"{}\"", view.search));
    }
    println!("{status}");

    if !view.filters.is_empty() {
        let active: Vec<String> = view.filters.iter().map(ToString::to_string).collect();
        println!("filters: {}", active.join(", "));
    }
}

pub fn print_details(details: &CharacterDetails) {
    println!("{}", ansi::bold(&details.name));
    if !details.image.is_empty() {
        println!("  image:       {}", details.image);
    }
    println!("  height:      {}", details.height);
    println!("  mass:        {}", details.mass);
    println!("  birth year:  {}", details.birth_year);
    println!("  date added:  {}", details.date_added);
    println!("  films:       {}", details.number_of_films);
    if let Some(species) = &details.species {
        println!("  species:     {species}");
    }

    if let Some(homeworld) = &details.homeworld {
        println!();
        println!("{}", ansi::bold("homeworld:"));
        println!("  name:        {}", homeworld.name);
        println!("  terrain:     {}", homeworld.terrain);
        println!("  climate:     {}", homeworld.climate);
        println!("  population:  {}", homeworld.population);
    }

    if !details.films.is_empty() {
        println!();
        println!("{}", ansi::bold("films:"));
        for title in &details.films {
            println!("  - {title}");
        }
    }
}

pub fn print_facets(facets: &Facets) {
    for kind in FacetKind::all() {
        let values = facets.values(*kind);
        println!("{} ({})", ansi::bold(&kind.to_string()), values.len());
        for value in values {
            println!("  - {value}");
        }
    }
}
