// SPDX-License-Identifier: MIT OR Apache-2.0

use std::io::{self, BufRead, Write};

use libswapi_catalog::{
    ActiveFilter, Catalog, CharacterDetails, Error, FacetKind, Fetch, LoginGate, Result,
};

use crate::{
    exit_code::ExitCode,
    output::{ansi, print_details, print_facets, print_info, print_view},
};

const MAX_LOGIN_ATTEMPTS: usize = 3;

const HELP: &str = "\
  n, next                 next page
  p, prev                 previous page
  s, search [text]        search by name (empty clears)
  f, filter kind=value    add a filter (homeworld, film, species)
  r, remove kind=value    remove a filter
  c, clear                remove all filters
  o, options [kind]       facet values still available
  d, details name|url     show a character
  h, help                 this help
  q, quit                 leave";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Next,
    Previous,
    Search(String),
    AddFilter(ActiveFilter),
    RemoveFilter(ActiveFilter),
    ClearFilters,
    Options(Option<FacetKind>),
    Details(String),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word.to_ascii_lowercase().as_str() {
        "n" | "next" => Command::Next,
        "p" | "prev" | "previous" => Command::Previous,
        "s" | "search" => Command::Search(rest.to_string()),
        "f" | "filter" => Command::AddFilter(rest.parse()?),
        "r" | "remove" => Command::RemoveFilter(rest.parse()?),
        "c" | "clear" => Command::ClearFilters,
        "o" | "options" if rest.is_empty() => Command::Options(None),
        "o" | "options" => Command::Options(Some(rest.parse()?)),
        "d" | "details" if !rest.is_empty() => Command::Details(rest.to_string()),
        "d" | "details" => return Err(Error::other("details needs a name or url")),
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other => return Err(Error::other(format!("unknown command '{other}' (h for help)"))),
    };
    Ok(command)
}

fn prompt(input: &mut impl BufRead, label: &str) -> Option<String> {
    print!("{label}");
    io::stdout().flush().ok();

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

fn login(input: &mut impl BufRead, gate: &LoginGate) -> bool {
    for _ in 0..MAX_LOGIN_ATTEMPTS {
        let Some(username) = prompt(input, "username: ") else {
            return false;
        };
        let Some(password) = prompt(input, "password: ") else {
            return false;
        };

        if gate.accepts(username.trim(), &password) {
            return true;
        }
        eprintln!("{} invalid credentials ({})", ansi::bold("error:"), gate.hint());
    }
    false
}

/// Runs the interactive catalog session on stdin.
pub fn run<F: Fetch>(catalog: &mut Catalog<F>, gate: &LoginGate) -> Result<ExitCode> {
    if !atty::is(atty::Stream::Stdin) {
        return Err(Error::other("browse needs an interactive terminal"));
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();

    if !login(&mut input, gate) {
        return Ok(ExitCode::PartialFailure);
    }

    // the failure is also kept in the catalog state and shown by print_view
    if let Err(e) = catalog.load_first_page() {
        log::debug!(target: "cli", "first page failed to load: {e}");
    }
    print_view(&catalog.state().view());

    loop {
        let Some(line) = prompt(&mut input, &ansi::bold("> ")) else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{} {e}", ansi::bold("error:"));
                continue;
            }
        };

        if !execute(catalog, command) {
            break;
        }
    }

    Ok(ExitCode::Success)
}

/// Returns `false` when the session should end.
fn execute<F: Fetch>(catalog: &mut Catalog<F>, command: Command) -> bool {
    match command {
        Command::Next => {
            if matches!(catalog.next_page(), Ok(false)) {
                print_info("already on the last page");
            }
        }
        Command::Previous => {
            if matches!(catalog.previous_page(), Ok(false)) {
                print_info("already on the first page");
            }
        }
        Command::Search(text) => {
            let state = catalog.state_mut();
            let suggestions = state.suggestions(&text).join(", ");
            if !suggestions.is_empty() {
                print_info(&format!("matches: {suggestions}"));
            }
            state.set_search(text);
        }
        Command::AddFilter(filter) => {
            if !catalog.state_mut().add_filter(filter) {
                print_info("filter already active");
            }
        }
        Command::RemoveFilter(filter) => {
            if !catalog.state_mut().remove_filter(&filter) {
                print_info("filter was not active");
            }
        }
        Command::ClearFilters => catalog.state_mut().clear_filters(),
        Command::Options(None) => {
            print_facets(catalog.state().facets());
            return true;
        }
        Command::Options(Some(kind)) => {
            let values = catalog.state().available_facet_values(kind);
            print_info(&format!("{kind}: {}", values.join(", ")));
            return true;
        }
        Command::Details(key) => {
            match catalog.state().find_by_name_or_url(&key) {
                Some(character) => print_details(&CharacterDetails::from(character)),
                None => eprintln!("{} no loaded character '{key}'", ansi::bold("error:")),
            }
            return true;
        }
        Command::Help => {
            println!("{HELP}");
            return true;
        }
        Command::Quit => return false,
    }

    println!();
    print_view(&catalog.state().view());
    true
}
