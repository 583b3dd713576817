// SPDX-License-Identifier: MIT OR Apache-2.0

mod browse;
mod config;
mod exit_code;
mod output;

use clap::{Parser, Subcommand};
use libswapi_catalog::{
    ActiveFilter, ApiClient, Catalog, CatalogState, CharacterDetails, LoginGate, PaginationMode,
    pagination::total_pages,
};

use crate::{
    config::CliConfig,
    exit_code::ExitCode,
    output::{output_error, output_json, print_details, print_facets, print_info, print_view},
};

#[derive(Parser)]
#[command(name = "swapi-catalog")]
#[command(about = "browse star wars characters from swapi")]
#[command(version)]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// output results as json
    #[arg(long, global = true)]
    json: bool,

    /// open configuration file in editor
    #[arg(long)]
    edit_config: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// list one page of characters
    List {
        /// case-insensitive name search
        #[arg(short, long)]
        search: Option<String>,

        /// filter as kind=value (homeworld, film, species); repeatable
        #[arg(short, long = "filter", value_name = "KIND=VALUE")]
        filters: Vec<ActiveFilter>,

        /// page of the filtered results (with --search or --filter)
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// listing page to load instead of the first one
        #[arg(long)]
        url: Option<String>,
    },
    /// show details of a character on the first listing page
    Show {
        /// character name or resource url
        character: String,

        /// listing page to search instead of the first one
        #[arg(long)]
        url: Option<String>,
    },
    /// list homeworld, film and species values of the first listing page
    Facets {
        /// listing page to use instead of the first one
        #[arg(long)]
        url: Option<String>,
    },
    /// interactive session (requires login)
    Browse,
}

fn main() {
    let cli = Cli::parse();

    let exit_code = run(&cli).unwrap_or_else(|e| {
        output_error(cli.json, &e.to_string());
        ExitCode::FatalError
    });

    std::process::exit(exit_code.into());
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> libswapi_catalog::Result<ExitCode> {
    if cli.edit_config {
        CliConfig::edit_config()?;
        return Ok(ExitCode::Success);
    }

    let config = CliConfig::load()?;
    init_logging(cli.verbose || config.verbose);

    let client = ApiClient::with_config(config.api.clone())?;
    let mut catalog = Catalog::from_config(client, &config)?;

    match cli.command.as_ref().unwrap_or(&Commands::Browse) {
        Commands::List {
            search,
            filters,
            page,
            url,
        } => cmd_list(
            cli,
            &mut catalog,
            search.as_deref(),
            filters,
            *page,
            url.as_deref(),
        ),
        Commands::Show { character, url } => {
            cmd_show(cli, &mut catalog, character, url.as_deref())
        }
        Commands::Facets { url } => cmd_facets(cli, &mut catalog, url.as_deref()),
        Commands::Browse => {
            if cli.json {
                output_error(true, "browse does not support --json");
                return Ok(ExitCode::FatalError);
            }
            browse::run(&mut catalog, &LoginGate::new(config.credentials.clone()))
        }
    }
}

fn load(catalog: &mut Catalog<ApiClient>, url: Option<&str>) -> libswapi_catalog::Result<()> {
    let outcome = match url {
        Some(url) => catalog.load_page(url, page_number(url))?,
        None => catalog.load_first_page()?,
    };
    log::debug!(target: "cli", "initial load: {outcome:?}");
    Ok(())
}

/// Reads the `page` query parameter of a listing url, defaulting to 1.
fn page_number(url: &str) -> usize {
    url.split_once('?')
        .into_iter()
        .flat_map(|(_, query)| query.split('&'))
        .find_map(|pair| pair.strip_prefix("page="))
        .and_then(|n| n.parse().ok())
        .unwrap_or(1)
}

fn cmd_list(
    cli: &Cli,
    catalog: &mut Catalog<ApiClient>,
    search: Option<&str>,
    filters: &[ActiveFilter],
    page: usize,
    url: Option<&str>,
) -> libswapi_catalog::Result<ExitCode> {
    load(catalog, url)?;

    let state = catalog.state_mut();
    if let Some(search) = search {
        state.set_search(search);
    }
    for filter in filters {
        state.add_filter(filter.clone());
    }

    let exit_code = match turn_to_page(state, page) {
        Ok(()) => ExitCode::Success,
        Err(notice) => {
            // stdout carries only the json envelope in json mode
            if cli.json {
                eprintln!("info: {notice}");
            } else {
                print_info(notice);
            }
            ExitCode::PartialFailure
        }
    };

    let view = state.view();
    if cli.json {
        output_json(&view)?;
    } else {
        print_view(&view);
    }
    Ok(exit_code)
}

/// Moves the filtered results to the 1-based `page`, stopping at the last one.
fn turn_to_page(state: &mut CatalogState, page: usize) -> Result<(), &'static str> {
    if page <= 1 {
        return Ok(());
    }
    if state.mode() == PaginationMode::Server {
        return Err("--page applies to filtered results; use --url to pick a listing page");
    }

    let pages = total_pages(state.filtered().len(), state.page_size());
    while state.current_page() < page.min(pages) {
        state.next_page();
    }
    if page > pages {
        return Err("--page is past the last page of filtered results");
    }
    Ok(())
}

fn cmd_show(
    cli: &Cli,
    catalog: &mut Catalog<ApiClient>,
    character: &str,
    url: Option<&str>,
) -> libswapi_catalog::Result<ExitCode> {
    load(catalog, url)?;

    let Some(found) = catalog.state().find_by_name_or_url(character) else {
        output_error(cli.json, &format!("no character '{character}' on this listing page"));
        return Ok(ExitCode::PartialFailure);
    };

    let details = CharacterDetails::from(found);
    if cli.json {
        return output_json(&details);
    }
    print_details(&details);
    Ok(ExitCode::Success)
}

fn cmd_facets(
    cli: &Cli,
    catalog: &mut Catalog<ApiClient>,
    url: Option<&str>,
) -> libswapi_catalog::Result<ExitCode> {
    load(catalog, url)?;

    let facets = catalog.state().facets();
    if cli.json {
        return output_json(facets);
    }
    print_facets(facets);
    Ok(ExitCode::Success)
}
