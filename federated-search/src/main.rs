//! `federated-search` command: run one search, suggestion, or facet lookup
//! against the configured backend and print the result as JSON.

use std::ffi::OsString;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result};
use federated_search::config::SearchSettings;
use federated_search::domain::{
    DomainScope, FacetRegistry, FilterSet, SearchDispatcher, SearchDomain, SearchQuery,
    SuggestionEngine, SuggestionOutcome,
};
use federated_search::outbound::http::{HttpBackend, http_search_ports};
use ortho_config::OrthoConfig;
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `federated-search` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "federated-search",
    about = "Search accounts, games, posts, and guides in one query",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fan a query out across domains.
    Search {
        /// Query text.
        text: String,
        /// `all` or a single domain.
        #[arg(long, default_value = "all")]
        scope: DomainScope,
        /// Guide category filter.
        #[arg(long)]
        category: Option<String>,
        /// Guide difficulty filter.
        #[arg(long)]
        difficulty: Option<String>,
        /// Catalog genre filter.
        #[arg(long)]
        genre: Option<String>,
        /// Field to sort by.
        #[arg(long)]
        sort_by: Option<String>,
        /// `asc` or `desc`.
        #[arg(long)]
        sort_order: Option<String>,
        /// Load one more page of these domains after the first page settles.
        #[arg(long = "more", value_name = "domain")]
        more: Vec<SearchDomain>,
    },
    /// Resolve type-ahead suggestions for some text.
    Suggest {
        /// Partial input.
        text: String,
    },
    /// Load the filter facet catalog.
    Facets,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let settings = SearchSettings::load_from_iter([OsString::from("federated-search")])
        .wrap_err("load search settings")?;
    let backend = HttpBackend::new(settings.base_url()?, settings.request_timeout())
        .wrap_err("build HTTP client")?;
    let ports = http_search_ports(&backend);

    match args.command {
        Command::Search {
            text,
            scope,
            category,
            difficulty,
            genre,
            sort_by,
            sort_order,
            more,
        } => {
            let filters = FilterSet::from_pairs(
                [
                    ("category", category),
                    ("difficulty", difficulty),
                    ("genre", genre),
                    ("sortBy", sort_by),
                    ("sortOrder", sort_order),
                ]
                .iter()
                .filter_map(|(name, value)| value.as_deref().map(|value| (*name, value))),
            );
            let dispatcher = SearchDispatcher::new(ports.domains, settings.dispatcher_config());
            let query = SearchQuery::new(text).with_scope(scope).with_filters(filters);
            let mut result = dispatcher.perform_search(query, true).await?;
            for domain in more {
                if let Some(next) = dispatcher.load_more(domain).await? {
                    result = next;
                }
            }
            print_json(&result)
        }
        Command::Suggest { text } => {
            let engine = SuggestionEngine::new(
                ports.suggestions,
                Arc::clone(ports.domains.get(SearchDomain::Catalog)),
                Arc::clone(ports.domains.get(SearchDomain::Posts)),
                settings.suggestion_config(),
            );
            let suggestions = match engine.on_input(&text).await {
                SuggestionOutcome::Resolved(suggestions) => suggestions,
                SuggestionOutcome::Cleared | SuggestionOutcome::Superseded => Vec::new(),
            };
            print_json(&suggestions)
        }
        Command::Facets => {
            let registry = FacetRegistry::new(ports.facets);
            print_json(registry.load().await)
        }
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).wrap_err("render JSON")?;
    println!("{rendered}");
    Ok(())
}
