//! kino - browse TMDB movies and keep local favourites.

/// Application configuration (TOML).
mod config;

use std::collections::HashMap;
use std::path::PathBuf;
use std::pin::pin;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use kino_api::tmdb::TmdbClient;
use kino_core::{Movie, MoviesRepository, Outcome, People};
use kino_db::FavouritesStore;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List movie genres.
    Genres,
    /// List movies of a genre.
    Movies(MoviesArgs),
    /// Show movie details.
    Movie(IdArgs),
    /// Show the cast and producer of a movie.
    Credits(IdArgs),
    /// Show recommendations for a movie.
    Suggestions(IdArgs),
    /// Search the catalog.
    Search(SearchCommand),
    /// Manage favourite movies.
    Fav(FavCommand),
    /// Show or change settings.
    Config(ConfigCommand),
}

/// Arguments for the `movies` subcommand.
#[derive(clap::Args)]
struct MoviesArgs {
    /// TMDB genre ID (e.g. "28").
    #[arg(long, required = true)]
    genre: String,
}

/// Arguments carrying a TMDB movie ID.
#[derive(clap::Args)]
struct IdArgs {
    /// TMDB movie ID (e.g. "436969").
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchCommand {
    /// Search subcommand to run.
    #[command(subcommand)]
    command: SearchSubcommands,
}

/// Available search subcommands.
#[derive(Subcommand)]
enum SearchSubcommands {
    /// Search movies by title.
    Movie(QueryArgs),
    /// Search people by name.
    People(QueryArgs),
    /// List movies featuring a person (query is a TMDB person ID).
    Actor(QueryArgs),
}

/// Arguments for the `search` subcommands.
#[derive(clap::Args)]
struct QueryArgs {
    /// Search query.
    #[arg(long, required = true)]
    query: String,
}

/// Arguments for the `fav` subcommand.
#[derive(clap::Args)]
struct FavCommand {
    /// Favourites subcommand to run.
    #[command(subcommand)]
    command: FavSubcommands,
}

/// Available favourites subcommands.
#[derive(Subcommand)]
enum FavSubcommands {
    /// Add or remove a movie from favourites.
    Toggle(IdArgs),
    /// List favourite movies.
    List(FavListArgs),
    /// Print favourite movies on every change until Ctrl-C.
    Watch,
}

/// Arguments for the `fav list` subcommand.
#[derive(clap::Args)]
struct FavListArgs {
    /// Also show when each favourite was added.
    #[arg(long)]
    verbose: bool,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the effective configuration.
    Show,
    /// Persist the TMDB response language.
    SetLanguage(SetLanguageArgs),
}

/// Arguments for the `config set-language` subcommand.
#[derive(clap::Args)]
struct SetLanguageArgs {
    /// Language tag (e.g. "es-ES").
    language: String,
}

/// Builds a `TmdbClient` from the `TMDB_API_TOKEN` environment variable
/// and the `[tmdb]` config section.
///
/// # Errors
///
/// Returns an error if `TMDB_API_TOKEN` is not set, the configured base URL
/// is invalid, or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN")
        .context("TMDB_API_TOKEN environment variable is required")?;

    let mut builder = TmdbClient::builder()
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .language(&config.tmdb.language);
    if let Some(base_url) = &config.tmdb.base_url {
        let url = Url::parse(base_url).with_context(|| format!("invalid base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }
    builder.build().context("failed to build TMDB client")
}

/// Builds the repository from config, environment, and the local database.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, the client fails to
/// build, or the favourites database cannot be opened.
fn build_repository(dir: Option<&PathBuf>) -> Result<MoviesRepository<TmdbClient>> {
    let config_path = resolve_config_path(dir)?;
    let config = AppConfig::load(&config_path)?;
    let client = build_tmdb_client(&config)?;
    let store = FavouritesStore::open(dir).context("failed to open favourites database")?;
    Ok(MoviesRepository::new(client, store))
}

/// Unwraps an outcome, turning a failure into an error naming `what`.
fn require<T>(outcome: Outcome<T>, what: &str) -> Result<T> {
    outcome
        .into_result()
        .with_context(|| format!("failed to load {what}"))
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| String::from("-"), |v| v.to_string())
}

fn log_movies(movies: &[Movie]) {
    tracing::info!("ID\tYear\tRating\tTitle");
    for movie in movies {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            movie.id,
            or_dash(movie.year()),
            or_dash(movie.rating.map(|r| format!("{r}%"))),
            movie.title,
        );
    }
    tracing::info!("Total: {} movies", movies.len());
}

fn log_people(people: &[People]) {
    tracing::info!("ID\tDepartment\tName\tKnownFor");
    for person in people {
        let known_for = person.known_for.as_ref().map(|movies| {
            movies
                .iter()
                .map(|m| m.title.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        });
        tracing::info!(
            "{}\t{:?}\t{}\t{}",
            person.id,
            person.department,
            person.name,
            or_dash(known_for),
        );
    }
    tracing::info!("Total: {} people", people.len());
}

/// Runs the `genres` subcommand.
///
/// # Errors
///
/// Returns an error if setup fails or the genres cannot be loaded.
#[instrument(skip_all)]
async fn run_genres(dir: Option<&PathBuf>) -> Result<()> {
    let repo = build_repository(dir)?;
    let genres = require(repo.genres().await, "genres")?;

    tracing::info!("ID\tName");
    for genre in &genres {
        tracing::info!("{}\t{}", genre.id, genre.name);
    }
    tracing::info!("Total: {} genres", genres.len());

    Ok(())
}

/// Runs the `movies` subcommand.
///
/// # Errors
///
/// Returns an error if setup fails or the movies cannot be loaded.
#[instrument(skip_all)]
async fn run_movies(args: &MoviesArgs, dir: Option<&PathBuf>) -> Result<()> {
    let repo = build_repository(dir)?;
    let movies = require(repo.movies_by_genre(&args.genre).await, "movies")?;
    log_movies(&movies);
    Ok(())
}

/// Runs the `movie` subcommand.
///
/// # Errors
///
/// Returns an error if setup fails or the movie cannot be loaded.
#[instrument(skip_all)]
async fn run_movie(args: &IdArgs, dir: Option<&PathBuf>) -> Result<()> {
    let repo = build_repository(dir)?;
    let movie = require(repo.movie_by_id(&args.id).await, "movie")?;
    let favourite = match pin!(repo.is_favourite(&args.id)).next().await {
        Some(outcome) => require(outcome, "favourite state")?,
        None => false,
    };

    tracing::info!("ID:         {}", movie.id);
    tracing::info!("Title:      {}", movie.title);
    tracing::info!("Released:   {}", or_dash(movie.release_date));
    tracing::info!("Runtime:    {}", or_dash(movie.runtime_minutes.map(|m| format!("{m} min"))));
    tracing::info!("Rating:     {}", or_dash(movie.rating.map(|r| format!("{r}%"))));
    tracing::info!("Genres:     {}", movie.genre_ids.join(","));
    tracing::info!("Poster:     {}", movie.poster_url);
    tracing::info!("Backdrop:   {}", movie.backdrop_url);
    tracing::info!("Favourite:  {}", if favourite { "yes" } else { "no" });
    tracing::info!("Overview:   {}", movie.overview);

    Ok(())
}

/// Runs the `credits` subcommand.
///
/// # Errors
///
/// Returns an error if setup fails or the credits cannot be loaded.
#[instrument(skip_all)]
async fn run_credits(args: &IdArgs, dir: Option<&PathBuf>) -> Result<()> {
    let repo = build_repository(dir)?;
    let credits = require(repo.credits(&args.id).await, "credits")?;

    tracing::info!("Producer: {} ({})", credits.producer.name, credits.producer.id);
    tracing::info!("ID\tActor\tCharacter");
    for character in &credits.characters {
        tracing::info!(
            "{}\t{}\t{}",
            character.actor.id,
            character.actor.name,
            character.character,
        );
    }
    tracing::info!("Total: {} characters", credits.characters.len());

    Ok(())
}

/// Runs the `suggestions` subcommand.
///
/// # Errors
///
/// Returns an error if setup fails or the suggestions cannot be loaded.
#[instrument(skip_all)]
async fn run_suggestions(args: &IdArgs, dir: Option<&PathBuf>) -> Result<()> {
    let repo = build_repository(dir)?;
    let movies = require(repo.suggestions(&args.id).await, "suggestions")?;
    log_movies(&movies);
    Ok(())
}

/// Runs the `search` subcommands.
///
/// # Errors
///
/// Returns an error if setup fails or the search fails.
#[instrument(skip_all)]
async fn run_search(command: &SearchSubcommands, dir: Option<&PathBuf>) -> Result<()> {
    let repo = build_repository(dir)?;
    match command {
        SearchSubcommands::Movie(args) => {
            let movies = require(repo.search_movie_by_name(&args.query).await, "movies")?;
            log_movies(&movies);
        }
        SearchSubcommands::People(args) => {
            let people = require(repo.search_people_by_name(&args.query).await, "people")?;
            log_people(&people);
        }
        SearchSubcommands::Actor(args) => {
            let movies = require(repo.search_movie_by_actor_id(&args.query).await, "movies")?;
            log_movies(&movies);
        }
    }
    Ok(())
}

/// Runs the `fav toggle` subcommand.
///
/// # Errors
///
/// Returns an error if setup fails or the database write fails.
#[instrument(skip_all)]
async fn run_fav_toggle(args: &IdArgs, dir: Option<&PathBuf>) -> Result<()> {
    let repo = build_repository(dir)?;
    let now_favourite = require(repo.toggle_favourite(&args.id).await, "favourite state")?;
    if now_favourite {
        tracing::info!("{} added to favourites", args.id);
    } else {
        tracing::info!("{} removed from favourites", args.id);
    }
    Ok(())
}

/// Runs the `fav list` subcommand.
///
/// # Errors
///
/// Returns an error if setup fails or any favourite cannot be loaded.
#[instrument(skip_all)]
async fn run_fav_list(args: &FavListArgs, dir: Option<&PathBuf>) -> Result<()> {
    let repo = build_repository(dir)?;
    let movies = match pin!(repo.favourites()).next().await {
        Some(outcome) => require(outcome, "favourites")?,
        None => Vec::new(),
    };

    if !args.verbose {
        log_movies(&movies);
        return Ok(());
    }

    let added: HashMap<String, String> = repo
        .store()
        .favourite_entries()
        .await
        .context("failed to load favourite timestamps")?
        .into_iter()
        .map(|entry| {
            let at = entry.updated_at.format("%Y-%m-%d %H:%M:%S").to_string();
            (entry.movie_id, at)
        })
        .collect();

    tracing::info!("ID\tAdded\t\t\tTitle");
    for movie in &movies {
        tracing::info!(
            "{}\t{}\t{}",
            movie.id,
            added.get(&movie.id).map_or("-", String::as_str),
            movie.title,
        );
    }
    tracing::info!("Total: {} movies", movies.len());

    Ok(())
}

/// Runs the `fav watch` subcommand until Ctrl-C.
///
/// Failures are reported and watching continues.
///
/// # Errors
///
/// Returns an error if setup fails.
#[instrument(skip_all)]
async fn run_fav_watch(dir: Option<&PathBuf>) -> Result<()> {
    let repo = build_repository(dir)?;
    let mut updates = pin!(repo.favourites());

    tracing::info!("Watching favourites. Press Ctrl-C to stop.");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            update = updates.next() => match update {
                Some(Outcome::Success(movies)) => log_movies(&movies),
                Some(Outcome::Failure(err)) => {
                    tracing::warn!("failed to load favourites: {err:#}");
                }
                None => break,
            },
        }
    }

    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded.
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    let config = AppConfig::load(&path)?;

    tracing::info!("Config:    {}", path.display());
    tracing::info!("Language:  {}", config.tmdb.language);
    tracing::info!(
        "Base URL:  {}",
        config
            .tmdb
            .base_url
            .as_deref()
            .unwrap_or(kino_api::tmdb::DEFAULT_BASE_URL)
    );

    Ok(())
}

/// Runs the `config set-language` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or saved.
fn run_config_set_language(args: &SetLanguageArgs, dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    let mut config = AppConfig::load(&path)?;
    config.tmdb.language.clone_from(&args.language);
    config.save(&path)?;

    tracing::info!("Language set to {} in {}", args.language, path.display());
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Genres => run_genres(dir).await,
        Commands::Movies(args) => run_movies(&args, dir).await,
        Commands::Movie(args) => run_movie(&args, dir).await,
        Commands::Credits(args) => run_credits(&args, dir).await,
        Commands::Suggestions(args) => run_suggestions(&args, dir).await,
        Commands::Search(search) => run_search(&search.command, dir).await,
        Commands::Fav(fav) => match fav.command {
            FavSubcommands::Toggle(args) => run_fav_toggle(&args, dir).await,
            FavSubcommands::List(args) => run_fav_list(&args, dir).await,
            FavSubcommands::Watch => run_fav_watch(dir).await,
        },
        Commands::Config(config) => match config.command {
            ConfigSubcommands::Show => run_config_show(dir),
            ConfigSubcommands::SetLanguage(args) => run_config_set_language(&args, dir),
        },
    }
}
