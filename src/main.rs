use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use moviescout::adapter::{format_imdb_id, parse_imdb_id};
use moviescout::browse::{capped_pages, page_window, BrowseState, FilterChoice, StateChange};
use moviescout::config::Configuration;
use moviescout::genres;
use moviescout::http::HttpClient;
use moviescout::omdb::OmdbClient;
use moviescout::{FavoritesSort, FavoritesStore, Movie, MovieDetails, MovieId, MovieService, SearchPage};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "moviescout.yaml")]
    config: String,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search movies by title
    Search {
        query: Option<String>,
        #[arg(short, long)]
        page: Option<u32>,
        /// Release year, or "all"
        #[arg(short, long)]
        year: Option<String>,
        /// Genre id from `genres`, or "all"
        #[arg(short, long)]
        genre: Option<String>,
        /// Shareable state printed by an earlier search
        #[arg(long)]
        state: Option<String>,
    },
    /// Popular titles, one fixed term per page
    Trending {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Full record for a movie id (123 or tt0000123)
    Details { id: String },
    /// Genre filter choices
    Genres,
    /// Release year filter choices
    Years,
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    List {
        #[arg(long, value_enum, default_value_t = SortArg::Title)]
        sort: SortArg,
    },
    Add { id: String },
    Remove { id: String },
    Toggle { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Title,
    Rating,
}

impl From<SortArg> for FavoritesSort {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Title => FavoritesSort::Title,
            SortArg::Rating => FavoritesSort::Rating,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(&cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{}", error_line(&e));
        std::process::exit(1);
    }
}

fn error_line(error: &anyhow::Error) -> String {
    format!("error: {error:#}")
}

async fn run(cli: Cli) -> Result<()> {
    let config = Configuration::load(&cli.config)?;
    debug!("Configuration loaded from: {}", cli.config);

    let output = Output { json: cli.json };

    match cli.command {
        Command::Search {
            query,
            page,
            year,
            genre,
            state,
        } => {
            let state = browse_state(query, page, year, genre, state.as_deref())?;
            let service = build_service(&config)?;
            let results = service
                .search(&state.query, state.current_page(), state.year, state.genre)
                .await?;
            output.page(&results, &display_favorites(&config), Some(&state))?;
        }
        Command::Trending { page } => {
            let service = build_service(&config)?;
            let results = service.trending(page).await?;
            output.page(&results, &display_favorites(&config), None)?;
        }
        Command::Details { id } => {
            let service = build_service(&config)?;
            let details = service.details(movie_id(&id)?).await?;
            let favorite = display_favorites(&config).is_favorite(details.movie.id);
            output.details(&details, favorite)?;
        }
        Command::Genres => {
            let genres = genres::all_genres();
            if output.json {
                output.emit(&genres)?;
            } else {
                for genre in genres {
                    println!("{:>6}  {}", genre.id, genre.name);
                }
            }
        }
        Command::Years => {
            let years = genres::year_range(genres::current_year());
            if output.json {
                output.emit(&years)?;
            } else {
                for year in years {
                    println!("{year}");
                }
            }
        }
        Command::Favorites { action } => {
            let mut favorites = load_favorites(&config)?;
            run_favorites(action, &config, &mut favorites, &output).await?;
        }
    }

    Ok(())
}

async fn run_favorites(
    action: FavoritesAction,
    config: &Configuration,
    favorites: &mut FavoritesStore,
    output: &Output,
) -> Result<()> {
    match action {
        FavoritesAction::List { sort } => {
            let movies = favorites.sorted(sort.into());
            if output.json {
                return output.emit(&movies);
            }
            if movies.is_empty() {
                println!("No favorites yet");
            }
            for movie in movies {
                println!("{}", movie_line(movie, true));
            }
            return Ok(());
        }
        FavoritesAction::Add { id } => {
            let movie = fetch_movie(config, movie_id(&id)?).await?;
            let title = movie.title.clone();
            report_added(&title, favorites.add(movie));
        }
        FavoritesAction::Remove { id } => {
            let id = movie_id(&id)?;
            match favorites.get(id) {
                Some(movie) => println!("Removed \"{}\" from favorites", movie.title),
                None => println!("{} is not a favorite", format_imdb_id(id)),
            }
            favorites.remove(id);
        }
        FavoritesAction::Toggle { id } => {
            let id = movie_id(&id)?;
            if favorites.is_favorite(id) {
                favorites.remove(id);
                println!("Removed {} from favorites", format_imdb_id(id));
            } else {
                let movie = fetch_movie(config, id).await?;
                let title = movie.title.clone();
            report_added(&title, favorites.add(movie));
            }
        }
    }

    match config.favorites_path() {
        Some(path) => favorites.save(path)?,
        None => warn!("favorites.path is not configured; changes last only for this run"),
    }
    Ok(())
}

fn report_added(title: &str, stored: bool) {
    if stored {
        println!("Added \"{title}\" to favorites");
    } else {
        println!("\"{title}\" has no movie id and was not added");
    }
}

fn load_favorites(config: &Configuration) -> Result<FavoritesStore> {
    match config.favorites_path() {
        Some(path) => Ok(FavoritesStore::load(path)?),
        None => Ok(FavoritesStore::new()),
    }
}

/// Favorites used only to mark listed movies; an unreadable file just means
/// nothing is marked.
fn display_favorites(config: &Configuration) -> FavoritesStore {
    load_favorites(config).unwrap_or_else(|e| {
        warn!("Ignoring favorites: {:#}", e);
        FavoritesStore::new()
    })
}

fn build_service(config: &Configuration) -> Result<MovieService<OmdbClient>> {
    let http = HttpClient::new(&config.http)?;
    let client = OmdbClient::new(http, &config.omdb)?;
    Ok(MovieService::new(client))
}

async fn fetch_movie(config: &Configuration, id: MovieId) -> Result<Movie> {
    let service = build_service(config)?;
    Ok(service.details(id).await?.movie)
}

fn movie_id(raw: &str) -> Result<MovieId> {
    match parse_imdb_id(raw) {
        0 => bail!("'{}' is not a movie id", raw),
        id => Ok(id),
    }
}

fn browse_state(
    query: Option<String>,
    page: Option<u32>,
    year: Option<String>,
    genre: Option<String>,
    shared: Option<&str>,
) -> Result<BrowseState> {
    let mut state = shared.map(BrowseState::from_query_string).unwrap_or_default();
    if let Some(query) = query {
        state = state.apply(StateChange::Query(query));
    }
    if let Some(year) = year {
        let year = FilterChoice::<i32>::parse(&year)
            .with_context(|| format!("invalid year '{year}'"))?;
        state = state.apply(StateChange::Year(year.into_option()));
    }
    if let Some(genre) = genre {
        let genre = FilterChoice::<u32>::parse(&genre)
            .with_context(|| format!("invalid genre '{genre}'"))?;
        state = state.apply(StateChange::Genre(genre.into_option()));
    }
    if let Some(page) = page {
        state = state.apply(StateChange::Page(page));
    }
    if state.query.trim().is_empty() {
        bail!("nothing to search for: pass a query or --state");
    }
    info!("Browse state: {}", state.to_query_string());
    Ok(state)
}

struct Output {
    json: bool,
}

impl Output {
    fn emit<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn page(
        &self,
        page: &SearchPage,
        favorites: &FavoritesStore,
        state: Option<&BrowseState>,
    ) -> Result<()> {
        if self.json {
            return self.emit(page);
        }
        if page.results.is_empty() {
            println!("No results found");
        }
        for movie in &page.results {
            println!("{}", movie_line(movie, favorites.is_favorite(movie.id)));
        }

        let total_pages = capped_pages(page.total_pages);
        if total_pages > 1 {
            let window: Vec<String> = page_window(page.page, total_pages)
                .iter()
                .map(|n| if *n == page.page { format!("[{n}]") } else { n.to_string() })
                .collect();
            println!(
                "page {} of {} ({} results): {}",
                page.page,
                total_pages,
                page.total_results,
                window.join(" ")
            );
        }
        if let Some(state) = state {
            println!("share: {}", state.to_query_string());
        }
        Ok(())
    }

    fn details(&self, details: &MovieDetails, favorite: bool) -> Result<()> {
        if self.json {
            return self.emit(details);
        }
        let movie = &details.movie;
        println!("{}", movie_line(movie, favorite));
        if let Some(runtime) = movie.runtime_label() {
            println!("Runtime:  {runtime}");
        }
        if !movie.release_date.is_empty() {
            println!("Released: {}", movie.release_date);
        }
        if !movie.genres.is_empty() {
            let names: Vec<_> = movie.genres.iter().map(|g| g.name.as_str()).collect();
            println!("Genres:   {}", names.join(", "));
        }
        if movie.vote_count > 0 {
            println!("Votes:    {}", movie.vote_count);
        }
        if let Some(poster) = &movie.poster_path {
            println!("Poster:   {poster}");
        }
        if !movie.overview.is_empty() {
            println!("\n{}", movie.overview);
        }
        if !details.cast.is_empty() {
            println!("\nCast:");
            for member in details.cast.iter().take(20) {
                println!("  {} as {}", member.name, member.character);
            }
        }
        Ok(())
    }
}

fn movie_line(movie: &Movie, favorite: bool) -> String {
    let year = movie
        .release_year()
        .map_or_else(|| "Unknown".to_string(), |y| y.to_string());
    let rating = movie
        .display_rating()
        .map_or_else(|| "N/A".to_string(), |r| format!("{r:.1}"));
    format!(
        "{} {}  {} ({})  {}",
        if favorite { "*" } else { " " },
        format_imdb_id(movie.id),
        movie.title,
        year,
        rating
    )
}
