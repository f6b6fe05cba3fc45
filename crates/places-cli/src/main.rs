use anyhow::Context;
use clap::Parser;
use places_core::{Config, Place};
use places_store::PlaceStore;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "places")]
#[command(version, about = "Inspect and poke at a places history store", long_about = None)]
struct Cli {
    /// Use this database file instead of <activity-root>/data/places.db
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print places as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Search uris and titles, most visited first
    Search {
        /// Substring to look for (empty matches everything)
        #[arg(default_value = "")]
        text: String,
    },
    /// Show the place stored for an exact uri
    Lookup { uri: String },
    /// Add a place unless one already exists for the uri
    Add {
        uri: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        bookmark: bool,
    },
    /// Record a visit, adding the place if it's new
    Visit {
        uri: String,
        #[arg(long)]
        title: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging - helps when things go sideways
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "places=info,places_store=info,places_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("No command specified. Try --help");
        return Ok(());
    };

    match &cli.db {
        Some(path) => {
            let config = Config::load().context("Failed to load config")?;
            let store = PlaceStore::open(path, &config.store)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            run(&store, command, cli.json)
        }
        None => {
            let store = places_store::get_store().context("Failed to open place store")?;
            let store = store
                .lock()
                .map_err(|_| anyhow::anyhow!("Place store lock poisoned"))?;
            run(&store, command, cli.json)
        }
    }
}

fn run(store: &PlaceStore, command: Commands, json: bool) -> anyhow::Result<()> {
    match command {
        Commands::Search { text } => {
            tracing::info!("Searching for: {}", text);
            let places = store.search(&text)?;
            if places.is_empty() {
                println!("No places match {:?}", text);
            }
            for place in &places {
                print_place(place, json)?;
            }
        }
        Commands::Lookup { uri } => match store.lookup_place(&uri)? {
            Some(place) => print_place(&place, json)?,
            None => println!("{} not found", uri),
        },
        Commands::Add {
            uri,
            title,
            bookmark,
        } => {
            if store.lookup_place(&uri)?.is_some() {
                println!("{} is already stored", uri);
                return Ok(());
            }

            let mut place = Place::new(uri);
            place.title = title;
            place.bookmark = bookmark;
            store.add_place(&place)?;
            print_place(&place, json)?;
        }
        Commands::Visit { uri, title } => {
            let place = match store.lookup_place(&uri)? {
                Some(mut place) => {
                    place.record_visit();
                    if title.is_some() {
                        place.title = title;
                    }
                    store.update_place(&place)?;
                    place
                }
                None => {
                    let mut place = Place::new(uri);
                    place.title = title;
                    place.record_visit();
                    store.add_place(&place)?;
                    place
                }
            };
            print_place(&place, json)?;
        }
    }

    Ok(())
}

fn print_place(place: &Place, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(place)?);
        return Ok(());
    }

    let marker = if place.bookmark { "*" } else { " " };
    println!(
        "{} {:>5}  {}  {}  {}",
        marker,
        place.visits,
        place.last_visit.format("%Y-%m-%d %H:%M"),
        place.uri,
        place.title.as_deref().unwrap_or("(untitled)"),
    );
    Ok(())
}
