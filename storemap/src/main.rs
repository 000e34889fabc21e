//! storemap - mark stores on a map and find your way back to them.
//!
//! Each invocation is one short session: the persisted catalog is loaded,
//! a single command is applied, and any change is saved before exiting.
//! The map and the location service are terminal stand-ins (see
//! [`terminal`]); data lives in the directory chosen by [`config`].

use clap::{Parser, Subcommand};
use store_catalog::{
    AppError, Category, Coords, FileBlobStore, LoadPolicy, LocationError, LocationProvider,
    StoreForm, StoreId, StoreMap,
};

mod config;
mod terminal;

use terminal::{ConfiguredLocation, TerminalMap};

type App = StoreMap<FileBlobStore, TerminalMap<std::io::Stdout>>;

#[derive(Parser)]
#[command(name = "storemap", about = "Mark greengroceries and butchers on a map")]
struct Cli {
    /// Start from an empty catalog if the saved data cannot be read.
    #[arg(long, global = true)]
    discard_corrupt: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mark a new store.
    ///
    /// Uses `--lat/--lng` as the clicked map position, or asks the location
    /// service (`STOREMAP_LOCATION`) when they are omitted.
    Add {
        /// Store category: greengrocery or butcher.
        category: Category,
        #[arg(long)]
        title: String,
        #[arg(long)]
        address: String,
        /// Produce for a greengrocery, meats for a butcher.
        #[arg(long, default_value = "")]
        items: String,
        #[arg(long, requires = "lng", allow_hyphen_values = true, value_parser = finite)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_hyphen_values = true, value_parser = finite)]
        lng: Option<f64>,
    },
    /// List stores in the order they were added.
    List,
    /// Centre the map on a store.
    Select { id: String },
    /// Delete a store.
    Remove { id: String },
    /// Draw every store marker.
    Map,
    /// Delete all saved stores.
    Reset,
}

/// Range checks happen when the store is created; this only keeps `NaN`/`inf` out.
fn finite(value: &str) -> Result<f64, String> {
    let number: f64 = value.parse().map_err(|e| format!("{}", e))?;
    if number.is_finite() {
        Ok(number)
    } else {
        Err(format!("{} is not a finite number", value))
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("We are unable to get your position: {0}")]
    Location(#[from] LocationError),

    #[error("no store with id {0}")]
    UnknownStore(String),
}

async fn handle_add(
    app: &mut App,
    form: StoreForm,
    clicked: Option<Coords>,
) -> Result<(), CliError> {
    let coords = match clicked {
        Some(coords) => coords,
        None => ConfiguredLocation.current_position().await?,
    };
    app.map_clicked(coords);

    let store = app.submit(form)?;
    println!("{}", store_catalog::render::list_item(&store));
    Ok(())
}

fn handle_list(app: &App) {
    let items = app.list_items();
    if items.is_empty() {
        println!("No stores yet.");
        return;
    }
    for item in items {
        println!("{}", item);
    }
}

fn handle_select(app: &mut App, id: String) -> Result<(), CliError> {
    app.map_ready(TerminalMap::new(std::io::stdout()));
    match app.select(&StoreId::from(id.as_str())) {
        Some(_) => Ok(()),
        None => Err(CliError::UnknownStore(id)),
    }
}

fn handle_remove(app: &mut App, id: String) -> Result<(), CliError> {
    if app.delete(&StoreId::from(id.as_str()))? {
        println!("Store {} removed.", id);
    } else {
        println!("No store with id {}; nothing removed.", id);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let data_dir = config::get_data_dir();
    tracing::info!("Using data directory: {}", data_dir.display());

    let policy = if cli.discard_corrupt {
        LoadPolicy::DiscardCorrupt
    } else {
        LoadPolicy::Strict
    };
    let blobs = FileBlobStore::new(data_dir);
    let mut app: App = StoreMap::start(blobs, policy, config::get_map_zoom())?;

    match cli.command {
        Commands::Add {
            category,
            title,
            address,
            items,
            lat,
            lng,
        } => {
            let clicked = lat.zip(lng).map(|(lat, lng)| Coords::new(lat, lng));
            let form = StoreForm {
                title,
                address,
                kind: category.with_attribute(items),
            };
            handle_add(&mut app, form, clicked).await?;
        }
        Commands::List => handle_list(&app),
        Commands::Select { id } => handle_select(&mut app, id)?,
        Commands::Remove { id } => handle_remove(&mut app, id)?,
        Commands::Map => app.map_ready(TerminalMap::new(std::io::stdout())),
        Commands::Reset => {
            app.reset()?;
            println!("All stores deleted.");
        }
    }

    Ok(())
}
