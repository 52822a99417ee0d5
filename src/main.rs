use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use travelmagic::config::TravelMagicConfig;
use travelmagic::{
    AppState, BudgetTier, Season, TravelMagicError, TripPreview, TripRequest, export, telemetry,
    web,
};

#[derive(Debug, Parser)]
#[command(name = "travelmagic", version)]
#[command(about = "Weather-aware travel itinerary planner")]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan a trip and print the itinerary
    Plan(PlanArgs),
    /// Manage saved itineraries
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
    /// Build a slideshow plan from an exported itinerary
    Preview {
        /// Exported itinerary JSON file
        file: PathBuf,
        /// Seed for search query descriptors
        #[arg(long)]
        seed: Option<u64>,
        /// Print the preview as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the JSON API server
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Debug, clap::Args)]
struct PlanArgs {
    /// Destination, e.g. "Lisbon, Portugal"
    destination: String,

    /// First day of the trip (YYYY-MM-DD)
    #[arg(long)]
    start: NaiveDate,

    /// Departure day, exclusive (YYYY-MM-DD)
    #[arg(long)]
    end: NaiveDate,

    /// budget, medium or luxury
    #[arg(short, long, default_value = "medium")]
    budget: BudgetTier,

    /// Trip purpose, e.g. "Family vacation"
    #[arg(long, default_value = "")]
    purpose: String,

    /// Interest to plan around; repeat for several
    #[arg(short = 'p', long = "preference")]
    preferences: Vec<String>,

    /// Override the season derived from the start date
    #[arg(long)]
    season: Option<Season>,

    /// Special requests kept with a saved itinerary
    #[arg(long, default_value = "")]
    notes: String,

    /// Skip the weather lookup and use seasonal placeholders
    #[arg(long)]
    no_weather: bool,

    /// Seed for reproducible template itineraries
    #[arg(long)]
    seed: Option<u64>,

    /// Write the export JSON into this directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Save the itinerary to the local store
    #[arg(long)]
    save: bool,

    /// Print the itinerary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum SavedAction {
    /// List saved itineraries
    List,
    /// Print one saved itinerary
    Show { id: String },
    /// Delete a saved itinerary
    Delete { id: String },
    /// Write a saved itinerary as export JSON
    Export {
        id: String,
        /// Target directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<TravelMagicError>() {
                Some(known) => eprintln!("Error: {}", known.user_message()),
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = TravelMagicConfig::load_from_path(cli.config.clone())?;
    telemetry::init(&config.logging, cli.verbose)?;

    match cli.command {
        Some(Command::Plan(args)) => plan(&mut config, args).await,
        Some(Command::Saved { action }) => saved(&config, action).await,
        Some(Command::Preview { file, seed, json }) => preview(&config, &file, seed, json),
        Some(Command::Serve { port }) => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let state = AppState::from_config(&config)?;
            web::run(&config.server, state).await
        }
        None => {
            print_hints(&config, cli.config.as_ref());
            Ok(())
        }
    }
}

async fn plan(config: &mut TravelMagicConfig, args: PlanArgs) -> Result<()> {
    if args.no_weather {
        config.weather.enabled = false;
    }
    if args.seed.is_some() {
        config.planner.seed = args.seed;
    }

    let mut request = TripRequest::new(args.destination, args.start, args.end)
        .with_budget(args.budget)
        .with_preferences(args.preferences)
        .with_purpose(args.purpose);
    request.season = args.season;
    request.special_notes = args.notes;
    request.validate(config.planner.max_trip_days)?;

    let state = AppState::from_config(config)?;
    let planned = state
        .planner
        .plan(&state.weather, &request, Utc::now().date_naive())
        .await;
    info!(source = planned.source.as_str(), "Planned trip");

    if args.json {
        println!("{}", export::to_json(&planned.itinerary)?);
    } else {
        print!("{}", planned.itinerary);
    }

    if let Some(dir) = &args.output {
        let path = export::write(&planned.itinerary, dir)?;
        eprintln!("Exported to {}", path.display());
    }
    if args.save {
        let saved = state
            .store
            .save(&request, planned.itinerary, planned.weather)
            .await?;
        eprintln!("Saved as {}", saved.id);
    }
    Ok(())
}

async fn saved(config: &TravelMagicConfig, action: SavedAction) -> Result<()> {
    let state = AppState::from_config(config)?;
    let store = &state.store;

    match action {
        SavedAction::List => {
            let saved = store.list().await?;
            if saved.is_empty() {
                println!("No saved itineraries yet. Plan one with `travelmagic plan --save`.");
            }
            for record in &saved {
                println!("{}", record.summary_line());
            }
        }
        SavedAction::Show { id } => {
            let record = store.fetch(&id).await?;
            println!("{}", record.name);
            if !record.special_notes.is_empty() {
                println!("Notes: {}", record.special_notes);
            }
            println!();
            print!("{}", record.itinerary);
        }
        SavedAction::Delete { id } => {
            if !store.delete(&id).await? {
                let missing = TravelMagicError::not_found(format!("No saved itinerary with id {id}"));
                return Err(missing.into());
            }
            println!("Deleted {id}");
        }
        SavedAction::Export { id, output } => {
            let record = store.fetch(&id).await?;
            let path = export::write(&record.itinerary, &output)?;
            println!("Exported to {}", path.display());
        }
    }
    Ok(())
}

fn preview(config: &TravelMagicConfig, file: &Path, seed: Option<u64>, json: bool) -> Result<()> {
    let itinerary = export::read(file)?;
    let mut rng = match seed.or(config.planner.seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let preview = TripPreview::build(&itinerary, &mut rng);

    if json {
        let text = serde_json::to_string_pretty(&preview).context("Failed to serialize preview")?;
        println!("{text}");
        return Ok(());
    }

    println!("✨ {}", preview.destination);
    if !preview.summary.is_empty() {
        println!("{}", preview.summary);
    }
    println!("{}", preview.weather_outlook);
    println!("\nHighlights:");
    for highlight in &preview.highlights {
        println!("  Day {} {}: {}", highlight.day, highlight.period.as_str(), highlight.title);
    }
    println!("\nSlides:");
    for slide in &preview.slides {
        println!(
            "  [{}] Day {} {} - {}  (search: \"{}\")",
            slide.seed,
            slide.day,
            slide.period.as_str(),
            slide.caption,
            slide.search_query
        );
    }
    Ok(())
}

fn print_hints(config: &TravelMagicConfig, config_arg: Option<&PathBuf>) {
    let config_path = config_arg
        .cloned()
        .or_else(TravelMagicConfig::get_config_path)
        .map_or_else(|| "config.toml".to_string(), |p| p.display().to_string());

    println!("travelmagic {}", travelmagic::VERSION);
    println!();
    println!("Configuration file: {config_path}");
    println!("Storage directory:  {}", config.storage_path().display());
    println!(
        "Weather lookups:    {}",
        if config.weather.enabled { "enabled (OpenMeteo)" } else { "disabled" }
    );
    println!(
        "Language model:     {}",
        if config.llm.enabled {
            config.llm.model.as_str()
        } else {
            "disabled (template itineraries)"
        }
    );
    println!();
    println!("Environment overrides use the TRAVELMAGIC_ prefix, e.g.");
    println!("  TRAVELMAGIC_LLM__ENABLED=true TRAVELMAGIC_LLM__API_KEY=sk-...");
    println!();
    println!("Try: travelmagic plan \"Lisbon, Portugal\" --start 2026-06-01 --end 2026-06-05 -p food");
    println!("Run `travelmagic --help` for all commands.");
}
