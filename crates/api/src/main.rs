//! scholarsync - personal academic workflow hub.
//!
//! Command-line entry point.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use scholarsync_lib::commands::schedule::{EventInput, PatchInput};
use scholarsync_lib::commands::{papers, schedule};
use scholarsync_lib::AppContext;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scholarsync", version)]
#[command(about = "Keep the schedule database, calendar and folder tree in step")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List schedule records, newest event first
    List {
        /// Only records with this status
        #[arg(long)]
        status: Option<String>,

        /// Only records in this category
        #[arg(long)]
        category: Option<String>,

        /// Earliest event date to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Latest event date to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Maximum number of records
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Find records whose name contains the query
    Search {
        query: String,

        /// Maximum number of records
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show one record in full
    Get { id: String },

    /// Add an event to the database and calendar, skipping duplicates
    Add {
        name: String,

        /// Start date or date-time, e.g. 2026-03-10 or "2026-03-10 09:00"
        #[arg(short, long)]
        start: String,

        /// End date or date-time
        #[arg(short, long)]
        end: Option<String>,

        #[arg(long)]
        place: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// May be repeated for multiple tags
        #[arg(long = "tag")]
        tags: Vec<String>,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        link: Option<String>,

        /// Abstract submission deadline (YYYY-MM-DD)
        #[arg(long)]
        abstract_deadline: Option<String>,

        /// Also create the conference folder
        #[arg(long)]
        folder: bool,
    },

    /// Update fields on an existing record in both backends
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        /// New start date or date-time
        #[arg(short, long)]
        start: Option<String>,

        /// New end date or date-time
        #[arg(short, long)]
        end: Option<String>,

        #[arg(long)]
        place: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// May be repeated; replaces the stored tag list
        #[arg(long = "tag")]
        tags: Option<Vec<String>>,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        link: Option<String>,

        /// Abstract submission deadline (YYYY-MM-DD)
        #[arg(long)]
        abstract_deadline: Option<String>,
    },

    /// Create the conference folder for an event
    Folder {
        name: String,

        /// Event start date (YYYY-MM-DD)
        date: String,
    },

    /// Push a JSON export of collected papers into the literature database
    PushPapers {
        /// Path to a JSON array of paper records
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logging comes up before dotenv so the load result is visible.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(err) => tracing::debug!(%err, "no .env file loaded"),
    }

    let cli = Cli::parse();
    let ctx = AppContext::new()?;

    match cli.command {
        Commands::List {
            status,
            category,
            from,
            to,
            limit,
        } => {
            let filter =
                schedule::filter_from_args(status, category, from.as_deref(), to.as_deref(), limit)?;
            print_json(&schedule::list(&ctx, filter).await?)
        }
        Commands::Search { query, limit } => {
            print_json(&schedule::search(&ctx, &query, limit).await?)
        }
        Commands::Get { id } => print_json(&schedule::get(&ctx, &id).await?),
        Commands::Add {
            name,
            start,
            end,
            place,
            notes,
            category,
            tags,
            status,
            link,
            abstract_deadline,
            folder,
        } => {
            let input = EventInput {
                name,
                start,
                end,
                place,
                notes,
                category,
                tags,
                status,
                link,
                abstract_deadline,
            };
            print_json(&schedule::add(&ctx, input, folder).await?)
        }
        Commands::Update {
            id,
            name,
            start,
            end,
            place,
            notes,
            category,
            tags,
            status,
            link,
            abstract_deadline,
        } => {
            let input = PatchInput {
                name,
                start,
                end,
                place,
                notes,
                category,
                tags,
                status,
                link,
                abstract_deadline,
            };
            print_json(&schedule::update(&ctx, &id, input).await?)
        }
        Commands::Folder { name, date } => {
            print_json(&schedule::create_folder(&ctx, &name, &date).await?)
        }
        Commands::PushPapers { file } => print_json(&papers::push_from_file(&ctx, &file).await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
