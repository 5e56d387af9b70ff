mod commands;
mod render;
mod utils;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use club_events_core::remote::HttpClient;
use club_events_core::{ClientConfig, EventId};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "club-events")]
#[command(about = "Browse and manage club events")]
struct Cli {
    /// Events API base URL (overrides config and CLUB_EVENTS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Show debug logs (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List events from the events service
    List,
    /// List events mirrored from Google Calendar
    Google {
        /// Calendar to read instead of the server default
        #[arg(long)]
        calendar: Option<String>,

        /// Maximum events per direction (past and upcoming)
        #[arg(long)]
        max: Option<u32>,

        /// Leave out past events
        #[arg(long)]
        no_past: bool,

        /// Leave out upcoming events
        #[arg(long)]
        no_upcoming: bool,
    },
    /// Show one event, looking in Google Calendar first
    Show { id: String },
    /// Create an event
    New(NewArgs),
    /// Change fields of an event
    Update(UpdateArgs),
    /// Delete an event
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// List RSVPs for an event
    Rsvps { id: String },
    /// Check that the API is reachable
    Health,
}

#[derive(Args)]
pub struct NewArgs {
    pub title: String,

    /// Day of the event (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: NaiveDate,

    /// Start time (HH:MM)
    #[arg(short, long)]
    pub start: String,

    /// End time (HH:MM)
    #[arg(short, long)]
    pub end: String,

    /// End day, if different from the start day (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(short, long)]
    pub location: Option<String>,

    #[arg(long)]
    pub meeting_link: Option<String>,

    #[arg(long)]
    pub slides_url: Option<String>,
}

#[derive(Args)]
pub struct UpdateArgs {
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(short, long)]
    pub location: Option<String>,

    /// New start day (YYYY-MM-DD), used with --start-time
    #[arg(long, requires = "start_time")]
    pub start_date: Option<NaiveDate>,

    /// New start time (HH:MM), used with --start-date
    #[arg(long, requires = "start_date")]
    pub start_time: Option<String>,

    /// New end day (YYYY-MM-DD), used with --end-time
    #[arg(long, requires = "end_time")]
    pub end_date: Option<NaiveDate>,

    /// New end time (HH:MM), used with --end-date
    #[arg(long, requires = "end_date")]
    pub end_time: Option<String>,

    #[arg(long)]
    pub meeting_link: Option<String>,

    #[arg(long)]
    pub slides_url: Option<String>,

    #[arg(long)]
    pub recording_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut config = ClientConfig::load()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    let client = HttpClient::new(&config)?;

    match cli.command {
        Commands::List => commands::list::run(client).await,
        Commands::Google {
            calendar,
            max,
            no_past,
            no_upcoming,
        } => {
            let calendar = calendar.or(config.calendar_id);
            commands::google::run(client, calendar, max, !no_past, !no_upcoming).await
        }
        Commands::Show { id } => commands::show::run(client, EventId::new(id)).await,
        Commands::New(args) => commands::new::run(client, args).await,
        Commands::Update(args) => commands::update::run(client, args).await,
        Commands::Delete { id, force } => commands::delete::run(client, EventId::new(id), force).await,
        Commands::Rsvps { id } => commands::rsvps::run(client, EventId::new(id)).await,
        Commands::Health => commands::health::run(client).await,
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
