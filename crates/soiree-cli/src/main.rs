mod client_cmd;
mod event_cmd;
mod plan_cmd;
mod settings_cmd;
mod template_cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};

use soiree_core::entity::{CalendarEvent, Client, ContractTemplate, Entity, Plan};
use soiree_core::runtime::{ApiMode, RuntimeSettings, StoragePreference, settings_path};
use soiree_core::storage::AdapterFactory;
use soiree_db::config::DbConfig;
use soiree_db::{Collection, pool};

#[derive(Parser)]
#[command(name = "soiree", about = "Business management for event planners")]
struct Cli {
    /// Database URL (overrides SOIREE_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default settings file (no database required)
    Init {
        /// Overwrite existing settings file
        #[arg(long)]
        force: bool,
    },
    /// Create the database and provision all collections
    DbInit,
    /// Show or change runtime settings (changes take effect on the next run)
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Subscription plan management
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Client management
    Client {
        #[command(subcommand)]
        command: ClientCommands,
    },
    /// Calendar event management
    Event {
        #[command(subcommand)]
        command: EventCommands,
    },
    /// Contract template management
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show the settings this process is running with
    Show,
    /// Set the default storage backend: local or managed-db
    SetStorage {
        /// Backend kind: local or managed-db
        kind: StoragePreference,
    },
    /// Set the API access mode: direct or rest
    SetApi {
        /// Access mode: direct or rest
        mode: ApiMode,
        /// REST base URL (e.g. https://api.example.com/v1)
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Add a subscription plan
    Add {
        /// Plan name
        name: String,
        /// Human-readable description
        #[arg(long, default_value = "")]
        description: String,
        /// Price in cents
        #[arg(long)]
        price_cents: i64,
        /// Billing interval: monthly, yearly or one_off
        #[arg(long, default_value = "monthly")]
        interval: String,
        /// Comma-separated feature list
        #[arg(long)]
        features: Option<String>,
    },
    /// List all plans
    List,
    /// List plans visible on the pricing page (active, not archived)
    Active,
    /// Activate a plan
    Activate { id: String },
    /// Deactivate a plan without archiving it
    Deactivate { id: String },
    /// Archive a plan (kept in storage, hidden everywhere)
    Archive { id: String },
}

#[derive(Subcommand)]
pub enum ClientCommands {
    /// Add a client
    Add {
        /// Client name
        name: String,
        /// Contact email
        #[arg(long)]
        email: String,
        /// Contact phone
        #[arg(long)]
        phone: Option<String>,
        /// Postal address
        #[arg(long)]
        address: Option<String>,
    },
    /// List all clients
    List,
    /// Deactivate a client (record is kept)
    Deactivate { id: String },
}

#[derive(Subcommand)]
pub enum EventCommands {
    /// Add a calendar event
    Add {
        /// Event title
        title: String,
        /// Start time, RFC 3339 (e.g. 2026-09-12T18:00:00Z)
        #[arg(long)]
        starts_at: chrono::DateTime<chrono::Utc>,
        /// End time, RFC 3339
        #[arg(long)]
        ends_at: chrono::DateTime<chrono::Utc>,
        /// Client id this event belongs to
        #[arg(long)]
        client_id: Option<String>,
        /// Venue
        #[arg(long)]
        location: Option<String>,
    },
    /// List events, optionally within a time range
    List {
        /// Range start, RFC 3339
        #[arg(long)]
        from: Option<chrono::DateTime<chrono::Utc>>,
        /// Range end, RFC 3339
        #[arg(long)]
        to: Option<chrono::DateTime<chrono::Utc>>,
    },
    /// Confirm an event
    Confirm { id: String },
    /// Cancel an event (kept on the books)
    Cancel { id: String },
    /// Move an event to a new time slot
    Reschedule {
        id: String,
        /// New start time, RFC 3339
        #[arg(long)]
        starts_at: chrono::DateTime<chrono::Utc>,
        /// New end time, RFC 3339
        #[arg(long)]
        ends_at: chrono::DateTime<chrono::Utc>,
    },
}

#[derive(Subcommand)]
pub enum TemplateCommands {
    /// Add a contract template
    Add {
        /// Template name
        name: String,
        /// Path to a file holding the template body
        #[arg(long)]
        body_file: String,
    },
    /// List all templates
    List,
    /// Make a template the default for new contracts
    SetDefault { id: String },
    /// Archive a template (old contracts keep their source)
    Archive { id: String },
}

/// Execute `soiree init`: write a default settings file.
fn cmd_init(force: bool) -> Result<()> {
    let path = settings_path();

    if path.exists() && !force {
        anyhow::bail!(
            "settings file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let settings = RuntimeSettings::default();
    settings.save()?;

    println!("Settings written to {}", path.display());
    println!("  storage.kind = {}", settings.storage_kind());
    println!("  api.mode     = {}", settings.api_mode());
    println!("  api.base_url = {}", settings.api_base_url());
    println!();
    println!("Next: `soiree db-init` if you plan to use managed-db storage.");

    Ok(())
}

/// Execute `soiree db-init`: create the database and provision every
/// entity collection.
async fn cmd_db_init(cli_db_url: Option<&str>) -> Result<()> {
    let db_config = DbConfig::resolve(cli_db_url);

    println!("Initializing soiree database...");

    pool::ensure_database_exists(&db_config).await?;
    let db_pool = pool::create_pool(&db_config).await?;

    let collections: Vec<Collection> = [
        Plan::COLLECTION,
        Client::COLLECTION,
        CalendarEvent::COLLECTION,
        ContractTemplate::COLLECTION,
    ]
    .into_iter()
    .map(Collection::new)
    .collect::<Result<_, _>>()?;

    let counts = pool::provision_collections(&db_pool, &collections).await?;
    println!("Database ready. Collections:");
    for (collection, count) in &counts {
        println!("  {collection}: {count} records");
    }

    db_pool.close().await;

    println!("soiree db-init complete.");
    Ok(())
}


/// Build the adapter factory for this process from the settings snapshot.
///
/// A database pool is opened only when the settings actually route any
/// entity at the database (direct mode, managed-db storage).
async fn build_factory(cli_db_url: Option<&str>) -> Result<AdapterFactory> {
    let settings = RuntimeSettings::load_or_default();

    let needs_db = settings.api_mode() == ApiMode::Direct
        && settings.storage_kind() == StoragePreference::ManagedDb;
    let db_pool = if needs_db {
        Some(pool::create_pool(&DbConfig::resolve(cli_db_url)).await?)
    } else {
        None
    };

    Ok(AdapterFactory::new(settings, db_pool)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => {
            cmd_init(force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Settings { command } => {
            settings_cmd::run_settings_command(command)?;
        }
        Commands::Plan { command } => {
            let factory = build_factory(cli.database_url.as_deref()).await?;
            plan_cmd::run_plan_command(command, &factory).await?;
        }
        Commands::Client { command } => {
            let factory = build_factory(cli.database_url.as_deref()).await?;
            client_cmd::run_client_command(command, &factory).await?;
        }
        Commands::Event { command } => {
            let factory = build_factory(cli.database_url.as_deref()).await?;
            event_cmd::run_event_command(command, &factory).await?;
        }
        Commands::Template { command } => {
            let factory = build_factory(cli.database_url.as_deref()).await?;
            template_cmd::run_template_command(command, &factory).await?;
        }
    }

    Ok(())
}
