//! CLI handlers for `soiree event` subcommands.

use anyhow::Result;
use chrono::{DateTime, Utc};

use soiree_core::entity::CalendarEvent;
use soiree_core::service::EventService;
use soiree_core::storage::AdapterFactory;

use crate::EventCommands;

/// Dispatch an `EventCommands` variant to the appropriate handler.
pub async fn run_event_command(command: EventCommands, factory: &AdapterFactory) -> Result<()> {
    let service = EventService::new(factory)?;

    match command {
        EventCommands::Add {
            title,
            starts_at,
            ends_at,
            client_id,
            location,
        } => cmd_add(&service, title, starts_at, ends_at, client_id, location).await,
        EventCommands::List { from, to } => cmd_list(&service, from, to).await,
        EventCommands::Confirm { id } => cmd_confirm(&service, &id).await,
        EventCommands::Cancel { id } => cmd_cancel(&service, &id).await,
        EventCommands::Reschedule {
            id,
            starts_at,
            ends_at,
        } => cmd_reschedule(&service, &id, starts_at, ends_at).await,
    }
}

async fn cmd_add(
    service: &EventService,
    title: String,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    client_id: Option<String>,
    location: Option<String>,
) -> Result<()> {
    if ends_at <= starts_at {
        anyhow::bail!("an event must end after it starts");
    }

    let mut event = CalendarEvent::new(title, starts_at, ends_at);
    event.client_id = client_id;
    event.location = location;

    let stored = service.create(event).await?;

    println!("Event created.");
    println!("  ID:     {}", stored.id);
    println!("  Title:  {}", stored.title);
    println!("  Starts: {}", stored.starts_at.to_rfc3339());
    println!("  Ends:   {}", stored.ends_at.to_rfc3339());
    println!("  Status: {}", stored.status);

    Ok(())
}

async fn cmd_list(
    service: &EventService,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<()> {
    let events = match (from, to) {
        (Some(from), Some(to)) => service.events_between(from, to).await?,
        (None, None) => {
            let mut all = service.list().await?;
            all.sort_by_key(|e| e.starts_at);
            all
        }
        _ => anyhow::bail!("--from and --to must be given together"),
    };

    if events.is_empty() {
        println!("No events found.");
        return Ok(());
    }

    let id_w = 36;
    let title_w = events.iter().map(|e| e.title.len()).max().unwrap_or(5).max(5);

    println!(
        "{:<id_w$}  {:<title_w$}  {:<20}  {:<9}  {}",
        "ID", "TITLE", "STARTS", "STATUS", "LOCATION"
    );
    for e in &events {
        println!(
            "{:<id_w$}  {:<title_w$}  {:<20}  {:<9}  {}",
            e.id,
            e.title,
            e.starts_at.format("%Y-%m-%d %H:%M UTC"),
            e.status.to_string(),
            e.location.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

async fn cmd_confirm(service: &EventService, id: &str) -> Result<()> {
    let event = service.confirm(id).await?;
    println!("Event {} ({}) confirmed.", event.title, event.id);
    Ok(())
}

async fn cmd_cancel(service: &EventService, id: &str) -> Result<()> {
    let event = service.cancel(id).await?;
    println!("Event {} ({}) cancelled. The booking stays on record.", event.title, event.id);
    Ok(())
}

async fn cmd_reschedule(
    service: &EventService,
    id: &str,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> Result<()> {
    let event = service.reschedule(id, starts_at, ends_at).await?;
    println!(
        "Event {} ({}) moved to {} - {}.",
        event.title,
        event.id,
        event.starts_at.to_rfc3339(),
        event.ends_at.to_rfc3339()
    );
    Ok(())
}
