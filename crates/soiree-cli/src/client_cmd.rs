//! CLI handlers for `soiree client` subcommands.

use anyhow::Result;

use soiree_core::entity::Client;
use soiree_core::service::ClientService;
use soiree_core::storage::AdapterFactory;

use crate::ClientCommands;

/// Dispatch a `ClientCommands` variant to the appropriate handler.
pub async fn run_client_command(command: ClientCommands, factory: &AdapterFactory) -> Result<()> {
    let service = ClientService::new(factory)?;

    match command {
        ClientCommands::Add {
            name,
            email,
            phone,
            address,
        } => cmd_add(&service, name, email, phone, address).await,
        ClientCommands::List => cmd_list(&service).await,
        ClientCommands::Deactivate { id } => cmd_deactivate(&service, &id).await,
    }
}

async fn cmd_add(
    service: &ClientService,
    name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
) -> Result<()> {
    let mut client = Client::new(name, email);
    client.phone = phone;
    client.address = address;

    let stored = service.create(client).await?;

    println!("Client created.");
    println!("  ID:    {}", stored.id);
    println!("  Name:  {}", stored.name);
    println!("  Email: {}", stored.email);

    Ok(())
}

async fn cmd_list(service: &ClientService) -> Result<()> {
    let clients = service.list().await?;
    if clients.is_empty() {
        println!("No clients found. Use `soiree client add <name>` to create one.");
        return Ok(());
    }

    let id_w = 36;
    let name_w = clients.iter().map(|c| c.name.len()).max().unwrap_or(4).max(4);

    println!("{:<id_w$}  {:<name_w$}  {:<30}  {}", "ID", "NAME", "EMAIL", "ACTIVE");
    for c in &clients {
        println!(
            "{:<id_w$}  {:<name_w$}  {:<30}  {}",
            c.id, c.name, c.email, c.is_active
        );
    }

    Ok(())
}

async fn cmd_deactivate(service: &ClientService, id: &str) -> Result<()> {
    let client = service.deactivate(id).await?;
    println!(
        "Client {} ({}) deactivated. The record is kept for event history.",
        client.name, client.id
    );
    Ok(())
}
