//! CLI handlers for `soiree template` subcommands.

use anyhow::{Context, Result};

use soiree_core::entity::ContractTemplate;
use soiree_core::service::TemplateService;
use soiree_core::storage::AdapterFactory;

use crate::TemplateCommands;

/// Dispatch a `TemplateCommands` variant to the appropriate handler.
pub async fn run_template_command(
    command: TemplateCommands,
    factory: &AdapterFactory,
) -> Result<()> {
    let service = TemplateService::new(factory)?;

    match command {
        TemplateCommands::Add { name, body_file } => cmd_add(&service, name, &body_file).await,
        TemplateCommands::List => cmd_list(&service).await,
        TemplateCommands::SetDefault { id } => cmd_set_default(&service, &id).await,
        TemplateCommands::Archive { id } => cmd_archive(&service, &id).await,
    }
}

async fn cmd_add(service: &TemplateService, name: String, body_file: &str) -> Result<()> {
    let body = std::fs::read_to_string(body_file)
        .with_context(|| format!("failed to read template body from {body_file}"))?;

    let stored = service.create(ContractTemplate::new(name, body)).await?;

    println!("Template created.");
    println!("  ID:   {}", stored.id);
    println!("  Name: {}", stored.name);
    println!("  Body: {} bytes", stored.body.len());

    Ok(())
}

async fn cmd_list(service: &TemplateService) -> Result<()> {
    let templates = service.list().await?;
    if templates.is_empty() {
        println!("No templates found. Use `soiree template add <name> --body-file <path>`.");
        return Ok(());
    }

    let id_w = 36;
    let name_w = templates.iter().map(|t| t.name.len()).max().unwrap_or(4).max(4);

    println!("{:<id_w$}  {:<name_w$}  {:<8}  {}", "ID", "NAME", "DEFAULT", "ARCHIVED");
    for t in &templates {
        println!(
            "{:<id_w$}  {:<name_w$}  {:<8}  {}",
            t.id, t.name, t.is_default, t.is_archived
        );
    }

    Ok(())
}

async fn cmd_set_default(service: &TemplateService, id: &str) -> Result<()> {
    let template = service.set_default(id).await?;
    println!(
        "Template {} ({}) is now the default for new contracts.",
        template.name, template.id
    );
    Ok(())
}

async fn cmd_archive(service: &TemplateService, id: &str) -> Result<()> {
    let template = service.archive_template(id).await?;
    println!(
        "Template {} ({}) archived. Existing contracts keep their source text.",
        template.name, template.id
    );
    Ok(())
}
