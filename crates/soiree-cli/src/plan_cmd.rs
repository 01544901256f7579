//! CLI handlers for `soiree plan` subcommands.
//!
//! Implements:
//! - `soiree plan add <name> ...`     -- create a subscription plan
//! - `soiree plan list`               -- list all plans
//! - `soiree plan active`             -- list pricing-page plans
//! - `soiree plan activate <id>`      -- flip a plan on
//! - `soiree plan deactivate <id>`    -- flip a plan off
//! - `soiree plan archive <id>`       -- hide a plan permanently

use anyhow::{Context, Result};

use soiree_core::entity::{BillingInterval, Plan};
use soiree_core::service::PlanService;
use soiree_core::storage::AdapterFactory;

use crate::PlanCommands;

/// Dispatch a `PlanCommands` variant to the appropriate handler.
pub async fn run_plan_command(command: PlanCommands, factory: &AdapterFactory) -> Result<()> {
    let service = PlanService::new(factory)?;

    match command {
        PlanCommands::Add {
            name,
            description,
            price_cents,
            interval,
            features,
        } => cmd_add(&service, name, description, price_cents, &interval, features).await,
        PlanCommands::List => cmd_list(&service).await,
        PlanCommands::Active => cmd_active(&service).await,
        PlanCommands::Activate { id } => cmd_set_status(&service, &id, true).await,
        PlanCommands::Deactivate { id } => cmd_set_status(&service, &id, false).await,
        PlanCommands::Archive { id } => cmd_archive(&service, &id).await,
    }
}

async fn cmd_add(
    service: &PlanService,
    name: String,
    description: String,
    price_cents: i64,
    interval: &str,
    features: Option<String>,
) -> Result<()> {
    let billing_interval: BillingInterval = interval
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("use one of: monthly, yearly, one_off")?;

    let mut plan = Plan::new(name, description, price_cents, billing_interval);
    if let Some(features) = features {
        plan.features = features
            .split(',')
            .map(|f| f.trim().to_owned())
            .filter(|f| !f.is_empty())
            .collect();
    }

    let stored = service.create(plan).await?;

    println!("Plan created.");
    println!("  ID:       {}", stored.id);
    println!("  Name:     {}", stored.name);
    println!("  Price:    {}", format_price(stored.price_cents));
    println!("  Interval: {}", stored.billing_interval);
    if !stored.features.is_empty() {
        println!("  Features: {}", stored.features.join(", "));
    }

    Ok(())
}

async fn cmd_list(service: &PlanService) -> Result<()> {
    let plans = service.list().await?;
    if plans.is_empty() {
        println!("No plans found. Use `soiree plan add <name>` to create one.");
        return Ok(());
    }
    print_plan_table(&plans);
    Ok(())
}

async fn cmd_active(service: &PlanService) -> Result<()> {
    // Degrades to an empty list on storage failure, like the pricing page.
    let plans = service.active_plans().await;
    if plans.is_empty() {
        println!("No active plans.");
        return Ok(());
    }
    print_plan_table(&plans);
    Ok(())
}

async fn cmd_set_status(service: &PlanService, id: &str, is_active: bool) -> Result<()> {
    let plan = service.set_plan_status(id, is_active).await?;
    let verb = if is_active { "activated" } else { "deactivated" };
    println!("Plan {} ({}) {verb}.", plan.name, plan.id);
    Ok(())
}

async fn cmd_archive(service: &PlanService, id: &str) -> Result<()> {
    let plan = service.archive_plan(id).await?;
    println!("Plan {} ({}) archived. The record is kept in storage.", plan.name, plan.id);
    Ok(())
}

fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!("{sign}${}.{:02}", cents / 100, cents % 100)
}

fn print_plan_table(plans: &[Plan]) {
    let id_w = 36;
    let name_w = plans.iter().map(|p| p.name.len()).max().unwrap_or(4).max(4);

    println!(
        "{:<id_w$}  {:<name_w$}  {:>10}  {:<8}  {:<8}  {}",
        "ID", "NAME", "PRICE", "INTERVAL", "ACTIVE", "ARCHIVED"
    );
    for p in plans {
        println!(
            "{:<id_w$}  {:<name_w$}  {:>10}  {:<8}  {:<8}  {}",
            p.id,
            p.name,
            format_price(p.price_cents),
            p.billing_interval.to_string(),
            p.is_active,
            p.is_archived
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_formatting() {
        assert_eq!(format_price(9900), "$99.00");
        assert_eq!(format_price(5), "$0.05");
        assert_eq!(format_price(100), "$1.00");
        assert_eq!(format_price(0), "$0.00");
    }

    #[test]
    fn negative_prices_keep_their_sign() {
        // Credits and refund lines render below a dollar too.
        assert_eq!(format_price(-5), "-$0.05");
        assert_eq!(format_price(-9900), "-$99.00");
    }
}
