//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CONFIG_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { tenant, force } => init_config(&tenant, force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.warn("No config file found; showing defaults"),
    }

    let api = &ctx.config.api;
    ctx.output.info("[api]");
    ctx.output.kv("base_url", &api.base_url);
    ctx.output.kv(
        "tenant_id",
        if api.tenant_id.is_empty() {
            "(not set)"
        } else {
            api.tenant_id.as_str()
        },
    );
    ctx.output.kv("database", &api.database);
    ctx.output.kv("timeout_secs", &api.timeout_secs.to_string());

    let pricing = &ctx.config.pricing;
    ctx.output.info("[pricing]");
    ctx.output.kv("currency", &pricing.currency);
    ctx.output
        .kv("shipping_flat_rate", &pricing.shipping_flat_rate.to_string());
    ctx.output.kv("tax_rate", &pricing.tax_rate.to_string());
    ctx.output.kv(
        "charge_shipping_on_empty_cart",
        &pricing.charge_shipping_on_empty_cart.to_string(),
    );

    ctx.output.info("[orders]");
    ctx.output.kv(
        "status_transitions",
        &format!("{:?}", ctx.config.orders.status_transitions).to_lowercase(),
    );

    ctx.output.info("[logging]");
    ctx.output.kv("level", &ctx.config.logging.level);
    ctx.output.kv(
        "format",
        &format!("{:?}", ctx.config.logging.format).to_lowercase(),
    );

    Ok(())
}

async fn init_config(tenant: &str, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config(tenant))?;
    ctx.output.success(&format!("Created: {}", config_path.display()));

    if tenant.is_empty() {
        ctx.output
            .warn("api.tenant_id is empty; set it before running remote commands");
    }

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let report = ctx.config.check();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "valid": report.errors.is_empty(),
            "errors": report.errors,
            "warnings": report.warnings,
        }));
    }

    if report.errors.is_empty() && report.warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &report.errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &report.warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !report.errors.is_empty() {
        bail!("Configuration has {} error(s)", report.errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}
