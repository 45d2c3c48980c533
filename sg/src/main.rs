//! SkinGen - density-specific UI skin generator
//!
//! CLI entry point.

use std::path::PathBuf;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use skingen::cli::{Cli, Command, Selection};
use skingen::config::{Config, LOCAL_CONFIG};
use skingen::{ConsoleSink, SkinGenerator};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > WARN, so progress output stays readable
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", s);
                tracing::Level::WARN
            }
        },
        None => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    debug!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Init { path, force }) => cmd_init(path.unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG)), force),
        None => cmd_generate(&load_config(cli.config.as_ref(), cli.dir)?, &Selection::default(), false),
        Some(Command::Generate { selection, strict }) => {
            cmd_generate(&load_config(cli.config.as_ref(), cli.dir)?, &selection, strict)
        }
        Some(Command::Check { selection, strict }) => cmd_check(&load_config(cli.config.as_ref(), cli.dir)?, &selection, strict),
        Some(Command::List) => cmd_list(&load_config(cli.config.as_ref(), cli.dir)?),
        Some(Command::Clean { selection }) => cmd_clean(&load_config(cli.config.as_ref(), cli.dir)?, &selection),
    }
}

fn load_config(path: Option<&PathBuf>, dir: Option<PathBuf>) -> Result<Config> {
    let mut config = Config::load(path).context("Failed to load configuration")?;
    if let Some(dir) = dir {
        config.dir = dir;
    }
    config.validate()?;

    info!(dir = %config.dir.display(), "skingen starting");
    Ok(config)
}

fn selected(config: &Config, selection: &Selection, strict: bool) -> Result<Config> {
    let mut config = config.select(&selection.skins, &selection.densities)?;
    config.strict |= strict;
    Ok(config)
}

fn cmd_generate(config: &Config, selection: &Selection, strict: bool) -> Result<()> {
    let config = selected(config, selection, strict)?;
    let report = SkinGenerator::from_config(&config).generate(&mut ConsoleSink)?;

    println!(
        "{} Generated {} files ({} placeholders)",
        "✓".green(),
        report.outputs.len(),
        report.occurrences()
    );
    if report.unknown() > 0 {
        println!(
            "{} {} unknown values replaced with the default",
            "!".yellow(),
            report.unknown()
        );
    }
    Ok(())
}

fn cmd_check(config: &Config, selection: &Selection, strict: bool) -> Result<()> {
    let config = selected(config, selection, strict)?;
    let results = SkinGenerator::from_config(&config).check(&mut skingen::TracingSink)?;

    for result in &results {
        let status = if result.report.unknown > 0 { "!".yellow() } else { "✓".green() };
        println!(
            "{} {}{}: {} placeholders, {} unknown",
            status,
            result.skin.cyan(),
            result.suffix,
            result.report.occurrences,
            result.report.unknown
        );
    }
    Ok(())
}

fn cmd_list(config: &Config) -> Result<()> {
    let generator = SkinGenerator::from_config(config);

    println!("Directory: {}", config.dir.display().to_string().cyan());
    println!("Skins:");
    for skin in &config.skins {
        let template = generator.template_path(skin);
        let marker = if template.is_file() { "✓".green() } else { "✗".red() };
        println!("  {} {} ({})", marker, skin, template.display());
    }
    println!("Densities:");
    for bucket in &config.densities {
        println!("  {} x{}", bucket.suffix.yellow(), bucket.multiplier);
    }
    Ok(())
}

fn cmd_clean(config: &Config, selection: &Selection) -> Result<()> {
    let config = selected(config, selection, false)?;
    let removed = SkinGenerator::from_config(&config).clean(&mut ConsoleSink)?;
    if removed.is_empty() {
        println!("Nothing to clean");
    }
    Ok(())
}

fn cmd_init(path: PathBuf, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(eyre::eyre!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    Config::default().save(&path)?;
    println!("{} Wrote {}", "✓".green(), path.display());
    Ok(())
}
