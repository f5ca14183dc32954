//! Command-line interface for formfill.
//!
//! Provides commands for mapping a fields file against a CV record,
//! inspecting a domain's learned state, and moving learned data around.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::core::{generate_mapping, generate_mapping_for_domain};
use crate::domain::{FieldDescriptor, LearnedExport};
use crate::learning::LearningEngine;
use crate::store::MappingStore;

/// formfill - Form-field classification and CV autofill mapping engine
#[derive(Parser, Debug)]
#[command(name = "formfill")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Map form fields against a CV record
    Map {
        /// Path to the parsed CV record (JSON)
        #[arg(short, long)]
        record: PathBuf,

        /// Path to the detected form fields (JSON array)
        #[arg(short, long)]
        fields: PathBuf,

        /// Web domain; enables learned mappings for this domain
        #[arg(short, long)]
        domain: Option<String>,
    },

    /// Show a domain's learned-mapping statistics
    Stats {
        /// Web domain
        domain: String,
    },

    /// Export a domain's learned mappings as JSON
    Export {
        /// Web domain
        domain: String,

        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import learned mappings from a JSON export
    Import {
        /// Export file produced by `formfill export`
        file: PathBuf,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Map {
                record,
                fields,
                domain,
            } => run_map(&record, &fields, domain.as_deref()),
            Commands::Stats { domain } => show_stats(&domain),
            Commands::Export { domain, output } => export_domain(&domain, output),
            Commands::Import { file } => import_file(&file),
            Commands::Config => show_config(),
        }
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn run_map(record_path: &Path, fields_path: &Path, domain: Option<&str>) -> Result<()> {
    let record = read_json(record_path)?;

    let fields_json = std::fs::read_to_string(fields_path)
        .with_context(|| format!("Failed to read {}", fields_path.display()))?;
    let fields: Vec<FieldDescriptor> = serde_json::from_str(&fields_json)
        .with_context(|| format!("Failed to parse {}", fields_path.display()))?;

    let report = if let Some(domain) = domain {
        let store = MappingStore::open_default().context("Failed to open mapping store")?;
        let engine = LearningEngine::new(store);
        generate_mapping_for_domain(&record, &fields, domain, &engine)
    } else {
        generate_mapping(&record, &fields)
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn show_stats(domain: &str) -> Result<()> {
    let store = MappingStore::open_default().context("Failed to open mapping store")?;
    let engine = LearningEngine::new(store);

    let stats = engine
        .domain_statistics(domain)
        .with_context(|| format!("Failed to load statistics for {domain}"))?;

    println!("Domain: {}", stats.domain);
    println!("Learned mappings: {}", stats.total_learned_mappings);
    println!("Average confidence: {:.2}", stats.average_confidence);

    if !stats.most_common_fields.is_empty() {
        println!("Most used fields:");
        for usage in &stats.most_common_fields {
            println!("  {} ({} uses)", usage.field, usage.usage_count);
        }
    }

    Ok(())
}

fn export_domain(domain: &str, output: Option<PathBuf>) -> Result<()> {
    let store = MappingStore::open_default().context("Failed to open mapping store")?;
    let engine = LearningEngine::new(store);

    let export = engine
        .export(domain)
        .with_context(|| format!("Failed to export {domain}"))?;
    let json = serde_json::to_string_pretty(&export)?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "Exported {} mappings to {}",
                export.mappings.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn import_file(file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let export: LearnedExport = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    let store = MappingStore::open_default().context("Failed to open mapping store")?;
    let engine = LearningEngine::new(store);

    let imported = engine.import(&export).context("Failed to import mappings")?;
    println!("Imported {} mappings for {}", imported, export.domain);

    Ok(())
}

fn show_config() -> Result<()> {
    let config = crate::config::config()?;

    println!("Home:     {}", config.home.display());
    println!("Database: {}", config.database.display());
    match &config.config_file {
        Some(path) => println!("Config:   {}", path.display()),
        None => println!("Config:   (none found)"),
    }

    Ok(())
}
