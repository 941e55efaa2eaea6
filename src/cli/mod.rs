/*
* Clone Builder Command Line Interface
* ------------------------------------
* clone-builder
* ├── build            // assemble a clone request and print it as JSON
* ├── check-hostname   // apply the hostname rule to a name
* └── init             // write config/default.toml
*
* `build` never talks to a live platform: placement and named customization
* specs come from the static inventory file configured in settings.
*
* ```bash
* vsphere-clone-builder build --source centos-tpl --name web-01 --options web.toml
* ```
*/

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{error, info, Level};

use crate::config::{config_source, Settings};
use crate::core::hostname::{is_valid_hostname, INVALID_HOSTNAME};
use crate::core::{CloneOptions, CloneSpecBuilder, TracingSink};
use crate::inventory::StaticInventory;
use crate::network::PortgroupNetworkPlanner;

#[derive(Parser)]
#[command(name = "vsphere-clone-builder")]
#[command(about = "Builds VM clone requests from declarative options", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a clone request and print it
    Build {
        /// Source VM or template name in the inventory
        #[arg(short, long)]
        source: String,
        /// Name of the VM to create
        #[arg(short, long)]
        name: String,
        /// Clone options file (TOML, or JSON with a .json extension)
        #[arg(short, long)]
        options: PathBuf,
        /// Inventory file, overriding the configured one
        #[arg(short, long)]
        inventory: Option<PathBuf>,
    },
    /// Check a hostname against DNS label rules
    CheckHostname { hostname: String },
    /// Generate default configuration
    Init {
        #[arg(short, long)]
        force: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::new_from_file(path)?,
        None => Settings::new()?,
    };
    init_tracing(&settings.logging.level, cli.verbose);
    info!(
        "Loaded configuration from {}",
        config_source(cli.config.as_deref())
    );

    match cli.command {
        Commands::Build {
            source,
            name,
            options,
            inventory,
        } => handle_build(&settings, &source, &name, &options, inventory)?,
        Commands::CheckHostname { hostname } => handle_check_hostname(&hostname)?,
        Commands::Init { force } => handle_init_command(force)?,
    }

    Ok(())
}

fn init_tracing(configured: &str, verbose: u8) {
    let level = match verbose {
        0 => configured.parse().unwrap_or(Level::INFO),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_build(
    settings: &Settings,
    source: &str,
    name: &str,
    options_path: &Path,
    inventory_path: Option<PathBuf>,
) -> Result<()> {
    let inventory_path = inventory_path.unwrap_or_else(|| settings.inventory.path.clone());
    let inventory = StaticInventory::from_file(&inventory_path)?;
    let options = CloneOptions::from_file(options_path)?;
    let template = inventory.find_vm(source)?;

    info!("Building clone of {} as {}", template.name, name);

    let progress = TracingSink;
    let builder = CloneSpecBuilder::new(&inventory, &PortgroupNetworkPlanner, &progress)
        .with_domain_admin_password(settings.customization.domain_admin_password.as_deref());

    match builder.build(&template, name, &options) {
        Ok(request) => {
            let rendered =
                serde_json::to_string_pretty(&request).context("serializing clone request")?;
            println!("{}", rendered);
            eprintln!("{} Clone request for '{}' built", "✓".green(), name);
            Ok(())
        }
        Err(e) => {
            error!("Failed to build clone request: {}", e);
            eprintln!("{} {}", "✗".red(), e.to_string().red());
            Err(e.into())
        }
    }
}

fn handle_check_hostname(hostname: &str) -> Result<()> {
    if is_valid_hostname(hostname) {
        println!("{} {}", "✓".green(), hostname);
        Ok(())
    } else {
        println!("{} {}: {}", "✗".red(), hostname, INVALID_HOSTNAME);
        bail!("invalid hostname: {}", hostname)
    }
}

fn handle_init_command(force: bool) -> Result<()> {
    let config_dir = PathBuf::from("config");
    let target = config_dir.join("default.toml");
    if target.exists() && !force {
        error!("Configuration already exists. Use --force to overwrite.");
        return Ok(());
    }

    std::fs::create_dir_all(&config_dir)?;
    let default_config = crate::config::generate_default_config();
    let config_str = toml::to_string_pretty(&default_config)?;
    std::fs::write(&target, config_str)
        .with_context(|| format!("writing {}", target.display()))?;

    println!("{} Default configuration generated", "✓".green());
    Ok(())
}
