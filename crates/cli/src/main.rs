//! sift entry point.
//!
//! With no subcommand this opens the terminal UI. Logs go to the configured
//! log file, or nowhere, so they never draw over the screen. `sift search`
//! prints results as plain text and logs to stderr.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sift_client::{SearchClient, SearchConfig};
use sift_core::{AppConfig, ColumnCount, SearchState, SearchType};
use tracing_subscriber::{EnvFilter, fmt::writer::BoxMakeWriter};

mod app;
mod cards;
mod input;
mod print;
mod ui;

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Terminal viewer for a local search endpoint", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML config file (overrides SIFT_CONFIG_FILE)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Search endpoint URL
    #[arg(long, global = true, value_name = "URL")]
    endpoint: Option<String>,

    /// Initial column count (clamped to 1-5)
    #[arg(long, value_name = "N")]
    columns: Option<i64>,

    /// Initial search type: web, news or image
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    search_type: Option<SearchType>,

    /// Write logs to this file while the UI is running
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one search and print the results
    #[command(alias = "s")]
    Search {
        /// Search text
        query: String,

        /// Search type: web, news or image
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        search_type: Option<SearchType>,

        /// Leave thumbnails out of web and news results
        #[arg(long)]
        no_images: bool,
    },
}

impl Cli {
    /// Layer command-line flags over the loaded configuration.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(columns) = self.columns {
            config.columns = ColumnCount::new(columns);
        }
        if let Some(search_type) = self.search_type {
            config.search_type = search_type;
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
        if let Some(Commands::Search { search_type, no_images, .. }) = &self.command {
            if let Some(search_type) = search_type {
                config.search_type = *search_type;
            }
            if *no_images {
                config.show_images = false;
            }
        }
    }
}

fn init_logging(config: &AppConfig, writer: BoxMakeWriter) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .json()
        .init();
}

fn ui_log_writer(config: &AppConfig) -> Result<BoxMakeWriter> {
    match &config.log_file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            Ok(BoxMakeWriter::new(Mutex::new(file)))
        }
        None => Ok(BoxMakeWriter::new(io::sink)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    let client = SearchClient::new(SearchConfig::from(&config))?;
    let state = SearchState::new(config.layout(), config.warning_ttl());

    match &cli.command {
        Some(Commands::Search { query, .. }) => {
            init_logging(&config, BoxMakeWriter::new(io::stderr));
            tracing::info!(endpoint = %client.endpoint(), search_type = %state.search_type(), "running one-shot search");

            print::run_search(&client, state, query, &mut io::stdout().lock()).await
        }
        None => {
            init_logging(&config, ui_log_writer(&config)?);
            tracing::info!(endpoint = %client.endpoint(), "starting sift terminal UI");

            let mut app = app::App::new(state, Arc::new(client));
            app::run(&mut app)
        }
    }
}
