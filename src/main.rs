//! Trellis - operator CLI for the page composition engine.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::sync::Arc;
use trellis::fetch::{DirFetcher, Fetcher, HttpFetcher};
use trellis::store::DataStore;
use trellis::{DataSourceManager, LocalStore, PageDocument, RemoteStore, RendererConfig, log};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.quiet {
        trellis::logger::set_quiet(true);
    }

    let config = load_config(&cli)?;
    let manager = build_manager(&config);

    match &cli.command {
        Commands::Status => {
            let status = manager.services_status();
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Commands::Fetch { path } => {
            let data = manager
                .fetch_json_file(path)
                .await
                .with_context(|| format!("failed to resolve `{path}`"))?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Commands::Check { path } => {
            let data = manager
                .fetch_json_file(path)
                .await
                .with_context(|| format!("failed to resolve `{path}`"))?;
            let document =
                PageDocument::from_value(data).context("page data is not a valid document")?;
            let types = document.distinct_types();
            let entries = document.components.as_deref().unwrap_or_default().len();
            log!("page"; "{path}: {entries} entries, {} distinct types", types.len());
            for component_type in types {
                println!("{component_type}");
            }
        }
    }

    Ok(())
}

/// Load configuration: file if present, then environment, then CLI flags.
fn load_config(cli: &Cli) -> Result<RendererConfig> {
    let mut config = if cli.config.exists() {
        RendererConfig::from_path(&cli.config)?
    } else {
        RendererConfig::default()
    };
    config.update_with_env();

    if let Some(source) = &cli.source {
        config.sources.preference = source.clone();
    }
    if let Some(env) = &cli.env {
        config.render.mode = env.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Wire the store chain: remote edge first, local static tree last.
fn build_manager(config: &RendererConfig) -> Arc<DataSourceManager> {
    let http: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new());
    let dir: Arc<dyn Fetcher> = Arc::new(DirFetcher::new("."));

    let local = Arc::new(LocalStore::new(dir, config.sources.local_base.clone()));
    let remote = Arc::new(RemoteStore::new(
        http,
        config.sources.remote_domain.clone(),
        config.sources.remote_path.clone(),
        local.clone(),
    ));

    let stores: Vec<Arc<dyn DataStore>> = vec![remote, local];
    Arc::new(DataSourceManager::new(stores, config.sources.preference()))
}
