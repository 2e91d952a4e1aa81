//! Sitemap-Scout main entry point
//!
//! This is the command-line interface for checking pages against their
//! site's sitemap.

use anyhow::Context;
use clap::Parser;
use sitemap_scout::agent::{Agent, CliHost, TabId};
use sitemap_scout::config::{load_config_with_hash, Config};
use sitemap_scout::output::{render_check_result, render_links};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Tab id used for the simulated command-line tab
const CLI_TAB: TabId = 1;

/// Sitemap-Scout: is this page in the site's sitemap?
///
/// Each URL is visited in turn as one browsing tab would visit it. Pages
/// missing from their sitemap are collected and can be exported as sitemap
/// `<url>` entries.
#[derive(Parser, Debug)]
#[command(name = "sitemap-scout")]
#[command(version)]
#[command(about = "Checks whether pages are listed in their site's sitemap", long_about = None)]
struct Cli {
    /// Page URLs to check
    #[arg(value_name = "URL", required_unless_present = "dry_run")]
    urls: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print the pages missing from their sitemap as <url> entries
    #[arg(long)]
    export: bool,

    /// Date for <lastmod> in the export (default: now)
    #[arg(long, value_name = "DATE", requires = "export")]
    lastmod: Option<String>,

    /// Also list each page's links, marked by sitemap membership
    #[arg(long)]
    links: bool,

    /// Validate config and show it without checking anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_check(&cli, &config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_scout=info,warn"),
            1 => EnvFilter::new("sitemap_scout=debug,info"),
            2 => EnvFilter::new("sitemap_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Sitemap-Scout Dry Run ===\n");

    println!("Fetch:");
    println!("  Timeout: {}ms", config.fetch.timeout_ms);
    println!("  Probe timeout: {}ms", config.fetch.probe_timeout_ms);
    println!("  Max size: {} bytes", config.fetch.max_bytes);
    println!("  Cache TTL: {}s", config.fetch.cache_ttl_secs);

    println!("\nLocator ({}):", config.locator.scheme);
    for path in &config.locator.paths {
        println!("  - /{}", path);
    }

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);

    println!("\nPanel:");
    println!("  Preview limit: {}", config.panel.preview_limit);

    println!("\n✓ Configuration is valid");
}

/// Visits every URL in one simulated tab and prints the results
async fn handle_check(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let host = Arc::new(CliHost::new(config).context("building HTTP client")?);
    let agent = Agent::new(config, host.clone()).context("building checker")?;

    for url in &cli.urls {
        host.open_tab(CLI_TAB, url);

        match agent.on_tab_navigated(CLI_TAB, url).await {
            Some(result) => print!("{}", render_check_result(&result, config.panel.preview_limit)),
            None => println!("(already checked {})", url),
        }

        if cli.links {
            match agent.checker().fetch_page(url).await {
                Ok(html) => {
                    let links = agent.annotate_links(url, &html, CLI_TAB).await;
                    print!("{}", render_links(&links));
                }
                Err(e) => tracing::warn!("Could not fetch {} for link listing: {}", url, e),
            }
        }
        println!();
    }

    let missing = agent.tracker().non_indexed_urls(CLI_TAB);
    println!("Pages not in sitemap: {}", missing.len());

    if cli.export {
        let xml = agent.export_non_indexed(CLI_TAB, cli.lastmod.as_deref());
        if !xml.is_empty() {
            println!("{}", xml);
        }
    }

    agent.on_tab_closed(CLI_TAB);
    host.close_tab(CLI_TAB);

    Ok(())
}
