// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion_pagegraph::analytics::{measure_page, outline};
use notion_pagegraph::api::{Exchange, MemoryCache};
use notion_pagegraph::config::{CommandLineInput, PipelineConfig};
use notion_pagegraph::{NotionClient, Page, PageDownloader};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Sets up logging configuration. Log lines go to stderr so the structure
/// dump on stdout stays clean.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion_pagegraph.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

fn load_exchanges(path: &Path) -> anyhow::Result<Vec<Exchange>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading replay file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing replay file {}", path.display()))
}

fn save_exchanges(path: &Path, cache: &MemoryCache) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(&cache.exchanges())?;
    fs::write(path, text).with_context(|| format!("writing record file {}", path.display()))
}

fn report(page: &Page) {
    print!("{}", outline(page));
    println!();
    print!("{}", measure_page(page));
}

/// Downloads the page, prints its structure, and saves the exchanges if asked.
async fn execute_pipeline(config: &PipelineConfig) -> anyhow::Result<()> {
    let mut client = NotionClient::new(config.client.clone())?;

    let cache = match (&config.replay_file, &config.record_file) {
        (None, None) => None,
        (replay, _) => {
            let exchanges = match replay {
                Some(path) => load_exchanges(path)?,
                None => Vec::new(),
            };
            log::info!("Interceptor loaded with {} exchange(s)", exchanges.len());
            Some(Arc::new(MemoryCache::with_exchanges(exchanges)))
        }
    };
    if let Some(cache) = &cache {
        client = client.with_interceptor(cache.clone());
    }

    let downloader = PageDownloader::new(client, config.download.clone());
    let result = downloader.download_page(&config.root_id).await;

    if let (Some(cache), Some(path)) = (&cache, &config.record_file) {
        log::info!(
            "Interceptor: {} hit(s), {} miss(es)",
            cache.hits(),
            cache.misses()
        );
        save_exchanges(path, cache)?;
    }

    let page = result.with_context(|| format!("downloading page {}", config.root_id))?;
    report(&page);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = PipelineConfig::resolve(cli)?;

    execute_pipeline(&config).await
}
