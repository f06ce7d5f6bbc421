use chrono::Local;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use rss_aggregator::{
    load_feed_list, AppConfig, DisabledSummarizer, Fetcher, GeminiAdapter, ReferenceWindow, RssAggregator, Summarizer,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Collect recent exploit news from RSS feeds and deliver a digest.
#[derive(Parser, Debug)]
#[command(name = "exploit-news", version)]
struct Cli {
    /// File with one feed URL per line
    feed_list: PathBuf,

    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<String>,

    /// Save the collected batch to news.html
    #[arg(long)]
    debug: bool,

    /// Read settings from this file instead of searching for `.env`
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            return Ok(());
        }
        Err(_) => {
            println!("{}", Cli::command().render_usage());
            return Ok(());
        }
    };

    let reference_date = cli
        .date
        .clone()
        .unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string());
    if ReferenceWindow::parse(&reference_date).is_none() {
        error!("Invalid reference date '{}', expected YYYY-MM-DD", reference_date);
        return Ok(());
    }

    let loaded = match &cli.env_file {
        Some(path) => AppConfig::from_env_file(path),
        None => AppConfig::from_env(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return Ok(());
        }
    };
    if cli.debug {
        config.debug = true;
    }

    let feeds = load_feed_list(&cli.feed_list);
    if feeds.is_empty() {
        warn!("No feeds to process in {}", cli.feed_list.display());
        return Ok(());
    }

    let fetcher = Arc::new(Fetcher::new(config.fetch.clone())?);
    let summarizer: Arc<dyn Summarizer> = match &config.gemini {
        Some(gemini) => Arc::new(GeminiAdapter::new(gemini.clone())?),
        None => {
            warn!("GEMINI_API_KEY is not set, AI summaries disabled");
            Arc::new(DisabledSummarizer)
        }
    };
    let delivery = config.delivery.build()?;

    info!(
        "Starting exploit-news ({} content, {} summarizer, {} delivery)",
        config.content_mode,
        summarizer.adapter_name(),
        delivery.channel_name()
    );

    let aggregator = RssAggregator::new(fetcher, summarizer, &config);
    let span = info_span!("run", run_id = %Uuid::new_v4());
    let report = aggregator
        .run(&feeds, &reference_date, delivery.as_ref())
        .instrument(span)
        .await;

    info!(
        feeds = report.feeds_total,
        skipped = report.feeds_skipped,
        fragments = report.fragments,
        delivered = report.delivered,
        "Run finished"
    );
    Ok(())
}
