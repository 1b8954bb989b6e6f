use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use retriever_core::{
    load_config, validate_config, ArtifactPersister, BlobStore, CaptchaSolver, CsvRecordSink,
    DateOrchestrator, FsBlobStore, LowConfidenceHandler, OcrEngine, PassthroughHandler,
    PortalClient, PortalGateway, PromptHandler, RangeDriver, RecordSink, TesseractOcr,
};

/// Retrieve tribunal-order records and documents from the ITAT portal.
#[derive(Debug, Parser)]
#[command(name = "itat-retriever", version)]
struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml", env = "RETRIEVER_CONFIG")]
    config: PathBuf,

    /// Override the first order date to query (YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Override the last order date to query (YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Override the bench code from the configuration.
    #[arg(long)]
    bench: Option<String>,

    /// Never block for manual CAPTCHA entry; low-confidence guesses are
    /// submitted as-is and cost one attempt when wrong.
    #[arg(long)]
    unattended: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Loading configuration from {:?}", args.config);
    let mut config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    if let Some(from) = args.from {
        config.query.from = from;
    }
    if let Some(to) = args.to {
        config.query.to = to;
    }
    if let Some(bench) = args.bench {
        config.query.bench = bench;
    }

    validate_config(&config).context("Configuration validation failed")?;

    info!(
        bench = %config.query.bench,
        appeal_type = %config.query.appeal_type,
        from = %config.query.from,
        to = %config.query.to,
        "Configuration loaded"
    );

    let portal: Arc<dyn PortalGateway> = Arc::new(PortalClient::new(
        config.portal.clone(),
        config.output.snapshot_dir.clone(),
    ));

    let engine: Arc<dyn OcrEngine> = Arc::new(TesseractOcr::new(config.ocr.clone()));
    let fallback: Arc<dyn LowConfidenceHandler> = if args.unattended {
        Arc::new(PassthroughHandler)
    } else {
        Arc::new(PromptHandler)
    };
    info!(handler = fallback.name(), "CAPTCHA fallback policy selected");

    let solver = CaptchaSolver::new(engine, fallback, config.ocr.clone());

    let sink: Arc<dyn RecordSink> = Arc::new(CsvRecordSink::new(&config.output.records_dir));
    let store: Arc<dyn BlobStore> = Arc::new(FsBlobStore::new(&config.output.documents_dir));
    let persister = ArtifactPersister::new(
        Arc::clone(&portal),
        sink,
        store,
        config.portal.origin.clone(),
    );

    let orchestrator = DateOrchestrator::new(
        config.orchestrator.clone(),
        config.query.clone(),
        Arc::clone(&portal),
        solver,
        persister,
    );

    let summary = RangeDriver::new(orchestrator)
        .run(config.query.from, config.query.to)
        .await
        .context("Run aborted")?;

    info!(
        dates = summary.dates_processed,
        resolved = summary.resolved,
        empty = summary.empty,
        records = summary.records_written,
        "Finished"
    );

    if !summary.exhausted.is_empty() {
        for date in &summary.exhausted {
            error!(date = %date, "Unresolved date, re-run to retry");
        }
    }

    Ok(())
}
