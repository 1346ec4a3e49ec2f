//! solr-reindex CLI - parallel collection-to-collection reindexing.

use clap::Parser;
use solr_reindex::{Config, Reindexer, ReindexError};
use std::process::ExitCode;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "solr-reindex")]
#[command(about = "Copy every document from one collection to another in parallel")]
#[command(version)]
struct Cli {
    /// Name of the source collection
    #[arg(short, long)]
    source: String,

    /// Name of the destination collection
    #[arg(short, long)]
    dest: String,

    /// Base URL of the cluster, e.g. http://localhost:8983/solr
    #[arg(short = 'z', long)]
    cluster: String,

    /// Total number of parallel workers
    #[arg(short = 'n', long)]
    workers: usize,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Output JSON summary to stdout
    #[arg(long)]
    output_json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), ReindexError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    let config = Config {
        source_collection: cli.source,
        dest_collection: cli.dest,
        cluster_url: cli.cluster,
        workers: cli.workers,
    };

    let reindexer = Reindexer::connect(config).await?;

    println!("Starting to reindex.");
    info!("connected, starting reindex");

    let summary = reindexer.run().await?;

    println!("Completed reindexing.");
    if cli.output_json {
        println!("{}", summary.to_json()?);
    } else {
        println!("  Duration: {:.2}s", summary.duration_seconds);
        println!("  Documents: {}", summary.docs_copied);
        println!("  Pages: {}", summary.pages_fetched);
        println!("  Throughput: {} docs/sec", summary.docs_per_second);
        println!(
            "  Workers: {}/{} completed",
            summary.workers_total - summary.workers_failed,
            summary.workers_total
        );
        for failed in &summary.failed_workers {
            println!("  Worker {} failed: {}", failed.worker, failed.error);
        }
    }

    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
