use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use finrag_core::bootstrap::{build_pipeline, build_record_ingestor, build_registry, load_config};
use finrag_core::config::Config;
use finrag_ingest::JsonlSink;
use finrag_ingest::document::{
    ChunkStrategy, IngestReport, MetadataClassifier, MetadataRecord,
};
use finrag_ingest::records::RecordReport;

#[derive(Parser)]
#[command(name = "finrag", version)]
#[command(about = "Chunk and tag Indian personal-finance documents for retrieval")]
struct Cli {
    /// Path to the TOML config (overrides FINRAG_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Walk the document tree and write chunk records as JSON lines
    Ingest {
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Ingest the processed tax, investment and budgeting datasets
    Records {
        #[arg(long)]
        processed_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the chunk records of a single file to stdout
    Chunk {
        file: PathBuf,
        /// Pack sentences over the whole document instead of per section
        #[arg(long)]
        sentences: bool,
    },
    /// Print the metadata derived from a file path
    Classify { file: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_subscriber();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Ingest { data_dir, output } => {
            let data_dir = data_dir.unwrap_or_else(|| PathBuf::from(&config.ingest.data_dir));
            let output = output.unwrap_or_else(|| PathBuf::from(&config.ingest.output));
            run_ingest(&config, &data_dir, &output).await?;
        }
        Command::Records {
            processed_dir,
            output,
        } => {
            let dir =
                processed_dir.unwrap_or_else(|| PathBuf::from(&config.records.processed_dir));
            let output = output.unwrap_or_else(|| PathBuf::from(&config.records.output));
            run_records(&config, &dir, &output)?;
        }
        Command::Chunk { file, sentences } => {
            let mut stdout = std::io::stdout().lock();
            run_chunk(&config, &file, sentences, &mut stdout).await?;
        }
        Command::Classify { file } => {
            let record = classify(&file);
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}

fn init_subscriber() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

async fn run_ingest(config: &Config, data_dir: &Path, output: &Path) -> anyhow::Result<IngestReport> {
    let pipeline = build_pipeline(config);
    let registry = build_registry(config);
    let mut sink = JsonlSink::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;

    let report = pipeline
        .ingest_dir(data_dir, &registry, &mut sink)
        .await
        .with_context(|| format!("failed to ingest {}", data_dir.display()))?;

    tracing::info!(
        output = %output.display(),
        collection = pipeline.collection(),
        chunks = report.chunks,
        failed = report.files_failed,
        "wrote chunk records"
    );
    Ok(report)
}

fn run_records(config: &Config, dir: &Path, output: &Path) -> anyhow::Result<RecordReport> {
    let ingestor = build_record_ingestor(config);
    let mut sink = JsonlSink::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;

    let report = ingestor
        .ingest_processed_dir(dir, &mut sink)
        .with_context(|| format!("failed to ingest datasets in {}", dir.display()))?;

    tracing::info!(
        output = %output.display(),
        tax_chunks = report.tax_chunks,
        investment_options = report.investment_options,
        budgeting_rules = report.budgeting_rules,
        missing = report.missing.len(),
        "wrote record chunks"
    );
    Ok(report)
}

async fn run_chunk<W: Write>(
    config: &Config,
    file: &Path,
    sentences: bool,
    out: &mut W,
) -> anyhow::Result<usize> {
    let mut pipeline = build_pipeline(config);
    if sentences {
        pipeline = pipeline.with_strategy(ChunkStrategy::Sentences);
    }
    let documents = build_registry(config)
        .load(file)
        .await
        .with_context(|| format!("failed to load {}", file.display()))?;

    let mut count = 0;
    for doc in &documents {
        for record in pipeline.records(doc) {
            serde_json::to_writer(&mut *out, &record)?;
            writeln!(out)?;
            count += 1;
        }
    }
    Ok(count)
}

fn classify(file: &Path) -> MetadataRecord {
    MetadataClassifier::default().classify(file)
}
