use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use content_triage::{
    app::TriageApp,
    config::{self, ClassifierMode},
    domain::ContentRecord,
    infrastructure::logging,
};

#[derive(Parser, Debug)]
#[command(name = "content-triage", version, about = "Quality filter and topic classifier for scraped articles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Filter and classify JSON Lines records.
    Classify {
        #[arg(long, help = "JSON Lines input (defaults to stdin)")]
        input: Option<PathBuf>,
        #[arg(long, help = "Override CLASSIFIER_MODE")]
        mode: Option<ClassifierMode>,
    },
    /// Run only the quality and spam filter.
    Assess {
        #[arg(long, help = "JSON Lines input (defaults to stdin)")]
        input: Option<PathBuf>,
        #[arg(long, default_value_t = false, help = "Emit only records that pass")]
        valid_only: bool,
    },
    /// Show how the rule classifiers score a single article.
    Explain {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Print taxonomy statistics.
    Taxonomy,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = config::load_config()?;
    logging::init_tracing(&config.logging)?;

    if let Commands::Classify {
        mode: Some(mode), ..
    } = &cli.command
    {
        config.classifier.mode = *mode;
    }
    let app = TriageApp::initialize(config)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match cli.command {
        Commands::Classify { input, .. } => {
            let records = read_records(input.as_ref())?;
            let enriched = app.processor().process(&records).await;
            write_lines(&mut out, &enriched)?;
        }
        Commands::Assess { input, valid_only } => {
            let records = read_records(input.as_ref())?;
            let assessed = app.processor().assess(&records);
            let kept: Vec<_> = assessed
                .iter()
                .filter(|record| !valid_only || record.quality.as_ref().is_some_and(|q| q.is_valid))
                .collect();
            write_lines(&mut out, &kept)?;
        }
        Commands::Explain { title, content } => {
            let explanation = json!({
                "quality": app.processor().filter().assess(&title, &content),
                "rule": app.rule_classifier().explain(&title, &content),
                "multi_level": app.multi_level_classifier().explain(&title, &content),
            });
            serde_json::to_writer_pretty(&mut out, &explanation)?;
            writeln!(out)?;
        }
        Commands::Taxonomy => {
            serde_json::to_writer_pretty(&mut out, &app.catalog().taxonomy.stats())?;
            writeln!(out)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Reads one JSON object per line. Blank lines are ignored and malformed
/// ones are logged and skipped.
fn read_records(input: Option<&PathBuf>) -> Result<Vec<ContentRecord>> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ContentRecord>(&line) {
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::warn!(target: "input", line = idx + 1, error = %err, "skipping malformed record");
            }
        }
    }
    tracing::info!(target: "input", records = records.len(), "input loaded");
    Ok(records)
}

fn write_lines<W: Write, T: Serialize>(out: &mut W, items: &[T]) -> Result<()> {
    for item in items {
        serde_json::to_writer(&mut *out, item)?;
        writeln!(out)?;
    }
    Ok(())
}
