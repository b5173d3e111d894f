use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use truthscope_analyzer::Analyzer;
use truthscope_common::{Config, TruthScopeError};

#[derive(Parser, Debug)]
#[command(name = "truthscope", about = "Score the credibility of a news article or headline")]
struct Args {
    /// Article URL or headline text. Read from the input file when omitted.
    input: Option<String>,

    /// File holding the URL or headline to analyze.
    #[arg(long, default_value = "link.txt")]
    input_file: PathBuf,

    /// Where the JSON report is written.
    #[arg(long, default_value = "credibility_report.json")]
    output: PathBuf,

    /// Override MAX_SEARCH_RESULTS for this run.
    #[arg(long)]
    max_results: Option<usize>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("truthscope=info")),
        )
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if matches!(
                e.downcast_ref::<TruthScopeError>(),
                Some(TruthScopeError::EmptyInput)
            ) {
                error!("Input has no extractable text; nothing to analyze");
                ExitCode::from(2)
            } else {
                error!(error = %e, "Analysis failed");
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let input = match args.input {
        Some(input) => input,
        None => {
            let contents = std::fs::read_to_string(&args.input_file).with_context(|| {
                format!("Failed to read input file {}", args.input_file.display())
            })?;
            // First non-blank line only; the file holds one URL or headline.
            contents
                .lines()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .unwrap_or_default()
                .to_string()
        }
    };
    let input = input.trim().to_string();

    let mut config = Config::from_env();
    if let Some(max_results) = args.max_results {
        config.max_search_results = max_results;
    }
    config.log_redacted();

    let analyzer = Analyzer::from_config(&config);
    let report = analyzer.analyze(&input).await?;

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    std::fs::write(&args.output, json)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!(
        output = %args.output.display(),
        level = %report.credibility.credibility_level,
        total_score = report.credibility.total_score,
        sources = report.credibility.sources_analyzed,
        "Report written"
    );
    println!(
        "{}: {} (score {:.3}, {} sources)",
        report.credibility.headline,
        report.credibility.credibility_level,
        report.credibility.total_score,
        report.credibility.sources_analyzed
    );

    Ok(())
}
