//! Zeitgeist command line.
//!
//! Progress frames and results go to stdout; logs go to stderr.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{info, warn};

use zeitgeist::campaign::{
    campaign_pipeline, CampaignBrief, CampaignOutput, CompanyProfile, TrendDiscovery,
    CAMPAIGN_LABEL,
};
use zeitgeist::cancellation::CancellationToken;
use zeitgeist::config::{ModelTier, Settings};
use zeitgeist::events::{
    ndjson_channel, LoggingProgressSink, NdjsonFrames, ProgressSink, TeeProgressSink,
};
use zeitgeist::extract::{DocumentSummarizer, PlainTextExtractor, TextExtractor};
use zeitgeist::gateway::OpenRouterGateway;
use zeitgeist::observability::{init_tracing, LogFormat};
use zeitgeist::pipeline::{PipelineOrchestrator, PipelineOutcome};
use zeitgeist::trends::{Trend, TrendExtractor};

/// Staged marketing-content pipeline and trend extractor
#[derive(Parser, Debug)]
#[command(name = "zeitgeist", version, about)]
struct Cli {
    /// Log line format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse analysis text offline and print the trends as JSON
    Trends {
        /// Text file to parse, or `-` for stdin
        #[arg(default_value = "-")]
        input: String,
    },

    /// Turn a topic into a trend record without calling a model
    ManualTrend {
        /// Topic, 5 to 200 characters
        topic: String,
    },

    /// Discover trends relevant to a company
    Discover {
        /// Company name
        #[arg(long)]
        company: String,

        /// What the company does
        #[arg(long)]
        description: String,

        /// Industry
        #[arg(long)]
        industry: Option<String>,

        /// Use the lite model
        #[arg(long)]
        lite: bool,
    },

    /// Run the campaign pipeline and stream NDJSON progress frames
    Campaign {
        /// Company name
        #[arg(long)]
        company: String,

        /// What the company does
        #[arg(long)]
        description: String,

        /// Brand voice, e.g. edgy or professional
        #[arg(long, default_value = "professional")]
        voice: String,

        /// Trend the campaign rides
        #[arg(long)]
        trend: String,

        /// Background on the trend
        #[arg(long, default_value = "")]
        trend_context: String,

        /// Brand documents (.txt, .md) to summarise into the brief
        #[arg(long = "doc", value_name = "FILE")]
        docs: Vec<PathBuf>,

        /// Write the shaped campaign JSON here when the run completes
        #[arg(long)]
        output: Option<PathBuf>,

        /// Use the lite model
        #[arg(long)]
        lite: bool,
    },
}

const fn tier(lite: bool) -> ModelTier {
    if lite {
        ModelTier::Lite
    } else {
        ModelTier::Pro
    }
}

fn orchestrator(settings: &Settings, lite: bool) -> Result<PipelineOrchestrator> {
    let gateway = OpenRouterGateway::from_settings(settings, tier(lite))?;
    info!(model = gateway.model(), "Using model");
    Ok(PipelineOrchestrator::new(Arc::new(gateway))
        .with_defaults(settings.generation_defaults())
        .with_secrets(settings.secrets()))
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let handle = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel("interrupted");
        }
    });
    token
}

async fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("Failed to read '{input}'"))
    }
}

async fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    let mut stdout = tokio::io::stdout();
    stdout.write_all(json.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

async fn write_frames(mut frames: NdjsonFrames) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    while let Some(frame) = frames.next().await {
        stdout.write_all(frame.as_bytes()).await?;
        stdout.flush().await?;
    }
    Ok(())
}

async fn document_summary(
    settings: &Settings,
    lite: bool,
    company: &str,
    docs: &[PathBuf],
) -> Result<Option<String>> {
    if docs.is_empty() {
        return Ok(None);
    }

    let extractor = PlainTextExtractor;
    let mut texts = Vec::with_capacity(docs.len());
    for path in docs {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let text = extractor.extract(&bytes, name).await;
        if text.is_empty() {
            warn!(file = %path.display(), "No text extracted");
        }
        texts.push(text);
    }

    let gateway = OpenRouterGateway::from_settings(settings, tier(lite))?;
    Ok(DocumentSummarizer::new(Arc::new(gateway))
        .summarize(&texts, company)
        .await)
}

async fn write_campaign(path: &Path, output: &CampaignOutput) -> Result<()> {
    let json = serde_json::to_vec_pretty(output)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write '{}'", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Command::Trends { input } => {
            let text = read_input(&input).await?;
            let extraction = TrendExtractor::new().extract(&text);
            info!(
                strategy = %extraction.strategy.map_or_else(|| "fallback".to_string(), |s| s.to_string()),
                trends = extraction.trends.len(),
                "Parsed trends"
            );
            print_json(&extraction.trends).await
        }

        Command::ManualTrend { topic } => print_json(&Trend::manual(&topic)?).await,

        Command::Discover {
            company,
            description,
            industry,
            lite,
        } => {
            let settings = Settings::from_env()?;
            let discovery = TrendDiscovery::new(orchestrator(&settings, lite)?);
            let mut profile = CompanyProfile::new(company, description);
            if let Some(industry) = industry {
                profile = profile.with_industry(industry);
            }

            let report = discovery
                .discover(&profile, Arc::new(LoggingProgressSink::default()))
                .await?;
            print_json(&report).await
        }

        Command::Campaign {
            company,
            description,
            voice,
            trend,
            trend_context,
            docs,
            output,
            lite,
        } => {
            let settings = Settings::from_env()?;
            let orchestrator = orchestrator(&settings, lite)?.with_label(CAMPAIGN_LABEL);

            let mut brief = CampaignBrief::new(company, description, voice, trend, trend_context);
            brief.validate()?;
            if let Some(summary) =
                document_summary(&settings, lite, &brief.company_name, &docs).await?
            {
                brief = brief.with_document_summary(summary);
            }

            let cancel = cancel_on_ctrl_c();
            let (channel, frames) = ndjson_channel(settings.event_buffer);
            let metrics = channel.metrics();
            let sinks: Vec<Arc<dyn ProgressSink>> =
                vec![channel, Arc::new(LoggingProgressSink::debug())];
            let sink = Arc::new(TeeProgressSink::new(sinks));

            let stages = campaign_pipeline();
            let initial_input = brief.render();
            let run = orchestrator.run_with_cancellation(&stages, &initial_input, sink, &cancel);
            let (outcome, written) = tokio::join!(run, write_frames(frames));
            written?;

            if metrics.dropped() > 0 {
                warn!(
                    delivered = metrics.delivered(),
                    dropped = metrics.dropped(),
                    "Some progress frames were not written"
                );
            }

            match outcome? {
                PipelineOutcome::Completed(result) => {
                    let shaped = CampaignOutput::from_result(&brief, &result);
                    if let Some(path) = output {
                        write_campaign(&path, &shaped).await?;
                        info!(path = %path.display(), "Campaign written");
                    }
                    Ok(())
                }
                PipelineOutcome::Failed(failure) => Err(failure.into()),
            }
        }
    }
}
