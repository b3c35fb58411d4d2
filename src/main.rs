mod error;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use baseplan_codec::{decode_with_format, encode, WireFormat, EMBED_LIMIT};
use baseplan_core::Direction;
use baseplan_layout::{run_claim_countdowns, Design, DesignDocument, TickerExit, MAIN_AREA};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

use crate::error::{CliError, ErrorCode};

const LOG_ENV: &str = "BASEPLAN_LOG";

#[derive(Parser)]
#[command(
    name = "baseplan",
    version,
    about = "Plan foundation layouts and share them as compact strings"
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a design document (YAML or JSON) into a share string
    Encode {
        #[arg(value_name = "DOC")]
        input: PathBuf,

        /// Fail when the share string is longer than the embed limit
        #[arg(long)]
        strict: bool,
    },
    /// Decode a share string and print the design document as JSON
    Decode {
        #[arg(value_name = "STRING")]
        text: String,
    },
    /// Summarize a share string per floor
    Inspect {
        #[arg(value_name = "STRING")]
        text: String,
    },
    /// Claim the area next to an existing one and print the new share string
    Claim {
        #[arg(value_name = "STRING")]
        text: String,

        /// top, bottom, left or right
        #[arg(short, long, value_parser = parse_direction)]
        direction: Direction,

        #[arg(long, default_value = MAIN_AREA)]
        parent: String,

        /// Override the claim countdown
        #[arg(long, value_name = "MS")]
        countdown: Option<u64>,
    },
}

#[derive(Serialize)]
struct Summary {
    format: WireFormat,
    length: usize,
    areas: usize,
    floors: Vec<FloorSummary>,
}

#[derive(Serialize)]
struct FloorSummary {
    index: u32,
    shapes: usize,
    groups: usize,
    area: f64,
    material_cost: u32,
}

fn parse_direction(name: &str) -> Result<Direction, String> {
    Direction::from_name(name).ok_or_else(|| format!("unknown direction `{name}`"))
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ErrorCode::Usage.into(),
            };
        }
    };
    init_logging(cli.verbose);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            err.code.into()
        }
    }
}

async fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Encode { input, strict } => {
            let document =
                read_document(&input).map_err(|err| CliError::input(format!("{err:#}")))?;
            let design = document
                .into_design()
                .map_err(|err| CliError::input(format!("{}: {err}", input.display())))?;
            print_share_string(&design, strict)
        }
        Command::Decode { text } => {
            let (design, _) = decode_with_format(&text)?;
            let document = DesignDocument::from_design(&design);
            let json = serde_json::to_string_pretty(&document)
                .map_err(|err| CliError::processing(err.to_string()))?;
            println!("{json}");
            Ok(())
        }
        Command::Inspect { text } => {
            let (design, format) = decode_with_format(&text)?;
            let summary = summarize(&design, format, text.trim().len());
            let json = serde_json::to_string_pretty(&summary)
                .map_err(|err| CliError::processing(err.to_string()))?;
            println!("{json}");
            Ok(())
        }
        Command::Claim {
            text,
            direction,
            parent,
            countdown,
        } => {
            let (mut design, _) = decode_with_format(&text)?;
            if let Some(ms) = countdown {
                design.settings.claim_countdown_ms = ms;
            }
            let claim = design.start_claim(&parent, direction)?;
            tracing::info!(claim, %parent, %direction, "waiting for claim countdown");

            let (cancel_tx, cancel_rx) = oneshot::channel();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    let _ = cancel_tx.send(());
                }
            });
            match run_claim_countdowns(&mut design, cancel_rx).await {
                TickerExit::Drained => print_share_string(&design, false),
                TickerExit::Cancelled => Err(CliError::processing("claim cancelled")),
            }
        }
    }
}

fn read_document(path: &Path) -> Result<DesignDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read design document {}", path.display()))?;
    let is_json = path.extension().and_then(|ext| ext.to_str()) == Some("json");
    let document = if is_json {
        serde_json::from_str(&content).context("failed to parse JSON design document")?
    } else {
        serde_yaml::from_str(&content).context("failed to parse YAML design document")?
    };
    Ok(document)
}

fn print_share_string(design: &Design, strict: bool) -> Result<(), CliError> {
    let encoded = encode(design)?;
    if encoded.exceeds_limit {
        let message = format!(
            "share string is {} characters, over the {EMBED_LIMIT} character embed limit",
            encoded.text.len()
        );
        if strict {
            return Err(CliError::processing(message));
        }
        eprintln!("warning: {message}");
    }
    println!("{}", encoded.text);
    Ok(())
}

fn summarize(design: &Design, format: WireFormat, length: usize) -> Summary {
    Summary {
        format,
        length,
        areas: design.areas().len(),
        floors: design
            .floors()
            .map(|(index, floor)| FloorSummary {
                index,
                shapes: floor.len(),
                groups: design.groups(index).len(),
                area: design.floor_area(index),
                material_cost: design.material_cost(index),
            })
            .collect(),
    }
}
