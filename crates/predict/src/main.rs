use anyhow::Context;
use clap::Parser;
use fisight_core::domain::contract;
use fisight_core::engine;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Scores one financial snapshot with the rule engine and prints the
/// recommendation as a single JSON line on stdout.
#[derive(Debug, Parser)]
#[command(name = "fisight_predict")]
struct Args {
    /// Snapshot JSON. Read from --input or stdin when omitted.
    snapshot: Option<String>,

    /// Read the snapshot JSON from a file.
    #[arg(long, conflicts_with = "snapshot")]
    input: Option<PathBuf>,

    /// Pretty-print the result.
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let settings = match fisight_core::config::Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(line) => {
            println!("{line}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %format!("{e:#}"), "prediction failed");
            println!("{}", error_line(&e));
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<String> {
    let raw = read_snapshot(args)?;
    let snapshot = contract::parse_snapshot(raw.as_bytes())?;
    let result = engine::evaluate(&snapshot);

    tracing::debug!(
        action = %result.predicted_action,
        confidence = result.confidence,
        "snapshot scored"
    );

    let line = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    Ok(line)
}

fn read_snapshot(args: &Args) -> anyhow::Result<String> {
    if let Some(raw) = &args.snapshot {
        return Ok(raw.clone());
    }
    if let Some(path) = &args.input {
        return std::fs::read_to_string(path)
            .with_context(|| format!("read snapshot file {}", path.display()));
    }

    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("read snapshot from stdin")?;
    Ok(raw)
}

/// Failures are reported on stdout as `{"error": ...}` so callers parsing
/// the first JSON line see them.
fn error_line(e: &anyhow::Error) -> String {
    serde_json::json!({ "error": format!("{e:#}") }).to_string()
}

fn init_sentry(settings: &fisight_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
