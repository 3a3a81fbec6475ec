//! PAX form - command line driver for the application form engine
//!
//! Runs one form session: prefill from an extraction file, apply field
//! edits, validate, and print the canonical payload.

use anyhow::{Context, Result};
use clap::Parser;
use pax_form::form::{
    date, Clock, FieldName, FileSlot, FixedClock, SportEntry, SportLevel, SportList, SystemClock,
};
use pax_form::notify::{NotificationKind, RecordingNotifier};
use pax_form::outbound::{JsonWriterSink, SubmissionSink};
use pax_form::{FormConfig, FormSession};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pax-form")]
#[command(about = "Validate a PAX insurance application and print the prediction payload")]
struct Args {
    /// Extraction output to prefill from (deleted after reading)
    #[arg(short, long)]
    prefill: Option<PathBuf>,

    /// Field edit as name=value, e.g. firstName=Jane (repeatable)
    #[arg(short, long = "field", value_parser = parse_field)]
    fields: Vec<(FieldName, String)>,

    /// Sport as name[:hobby|competitive] (repeatable)
    #[arg(short, long = "sport", value_parser = parse_sport)]
    sports: Vec<SportEntry>,

    /// Evaluate ages as of this date instead of today
    #[arg(long, value_parser = parse_date)]
    today: Option<chrono::NaiveDate>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn parse_field(raw: &str) -> Result<(FieldName, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{raw}`"))?;
    let field = name.trim().parse::<FieldName>().map_err(|e| e.to_string())?;
    Ok((field, value.to_string()))
}

fn parse_sport(raw: &str) -> Result<SportEntry, String> {
    match raw.rsplit_once(':') {
        Some((name, level)) => {
            let level =
                SportLevel::parse(level).ok_or_else(|| format!("unknown sport level `{level}`"))?;
            Ok(SportEntry::new(name, level))
        }
        None => Ok(SportEntry::hobby(raw)),
    }
}

fn parse_date(raw: &str) -> Result<chrono::NaiveDate, String> {
    date::parse(raw).ok_or_else(|| format!("not a valid date: `{raw}`"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pax_form=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => FormConfig::load_from(path)?,
        None => FormConfig::load().context("Failed to load configuration")?,
    };

    let notifier = RecordingNotifier::new();
    let complete = match args.today {
        Some(today) => {
            let mut session = FormSession::new(config, notifier, FixedClock(today));
            run(&args, &mut session).await?
        }
        None => run(&args, &mut FormSession::new(config, notifier, SystemClock)).await?,
    };

    if !complete {
        std::process::exit(1);
    }
    Ok(())
}

async fn run<C: Clock>(
    args: &Args,
    session: &mut FormSession<RecordingNotifier, C>,
) -> Result<bool> {
    if let Some(path) = &args.prefill {
        let applied = session.start(&mut FileSlot::new(path));
        tracing::info!("Prefilled {applied} field(s) from {}", path.display());
    }

    for (field, value) in &args.fields {
        session.set_text(*field, value);
    }

    // Sports given on the command line replace any prefilled rows
    if let Some(sports) = SportList::from_entries(args.sports.clone()) {
        session.set_sports(sports);
    }

    let payload = session.submit();
    if let Some(payload) = &payload {
        let mut sink = JsonWriterSink::new(io::stdout());
        sink.deliver(payload).await?;
        session.acknowledge_submitted();
    }

    for notification in session.notifier().shown() {
        let tag = match notification.kind {
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
            NotificationKind::Success => "ok",
        };
        eprintln!("[{tag}] {}: {}", notification.title, notification.message);
    }

    Ok(payload.is_some())
}
