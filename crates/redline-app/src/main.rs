// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Redline — review risk findings against a document, accept rewrites, and
// export the revised version.
//
// Entry point. Initialises logging and configuration, then drives one review
// session from the command line.

mod services;
mod state;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use redline_core::error::Result;
use redline_core::human_errors::humanize_error;
use redline_core::types::{DocumentOrigin, FindingId};
use redline_core::{JsonFileAnalyzer, RedlineConfig};
use redline_document::DefaultExtractor;
use redline_overlay::Segment;
use tracing::{error, info, warn};

use services::data_dir;
use services::review::ReviewSession;
use state::ViewMode;

#[derive(Parser, Debug)]
#[command(name = "redline")]
#[command(
    version,
    about = "Overlay risk findings on a document, accept rewrites, export the revision"
)]
struct Args {
    /// Original document (.txt, .pdf, .doc, ...).
    document: PathBuf,

    /// Findings JSON from the analyzer: `{"risks": [...]}` or a chat
    /// completion wrapping it.
    #[arg(short, long)]
    findings: Option<PathBuf>,

    /// Declared MIME type of the document; the file extension is used if absent.
    #[arg(long)]
    mime: Option<String>,

    /// Accept these findings' rewrites, in order (zero-based ids).
    #[arg(short, long, value_delimiter = ',')]
    accept: Vec<usize>,

    /// Accept every rewrite on offer.
    #[arg(long, conflicts_with = "accept")]
    accept_all: bool,

    /// Offer a placeholder rewrite for findings that lack one.
    #[arg(long)]
    placeholders: bool,

    /// Panes to print.
    #[arg(long, value_enum, default_value_t = ViewMode::Split)]
    view: ViewMode,

    /// Directory the revised document is written to.
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Skip writing the revised document.
    #[arg(long)]
    no_export: bool,

    /// Settings file (defaults to the data directory's config.json).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("Redline starting");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let notice = humanize_error(&err);
            error!(%err, "review aborted");
            eprintln!("{}\n{}", notice.message, notice.suggestion);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config_path = args.config.clone().unwrap_or_else(data_dir::config_path);
    let config = RedlineConfig::load_or_default(&config_path)?;

    let bytes = std::fs::read(&args.document)?;
    let mut origin = DocumentOrigin::from_path(&args.document);
    if args.mime.is_some() {
        origin = DocumentOrigin::new(origin.file_name, args.mime.clone());
    }

    let analyzer = JsonFileAnalyzer::new(args.findings.clone()).fill_missing_rewrites(args.placeholders);

    let mut session = ReviewSession::new(config);
    session.set_view_mode(args.view);
    session.load(bytes, origin, &DefaultExtractor, &analyzer)?;

    println!("{}", session.summary());
    print_review(&session);

    let outcomes = if args.accept_all {
        session.accept_all()
    } else {
        args.accept
            .iter()
            .map(|&idx| (FindingId(idx), session.accept(FindingId(idx))))
            .collect()
    };
    for (id, outcome) in outcomes {
        match outcome {
            Ok(revision) => println!("accepted {id} (delta {:+})", revision.delta),
            Err(err) => {
                let notice = humanize_error(&err);
                warn!(finding = %id, %err, "rewrite not applied");
                println!("skipped {id}: {}", notice.message);
            }
        }
    }

    if args.no_export {
        return Ok(());
    }

    let result = session.export().await;
    session.finish_export(&result);
    println!("{}", session.export_progress().message);
    let artifact = result?;

    std::fs::create_dir_all(&args.out)?;
    let path = artifact.write_to(&args.out)?;
    println!("{} (sha256 {})", path.display(), artifact.sha256());
    Ok(())
}

fn print_review(session: &ReviewSession) {
    let mode = session.view_mode();
    if mode.shows_original() {
        match session.preview() {
            Some(preview) => println!(
                "original: {} ({:?}, {}, {} bytes)",
                preview.file_name(),
                preview.kind(),
                preview.mime_type(),
                preview.bytes().len()
            ),
            None => println!("original preview not available"),
        }
    }
    if !mode.shows_analysis() {
        return;
    }

    println!("\n{}\n", render_overlay(&session.segments()));
    for card in session.cards() {
        println!("{} [{}]", card.id, card.risk_level);
        if let Some(clause) = &card.clause {
            println!("  {clause}");
        }
        println!("  risk: {}", card.factor);
        println!("  suggestion: {}", card.suggestion);
        if let Some(rewrite) = &card.rewrite {
            println!("  rewrite: {rewrite}");
        }
    }
}

/// Inline rendering of the overlay: annotated statements are bracketed and
/// tagged with their finding id.
fn render_overlay(segments: &[Segment<'_>]) -> String {
    segments
        .iter()
        .map(|segment| match segment.finding() {
            Some((id, _)) => format!("[[{}]]{{{id}}}", segment.text),
            None => segment.text.to_owned(),
        })
        .collect()
}
