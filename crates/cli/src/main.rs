use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use siftpage_core::{Candidates, SiftConfig, score_candidates};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::echo::{
    print_banner, print_info, print_page, print_scores, print_step, print_success, print_timing_summary,
    print_warning,
};
use crate::output::{Field, OutputFormat, render_extraction, render_field};

mod echo;
mod output;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Pick the best title, body text and image from candidate pages
#[derive(Parser, Debug)]
#[command(name = "siftpage")]
#[command(author = "Siftpage Contributors")]
#[command(version)]
#[command(about = "Pick the best title, text and image from candidate pages", long_about = None)]
struct Args {
    /// Candidate URLs, best first
    #[arg(value_name = "URLS", required = true, num_args = 1..)]
    urls: Vec<String>,

    /// Result to print (title, text, image, all)
    #[arg(long, default_value = "all", value_name = "FIELD")]
    field: Field,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Never download images to measure them
    #[arg(long)]
    no_probe: bool,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "siftpage_core=debug,warn" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_config(args: &Args) -> SiftConfig {
    let mut builder = SiftConfig::builder().timeout(args.timeout).probe_images(!args.no_probe);
    if let Some(user_agent) = &args.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }
    builder.build()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        print_banner();
        print_info(&format!("{} candidate url(s)", args.urls.len()));
        eprintln!();
    }

    let config = build_config(&args);
    debug!(?config, "configuration");
    let score_config = config.score.clone();
    let mut candidates =
        Candidates::with_config(args.urls.iter().cloned(), config).context("Failed to build HTTP client")?;

    let started = Instant::now();
    let mut timings: Vec<(String, Duration)> = Vec::new();

    if args.verbose {
        print_step(1, 3, "Fetching candidate pages");
    }

    let fetch_started = Instant::now();
    let pages = candidates.pages().await;
    timings.push(("Fetch".to_string(), fetch_started.elapsed()));

    if args.verbose {
        if pages.is_empty() {
            print_warning("No candidate page could be fetched");
        }
        for (index, page) in pages.iter().enumerate() {
            print_page(index, page);
            print_scores(&score_candidates(page.document(), &score_config), 3);
        }
        eprintln!();
        print_step(2, 3, "Picking results");
    }

    let pick_started = Instant::now();
    let rendered = match args.field {
        Field::Title => render_field("title", Some(candidates.best_title().await.as_str()), args.format)?,
        Field::Text => render_field("text", candidates.best_text().await.as_deref(), args.format)?,
        Field::Image => render_field("image", candidates.best_image().await.as_deref(), args.format)?,
        Field::All => render_extraction(&candidates.extract_all().await, args.format)?,
    };
    timings.push(("Pick".to_string(), pick_started.elapsed()));

    if args.verbose {
        eprintln!(
            "  {} {}",
            "Field:".dimmed(),
            format!("{:?}", args.field).bright_white()
        );
        eprintln!(
            "  {} {}",
            "Format:".dimmed(),
            format!("{:?}", args.format).bright_white()
        );
        eprintln!();
        print_step(3, 3, "Writing output");
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => print!("{}", rendered),
    }

    if args.verbose {
        eprintln!();
        print_timing_summary(started.elapsed(), &timings);
    }

    Ok(())
}
