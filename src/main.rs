//! Publii Export - dump a Publii site database into a browsable file tree.
//!
//! Reads the site's `db.sqlite` and writes one body file plus a JSON metadata
//! record per post or page, with authors, tags and media copied alongside:
//!
//!   publii-export path/to/input/db.sqlite
//!   publii-export db.sqlite --output dump --ids 3,7
//!   publii-export db.sqlite --no-images --no-authors

mod application;
mod cli;
mod domain;
mod infrastructure;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{
    format_disabled_warnings, format_event, format_summary, project_root, Exporter,
};
use cli::Cli;
use infrastructure::{load_config, FsLayout, SiteDbReader};

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(cli: &Cli) -> domain::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let options = cli
        .export_options(&config)
        .map_err(|message| domain::AppError::Config { message })?;

    println!(
        "{} v{}\n",
        "📦 publii-export".bold(),
        env!("CARGO_PKG_VERSION")
    );
    for warning in format_disabled_warnings(&options) {
        println!("{warning}");
    }

    // Fails before anything is written when the database is missing
    let reader = SiteDbReader::open(&cli.db)?;

    let report = Exporter::new(&reader, &FsLayout, &options, project_root(&cli.db))
        .run(|event| println!("{}", format_event(event)))?;

    println!();
    println!("{}", format_summary(&report, &options));

    Ok(())
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
