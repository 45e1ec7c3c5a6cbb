mod aggregate;
mod cli;
mod derive;
mod error;
mod export;
mod filter;
mod fmt;
mod importer;
mod kpi;
mod models;
mod settings;
mod store;

use std::env;

use clap::Parser;
use tracing_subscriber::{fmt as log_fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands, ConfigCommands};

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SHOPSCOPE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "shopscope=debug,info"
        } else {
            "shopscope=warn"
        })
    });

    let format = env::var("SHOPSCOPE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(log_fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(log_fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let file = cli.file.as_deref();

    let result = match cli.command {
        Commands::Summary { filter } => cli::summary::run(file, &filter),
        Commands::Trend {
            filter,
            granularity,
            measures,
            by,
        } => cli::trend::run(file, &filter, granularity, &measures, by),
        Commands::Breakdown {
            filter,
            by,
            measure,
            top,
            pareto,
        } => cli::breakdown::run(file, &filter, by, measure, top, pareto),
        Commands::Counts { filter, by } => cli::breakdown::counts(file, &filter, by),
        Commands::Channels { filter, measure } => cli::breakdown::channels(file, &filter, measure),
        Commands::Heatmap {
            filter,
            rows,
            cols,
            measure,
        } => cli::heatmap::run(file, &filter, rows, cols, measure),
        Commands::Rows { filter, limit } => cli::rows::run(file, &filter, limit),
        Commands::Export { filter, output } => cli::export::run(file, &filter, output),
        Commands::Options => cli::options::run(file),
        Commands::Status => cli::status::run(file),
        Commands::Demo { output, rows, seed } => cli::demo::run(&output, rows, seed),
        Commands::Config { command } => match command {
            ConfigCommands::Show => cli::config::show(),
            ConfigCommands::Use { path } => cli::config::use_file(&path),
            ConfigCommands::Set {
                granularity,
                top_n,
                currency,
            } => cli::config::set(granularity, top_n, currency),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
