//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - sets up logging and loads `.env`
//! - parses CLI arguments
//! - runs estimates (single or batch)
//! - prints reports and writes optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{BatchArgs, Command, EstimateArgs};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `lc` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Estimate(args) => handle_estimate(args),
        Command::Batch(args) => handle_batch(args),
        Command::Categories => {
            print!("{}", crate::report::format_categories());
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout stays clean for reports. `RUST_LOG` overrides
/// the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let config = args.cost.to_config(args.export.clone());
    let run = pipeline::run_estimate_file(&args.request, &config)?;

    print!("{}", crate::report::format_estimate(&run, args.explain));

    if let Some(path) = &config.export_report {
        crate::io::export::write_report_json(path, &run)?;
    }
    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = args.cost.to_config(None);
    let items = pipeline::run_batch(&args.requests, &config);

    for item in &items {
        println!("{}", crate::report::format_batch_line(item));
    }

    let failed = items.iter().filter(|i| i.result.is_err()).count();
    if failed > 0 {
        return Err(AppError::new(
            2,
            format!("{failed} of {} requests failed.", items.len()),
        ));
    }
    Ok(())
}

/// Rewrite argv so a bare request file means `lc estimate <file>`.
///
/// Rules:
/// - `lc req.json ...`         -> `lc estimate req.json ...`
/// - `lc`                      -> unchanged (clap prints usage)
/// - `lc --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1) else {
        return argv;
    };

    let is_top_level_flag_or_subcommand = arg1.starts_with('-')
        || matches!(arg1.as_str(), "help" | "estimate" | "batch" | "categories");
    if !is_top_level_flag_or_subcommand {
        argv.insert(1, "estimate".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_file_becomes_estimate() {
        assert_eq!(
            rewrite_args(args(&["lc", "bear.json", "--explain"])),
            args(&["lc", "estimate", "bear.json", "--explain"])
        );
    }

    #[test]
    fn subcommands_and_flags_untouched() {
        for argv in [
            args(&["lc"]),
            args(&["lc", "--help"]),
            args(&["lc", "-V"]),
            args(&["lc", "batch", "a.json"]),
            args(&["lc", "categories"]),
        ] {
            assert_eq!(rewrite_args(argv.clone()), argv);
        }
    }
}
