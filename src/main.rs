//! repin - pinned component version updater CLI
//!
//! Tracks the latest published version of named components (Docker Hub
//! images, PyPI packages), rewrites the files that pin those versions,
//! runs a verification command, persists the ledger, and commits the
//! change per component.

use clap::Parser;
use colored::Colorize;
use repin::cli::{CliArgs, Command};
use repin::ledger::Ledger;
use repin::progress::Progress;
use repin::registry::{CachedFetcher, HttpClient, RegistryFetcher, VersionFetcher};
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if args.verbose {
        eprintln!("repin v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Ledger: {}", args.config.display());
    }

    let mut ledger = Ledger::with_config_file(&args.config);
    ledger.load()?;

    if args.verbose && !args.config.is_file() {
        eprintln!("Ledger file {} does not exist yet", args.config.display());
    }

    // One cache object per invocation, in front of the real registries
    let client = HttpClient::new()?;
    let ttl = Duration::from_secs(args.cache_ttl * 24 * 60 * 60);
    let fetcher = CachedFetcher::with_ttl(RegistryFetcher::new(client), ttl);

    match args.command.clone() {
        Command::Check => run_check(&args, &mut ledger, &fetcher),
        Command::Summary => run_summary(&args, &mut ledger, &fetcher),
        Command::Update {
            dry_run,
            no_commit,
            no_test,
            test_command,
            test_dir,
            base_dir,
            print_yaml,
        } => {
            ledger.git_commit = !no_commit;
            ledger.test_command = if no_test { None } else { test_command };
            ledger.test_dir = test_dir;
            let base_dir = base_dir.unwrap_or_else(|| ledger.config_dir());
            run_update(&args, &mut ledger, &fetcher, &base_dir, dry_run, print_yaml)
        }
    }
}

/// `repin check`: report which components have a newer version
fn run_check(
    args: &CliArgs,
    ledger: &mut Ledger,
    fetcher: &dyn VersionFetcher,
) -> anyhow::Result<ExitCode> {
    let results = check_with_progress(args, ledger, fetcher)?;

    if !args.quiet {
        for (name, newer) in &results {
            if *newer {
                println!("{}: {}", name, "update available".green());
            } else {
                println!("{}: {}", name, "up to date".yellow());
            }
        }
    }

    let updatable = results.iter().filter(|(_, newer)| *newer).count();
    println!("{} component(s) can be updated", updatable);
    Ok(ExitCode::SUCCESS)
}

/// `repin summary`: one sorted line per component
fn run_summary(
    args: &CliArgs,
    ledger: &mut Ledger,
    fetcher: &dyn VersionFetcher,
) -> anyhow::Result<ExitCode> {
    check_with_progress(args, ledger, fetcher)?;
    for line in ledger.summarize() {
        println!("{}", line);
    }
    Ok(ExitCode::SUCCESS)
}

/// `repin update`: the full per-component pipeline
fn run_update(
    args: &CliArgs,
    ledger: &mut Ledger,
    fetcher: &dyn VersionFetcher,
    base_dir: &std::path::Path,
    dry_run: bool,
    print_yaml: bool,
) -> anyhow::Result<ExitCode> {
    if args.verbose && dry_run {
        eprintln!("Mode: dry-run");
    }

    check_with_progress(args, ledger, fetcher)?;
    let touched = ledger.update_all(base_dir, dry_run)?;

    if dry_run {
        println!(
            "{} {} file(s) would be updated",
            "(dry-run)".cyan(),
            touched
        );
    } else {
        println!("{} file(s) updated", touched);
    }

    if args.verbose && !ledger.journal.is_empty() {
        eprintln!();
        eprintln!("Journal:");
        for (component, steps) in ledger.journal.iter() {
            for (step, at) in steps {
                eprintln!("  {} {} {}", component, step.as_str(), at.to_rfc3339());
            }
        }
    }

    if print_yaml {
        print!("{}", ledger.to_yaml()?);
    }

    Ok(ExitCode::SUCCESS)
}

/// Run `check_all` behind a spinner (unless quiet)
fn check_with_progress(
    args: &CliArgs,
    ledger: &mut Ledger,
    fetcher: &dyn VersionFetcher,
) -> anyhow::Result<Vec<(String, bool)>> {
    let mut progress = Progress::new(!args.quiet);
    progress.spinner("Checking components...");
    let results = ledger.check_all(fetcher);
    progress.finish_and_clear();
    Ok(results?)
}
