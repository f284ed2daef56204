//! CLI argument parsing module for repin

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tracks pinned component versions and rewrites the files that pin them
#[derive(Parser, Debug, Clone)]
#[command(name = "repin", version, about = "Pinned component version updater")]
pub struct CliArgs {
    /// Ledger file listing the tracked components
    #[arg(short, long, default_value = "components.yaml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable quiet mode - no progress display
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Fetch cache time-to-live in days (0 disables caching)
    #[arg(long, default_value_t = 3, global = true)]
    pub cache_ttl: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands mapping onto the ledger operations
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check which components have a newer published version
    Check,

    /// Print one line per component with current and next version
    Summary,

    /// Rewrite pinned files, run tests, save the ledger, and commit
    Update {
        /// Show what would change without writing files, the ledger, or
        /// commits; all validations still run
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Skip the per-component version-control commit
        #[arg(long)]
        no_commit: bool,

        /// Skip the verification command even if one is configured
        #[arg(long)]
        no_test: bool,

        /// Verification command run after each component's file rewrite
        #[arg(long)]
        test_command: Option<String>,

        /// Working directory for the verification command
        /// (default: the ledger file's directory)
        #[arg(long)]
        test_dir: Option<PathBuf>,

        /// Directory the components' target files are resolved under
        /// (default: the ledger file's directory)
        #[arg(long)]
        base_dir: Option<PathBuf>,

        /// Print the persisted YAML document after the run
        #[arg(long)]
        print_yaml: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["repin", "check"]);
        assert_eq!(args.config, PathBuf::from("components.yaml"));
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert_eq!(args.cache_ttl, 3);
        assert!(matches!(args.command, Command::Check));
    }

    #[test]
    fn test_config_flag() {
        let args = CliArgs::parse_from(["repin", "-c", "/srv/pins/components.yaml", "check"]);
        assert_eq!(args.config, PathBuf::from("/srv/pins/components.yaml"));

        // global flags also parse after the subcommand
        let args = CliArgs::parse_from(["repin", "check", "--config", "other.yaml"]);
        assert_eq!(args.config, PathBuf::from("other.yaml"));
    }

    #[test]
    fn test_quiet_and_verbose() {
        let args = CliArgs::parse_from(["repin", "-q", "summary"]);
        assert!(args.quiet);

        let args = CliArgs::parse_from(["repin", "--verbose", "summary"]);
        assert!(args.verbose);
    }

    #[test]
    fn test_cache_ttl() {
        let args = CliArgs::parse_from(["repin", "--cache-ttl", "0", "check"]);
        assert_eq!(args.cache_ttl, 0);
    }

    #[test]
    fn test_update_defaults() {
        let args = CliArgs::parse_from(["repin", "update"]);
        match args.command {
            Command::Update {
                dry_run,
                no_commit,
                no_test,
                test_command,
                test_dir,
                base_dir,
                print_yaml,
            } => {
                assert!(!dry_run);
                assert!(!no_commit);
                assert!(!no_test);
                assert!(test_command.is_none());
                assert!(test_dir.is_none());
                assert!(base_dir.is_none());
                assert!(!print_yaml);
            }
            _ => panic!("expected update subcommand"),
        }
    }

    #[test]
    fn test_update_dry_run_short_flag() {
        let args = CliArgs::parse_from(["repin", "update", "-n"]);
        assert!(matches!(
            args.command,
            Command::Update { dry_run: true, .. }
        ));
    }

    #[test]
    fn test_update_flags() {
        let args = CliArgs::parse_from([
            "repin",
            "update",
            "--dry-run",
            "--no-commit",
            "--test-command",
            "make test",
            "--test-dir",
            "/srv/app",
            "--base-dir",
            "/srv/deploy",
            "--print-yaml",
        ]);
        match args.command {
            Command::Update {
                dry_run,
                no_commit,
                no_test,
                test_command,
                test_dir,
                base_dir,
                print_yaml,
            } => {
                assert!(dry_run);
                assert!(no_commit);
                assert!(!no_test);
                assert_eq!(test_command.as_deref(), Some("make test"));
                assert_eq!(test_dir, Some(PathBuf::from("/srv/app")));
                assert_eq!(base_dir, Some(PathBuf::from("/srv/deploy")));
                assert!(print_yaml);
            }
            _ => panic!("expected update subcommand"),
        }
    }

    #[test]
    fn test_update_no_test() {
        let args = CliArgs::parse_from(["repin", "update", "--no-test"]);
        assert!(matches!(
            args.command,
            Command::Update { no_test: true, .. }
        ));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(CliArgs::try_parse_from(["repin"]).is_err());
    }
}
