//! CLI argument definitions using clap derive macros.

use clap::{Args, Parser, Subcommand};

/// Search XDCC indexers for files and print how to request them.
///
/// Queries every configured indexer at once and lists each matching pack
/// with the `/msg <bot> xdcc send <pack>` command that fetches it.
#[derive(Parser, Debug)]
#[command(name = "xdcc-search")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search indexers for packs matching the given keywords
    Search(SearchArgs),
}

/// Arguments for `xdcc-search search`.
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Keywords to search for
    #[arg(required = true, num_args = 1..)]
    pub keywords: Vec<String>,

    /// Print one JSON object per result instead of a table
    #[arg(long)]
    pub json: bool,

    /// Maximum number of results to keep (1-100000)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..=100_000))]
    pub max_results: Option<u32>,

    /// Per-indexer timeout in seconds (1-3600)
    #[arg(short = 't', long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    /// Override the xdcc.eu search endpoint
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn search_args(cli: Cli) -> SearchArgs {
        match cli.command {
            Command::Search(args) => args,
        }
    }

    #[test]
    fn test_cli_search_parses_keywords() {
        let cli = Cli::try_parse_from(["xdcc-search", "search", "ubuntu", "iso"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        let args = search_args(cli);
        assert_eq!(args.keywords, vec!["ubuntu", "iso"]);
        assert!(!args.json);
        assert!(args.max_results.is_none());
        assert!(args.timeout.is_none());
        assert!(args.endpoint.is_none());
    }

    #[test]
    fn test_cli_search_requires_keywords() {
        let err = Cli::try_parse_from(["xdcc-search", "search"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_cli_requires_subcommand() {
        let result = Cli::try_parse_from(["xdcc-search"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_verbose_flag_is_global() {
        let cli = Cli::try_parse_from(["xdcc-search", "search", "-vv", "x"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let cli = Cli::try_parse_from(["xdcc-search", "-q", "search", "x"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_search_options() {
        let cli = Cli::try_parse_from([
            "xdcc-search",
            "search",
            "--json",
            "-n",
            "50",
            "--timeout",
            "5",
            "--endpoint",
            "http://localhost:8080/search.php",
            "show",
        ])
        .unwrap();
        let args = search_args(cli);
        assert!(args.json);
        assert_eq!(args.max_results, Some(50));
        assert_eq!(args.timeout, Some(5));
        assert_eq!(
            args.endpoint.as_deref(),
            Some("http://localhost:8080/search.php")
        );
        assert_eq!(args.keywords, vec!["show"]);
    }

    #[test]
    fn test_cli_search_max_results_zero_rejected() {
        let err = Cli::try_parse_from(["xdcc-search", "search", "-n", "0", "x"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_search_timeout_over_max_rejected() {
        let err = Cli::try_parse_from(["xdcc-search", "search", "-t", "3601", "x"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Cli::try_parse_from(["xdcc-search", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
