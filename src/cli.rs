//! CLI argument definitions using clap derive macros.
//!
//! Every search setting can also come from the environment (or a `.env`
//! file loaded at startup), so the tool runs unattended with no flags.

use std::fmt;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use imgsearch_core::{DEFAULT_URL_COLUMN, OffsetPolicy};
use imgsearch_core::search::DEFAULT_ENDPOINT;

/// Collect image search results into CSV and download the images.
///
/// Settings are read from flags, then environment variables, then a `.env`
/// file in the working directory.
#[derive(Parser, Debug)]
#[command(name = "imgsearch")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, env = "LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch paginated search results and save them as CSV
    Search(SearchArgs),
    /// Download the images listed in a results CSV
    Images(ImagesArgs),
}

#[derive(Args, Clone)]
pub struct SearchArgs {
    /// Search query text
    #[arg(long, env = "SEARCH_QUERY")]
    pub query: String,

    /// Custom Search API key
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Programmable search engine id (cx)
    #[arg(long, env = "SEARCH_ENGINE_ID")]
    pub search_engine_id: String,

    /// Total number of results to request
    #[arg(short = 'n', long, env = "TOTAL_RESULTS", default_value_t = 10)]
    pub total_results: usize,

    /// 0-based page to start from
    #[arg(short = 's', long, env = "START_PAGE_INDEX", default_value_t = 0)]
    pub start_page_index: usize,

    /// Directory the results CSV is written to
    #[arg(short = 'o', long, env = "OUTPATH", default_value = ".")]
    pub outpath: PathBuf,

    /// Extra API parameter as KEY=VALUE (repeatable), e.g. searchType=image
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// How page numbers map to the API start offset: legacy or one-based
    #[arg(long, env = "OFFSET_POLICY", default_value_t = OffsetPolicy::Legacy)]
    pub offset_policy: OffsetPolicy,

    /// Search API endpoint
    #[arg(long, env = "SEARCH_ENDPOINT", default_value = DEFAULT_ENDPOINT, hide = true)]
    pub endpoint: String,
}

impl fmt::Debug for SearchArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchArgs")
            .field("query", &self.query)
            .field("api_key", &"<redacted>")
            .field("search_engine_id", &self.search_engine_id)
            .field("total_results", &self.total_results)
            .field("start_page_index", &self.start_page_index)
            .field("outpath", &self.outpath)
            .field("params", &self.params)
            .field("offset_policy", &self.offset_policy)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[derive(Args, Debug, Clone)]
pub struct ImagesArgs {
    /// Results CSV produced by `imgsearch search`
    #[arg(long, env = "RESULTS_CSV")]
    pub csv: PathBuf,

    /// Column holding the image URLs
    #[arg(long, env = "URL_COLUMN", default_value = DEFAULT_URL_COLUMN)]
    pub column: String,

    /// Directory images are written to
    #[arg(short = 'o', long, env = "IMAGE_DIR", default_value = "images")]
    pub output_dir: PathBuf,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty parameter name in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    const SEARCH_REQUIRED: [&str; 8] = [
        "imgsearch",
        "search",
        "--query",
        "cats",
        "--api-key",
        "k",
        "--search-engine-id",
        "cx",
    ];

    fn search_args(extra: &[&str]) -> SearchArgs {
        let mut argv: Vec<&str> = SEARCH_REQUIRED.to_vec();
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Search(args) => args,
            Command::Images(_) => panic!("expected search"),
        }
    }

    /// Declared default of `arg` on `subcommand`, independent of the environment.
    fn declared_default(subcommand: &str, arg: &str) -> Vec<String> {
        let command = Cli::command();
        command
            .find_subcommand(subcommand)
            .unwrap()
            .get_arguments()
            .find(|candidate| candidate.get_id() == arg)
            .unwrap()
            .get_default_values()
            .iter()
            .map(|value| value.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_cli_search_defaults() {
        assert_eq!(declared_default("search", "total_results"), vec!["10"]);
        assert_eq!(declared_default("search", "start_page_index"), vec!["0"]);
        assert_eq!(declared_default("search", "outpath"), vec!["."]);
        assert_eq!(declared_default("search", "offset_policy"), vec!["legacy"]);
        assert_eq!(declared_default("search", "endpoint"), vec![DEFAULT_ENDPOINT]);

        let args = search_args(&[]);
        assert_eq!(args.query, "cats");
        assert!(args.params.is_empty());
    }

    #[test]
    fn test_cli_search_debug_redacts_api_key() {
        let cli = Cli::try_parse_from([
            "imgsearch",
            "search",
            "--query",
            "cats",
            "--api-key",
            "secret-key",
            "--search-engine-id",
            "cx",
        ])
        .unwrap();
        let rendered = format!("{cli:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_cli_search_numeric_flags() {
        let args = search_args(&["-n", "35", "-s", "2", "-o", "/tmp/out"]);
        assert_eq!(args.total_results, 35);
        assert_eq!(args.start_page_index, 2);
        assert_eq!(args.outpath, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_cli_search_repeated_params() {
        let args = search_args(&["-p", "searchType=image", "--param", "imgSize=large"]);
        assert_eq!(
            args.params,
            vec![
                ("searchType".to_string(), "image".to_string()),
                ("imgSize".to_string(), "large".to_string()),
            ]
        );
    }

    #[test]
    fn test_cli_search_param_without_equals_rejected() {
        let mut argv: Vec<&str> = SEARCH_REQUIRED.to_vec();
        argv.extend_from_slice(&["-p", "searchType"]);
        let err = Cli::try_parse_from(argv).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_search_offset_policy_flag() {
        let args = search_args(&["--offset-policy", "one-based"]);
        assert_eq!(args.offset_policy, OffsetPolicy::OneBased);
    }

    #[test]
    fn test_cli_search_negative_total_rejected() {
        let mut argv: Vec<&str> = SEARCH_REQUIRED.to_vec();
        argv.extend_from_slice(&["-n", "-5"]);
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_cli_images_defaults() {
        assert_eq!(declared_default("images", "column"), vec!["link"]);
        assert_eq!(declared_default("images", "output_dir"), vec!["images"]);

        let cli = Cli::try_parse_from(["imgsearch", "images", "--csv", "r.csv"]).unwrap();
        let Command::Images(args) = cli.command else {
            panic!("expected images");
        };
        assert_eq!(args.csv, PathBuf::from("r.csv"));
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["imgsearch", "images", "--csv", "r.csv", "-vv", "-q"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["imgsearch"]).is_err());
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Cli::try_parse_from(["imgsearch", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Cli::try_parse_from(["imgsearch", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_parse_key_value_keeps_equals_in_value() {
        assert_eq!(
            parse_key_value("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("=x").is_err());
    }
}
