//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Walk paged HTTP collections with resumable cursors
#[derive(Parser, Debug)]
#[command(name = "pagewalk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client settings file (YAML)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream a collection as JSON lines; the final cursor goes to stderr
    Walk {
        /// Collection URL
        url: url::Url,

        /// Resume from this cursor
        #[arg(long)]
        cursor: Option<String>,

        /// Backend filter (fresh start only)
        #[arg(long)]
        filter: Option<String>,

        /// Page size hint (fresh start only)
        #[arg(long, default_value = "0")]
        batch_size: usize,

        /// Maximum number of items (0 = all)
        #[arg(long, default_value = "0")]
        limit: usize,

        /// Ask for object descriptors only
        #[arg(long)]
        descriptors_only: bool,

        /// API key sent with every request
        #[arg(long, env = "PAGEWALK_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Header carrying the API key
        #[arg(long, default_value = "x-apikey")]
        api_key_header: String,

        /// Pretty-print each item
        #[arg(long)]
        pretty: bool,
    },

    /// Print the position record behind a cursor token
    DecodeCursor {
        /// Cursor token
        token: String,
    },

    /// Build a cursor token from a link and offset
    EncodeCursor {
        /// Page link to resume at
        link: String,

        /// Items to skip on that page
        #[arg(long, default_value = "0")]
        offset: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_walk() {
        let cli = Cli::try_parse_from([
            "pagewalk",
            "walk",
            "https://api.test/items",
            "--limit",
            "5",
            "--filter",
            "type:pdf",
            "--descriptors-only",
        ])
        .unwrap();

        match cli.command {
            Commands::Walk {
                url,
                limit,
                filter,
                descriptors_only,
                api_key_header,
                ..
            } => {
                assert_eq!(url.as_str(), "https://api.test/items");
                assert_eq!(limit, 5);
                assert_eq!(filter.as_deref(), Some("type:pdf"));
                assert!(descriptors_only);
                assert_eq!(api_key_header, "x-apikey");
            }
            other => panic!("Expected Walk, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_url() {
        assert!(Cli::try_parse_from(["pagewalk", "walk", "not a url"]).is_err());
    }

    #[test]
    fn test_parse_encode_cursor() {
        let cli = Cli::try_parse_from([
            "pagewalk",
            "-v",
            "encode-cursor",
            "https://api.test/items",
            "--offset",
            "3",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::EncodeCursor { offset: 3, .. }));
    }
}
