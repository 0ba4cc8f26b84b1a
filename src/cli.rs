//! Command-line interface definitions for Portal de Notícias.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option can be provided via a command-line flag or an environment
//! variable, so the upstream API key never has to live in source.

use clap::{Args, Parser, Subcommand};

/// Default newsdata.io endpoint for the latest-news search.
pub const DEFAULT_BASE_URL: &str = "https://newsdata.io/api/1/latest";

/// Search phrase used when the caller sends no query.
pub const DEFAULT_QUERY: &str = "atualidades do mundo";

/// Command-line arguments for the Portal de Notícias application.
///
/// # Examples
///
/// ```sh
/// # Run the proxy and search page
/// NEWSDATA_API_KEY=pub_xxx portal_noticias serve --listen 0.0.0.0:3000
///
/// # Browse from the terminal against a running server
/// portal_noticias browse --server http://127.0.0.1:3000
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the news proxy endpoint and the search page
    Serve(ServeArgs),
    /// Search news interactively from the terminal through a running server
    Browse(BrowseArgs),
}

/// Options for `serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind the HTTP server to
    #[arg(short, long, env = "PORTAL_LISTEN", default_value = "127.0.0.1:3000")]
    pub listen: String,

    /// newsdata.io API key
    #[arg(long, env = "NEWSDATA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Upstream news search endpoint
    #[arg(long, env = "NEWSDATA_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Language filter sent upstream
    #[arg(long, env = "NEWSDATA_LANGUAGE", default_value = "pt")]
    pub language: String,

    /// Search phrase used when a request carries no query
    #[arg(long, env = "NEWS_DEFAULT_QUERY", default_value = DEFAULT_QUERY)]
    pub default_query: String,
}

/// Options for `browse`.
#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// Base URL of a running `serve` instance
    #[arg(short, long, env = "PORTAL_SERVER", default_value = "http://127.0.0.1:3000")]
    pub server: String,

    /// Search phrase used for the initial load
    #[arg(long, env = "NEWS_DEFAULT_QUERY", default_value = DEFAULT_QUERY)]
    pub default_query: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_parsing() {
        let cli = Cli::parse_from([
            "portal_noticias",
            "serve",
            "--listen",
            "0.0.0.0:8080",
            "--api-key",
            "pub_test",
        ]);

        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.listen, "0.0.0.0:8080");
                assert_eq!(args.api_key.as_deref(), Some("pub_test"));
                assert_eq!(args.language, "pt");
                assert_eq!(args.default_query, DEFAULT_QUERY);
            }
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn test_browse_short_flags() {
        let cli = Cli::parse_from(["portal_noticias", "browse", "-s", "http://localhost:9000"]);

        match cli.command {
            Command::Browse(args) => assert_eq!(args.server, "http://localhost:9000"),
            other => panic!("expected browse, got {other:?}"),
        }
    }
}
