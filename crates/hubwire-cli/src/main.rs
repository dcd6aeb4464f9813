//! Hubwire CLI - low-level command-line interface to the GitHub API.

mod offline;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hubwire_core::{Config, Connection, Method, Pager, Params, DEFAULT_ENDPOINT};

/// Environment variable holding the API token.
const TOKEN_ENV: &str = "HUBWIRE_TOKEN";

/// Environment variable holding the log-level filter.
const LOG_ENV: &str = "HUBWIRE_LOG";

#[derive(Parser)]
#[command(name = "hubwire")]
#[command(author, version, about = "Low level CLI to the GitHub API", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// API token (overrides HUBWIRE_TOKEN and the config file)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a request and print the parsed response as JSON
    Send {
        /// HTTP method (GET, POST, PATCH, DELETE, ...)
        method: String,

        /// Request URI relative to the endpoint (e.g. /user/issues)
        uri: String,

        /// Request parameters as key=value pairs
        params: Vec<String>,

        /// Request body, or @path to read it from a file
        #[arg(short, long)]
        data: Option<String>,

        /// Paginate a GET request, printing one JSON document per page
        /// (0 follows pagination to the end)
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Generate an offline directory listing from a file of issues
    IssuesTree {
        /// Path to JSON-encoded issues (e.g. saved pages of /repos/:o/:r/issues)
        issues: PathBuf,

        /// Directory to create the listing in
        outdir: PathBuf,

        /// Keep existing state/labels/assignee indexes (use with care)
        #[arg(long)]
        no_init: bool,
    },
}

/// Split `key=value` command-line parameters into a request parameter set.
fn parse_params(pairs: &[String]) -> anyhow::Result<Params> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(key, val)| (key.to_string(), val.to_string()))
                .ok_or_else(|| anyhow::anyhow!("invalid parameter (expected key=value): {pair}"))
        })
        .collect()
}

/// Resolve the request body: literal string, or `@path` to read a file.
fn resolve_body(data: Option<String>) -> anyhow::Result<Option<String>> {
    match data {
        Some(data) => {
            if let Some(path) = data.strip_prefix('@') {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read body from {path}"))?;
                Ok(Some(contents))
            } else {
                Ok(Some(data))
            }
        }
        None => Ok(None),
    }
}

/// Build a connection from flag > environment > config file, in that order.
fn connect(flag_token: Option<String>) -> anyhow::Result<Connection> {
    let config = Config::load()?;
    let token = flag_token
        .or_else(|| std::env::var(TOKEN_ENV).ok())
        .or(config.token);
    let endpoint = config
        .endpoint
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    Ok(Connection::with_endpoint(endpoint, token.as_deref()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays valid JSON
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Send {
            method,
            uri,
            params,
            data,
            max_pages,
        } => {
            let conn = connect(cli.token)?;
            let params = parse_params(&params)?;
            let body = resolve_body(data)?;
            let method: Method = method
                .to_uppercase()
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid HTTP method: {method}"))?;

            match max_pages {
                Some(max) if method == Method::GET => {
                    let mut pager = Pager::new(&conn, uri.as_str(), params, max);
                    while let Some(page) = pager.next_page().await? {
                        println!("{}", serde_json::to_string_pretty(&page)?);
                    }
                }
                Some(_) => anyhow::bail!("--max-pages only applies to GET requests"),
                None => {
                    let response = conn.send(method, &uri, Some(&params), body).await?;
                    println!("{}", serde_json::to_string_pretty(&response.parsed)?);
                }
            }
        }

        Commands::IssuesTree {
            issues,
            outdir,
            no_init,
        } => {
            offline::generate(&issues, &outdir, !no_init)?;
        }
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_params() {
        let params = parse_params(&["state=open".to_string(), "per_page=100".to_string()]).unwrap();
        assert_eq!(params.get("state").map(String::as_str), Some("open"));
        assert_eq!(params.get("per_page").map(String::as_str), Some("100"));
    }

    #[test]
    fn test_parse_params_keeps_equals_in_value() {
        let params = parse_params(&["q=label=bug".to_string()]).unwrap();
        assert_eq!(params.get("q").map(String::as_str), Some("label=bug"));
    }

    #[test]
    fn test_parse_params_rejects_bare_words() {
        assert!(parse_params(&["not-a-pair".to_string()]).is_err());
    }

    #[test]
    fn test_resolve_body_literal() {
        let body = resolve_body(Some("{\"a\":1}".to_string())).unwrap();
        assert_eq!(body.as_deref(), Some("{\"a\":1}"));
        assert_eq!(resolve_body(None).unwrap(), None);
    }

    #[test]
    fn test_resolve_body_from_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "file contents").unwrap();

        let arg = format!("@{}", file.path().display());
        let body = resolve_body(Some(arg)).unwrap();
        assert_eq!(body.as_deref(), Some("file contents"));
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
