use anyhow::{Context, Result, bail};
use clap::Parser;
use log::warn;
use netcall::{ClientConfig, JsonApi, JsonService, Network, api_call};
use serde_json::Value;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// netcall - call a JSON API through the response envelope wrapper
///
/// The server is expected to reply with {"code": .., "errorMsg": .., "data": ..}.
/// Transport and decoding failures are reported as code 1000.
///
/// Examples:
///   netcall --base-url https://api.example.com/v1 get users/1
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file (flags override its values)
    #[arg(long, short = 'c', value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Base URL endpoint paths are resolved against (also via NETCALL_BASE_URL)
    #[arg(
        long = "base-url",
        short = 'u',
        env = "NETCALL_BASE_URL",
        value_name = "URL",
        global = true
    )]
    pub base_url: Option<String>,

    /// Log request and response bodies
    #[arg(long, short = 'd', global = true)]
    pub debug: bool,

    /// Connect timeout in seconds (0 disables it)
    #[arg(long = "connect-timeout", value_name = "SECS", global = true)]
    pub connect_timeout: Option<u64>,

    /// Read timeout in seconds (0 disables it)
    #[arg(long = "read-timeout", value_name = "SECS", global = true)]
    pub read_timeout: Option<u64>,

    /// Write timeout in seconds (0 disables it)
    #[arg(long = "write-timeout", value_name = "SECS", global = true)]
    pub write_timeout: Option<u64>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Send a GET request
    Get(GetArgs),

    /// Send a POST request with a JSON body
    Post(PostArgs),
}

#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// Endpoint path, relative to the base URL
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Query parameter, may be repeated
    #[arg(long = "query", short = 'q', value_name = "KEY=VALUE")]
    pub query: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct PostArgs {
    /// Endpoint path, relative to the base URL
    #[arg(value_name = "PATH")]
    pub path: String,

    /// JSON request body
    #[arg(long, short = 'b', value_name = "JSON", default_value = "{}")]
    pub body: String,
}

impl Cli {
    fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match (&self.config, &self.base_url) {
            (Some(path), _) => ClientConfig::from_file(path)?,
            (None, Some(base_url)) => ClientConfig::new(base_url.as_str()),
            (None, None) => {
                bail!("No base URL given. Use --base-url, NETCALL_BASE_URL or --config.")
            }
        };

        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if self.debug {
            config.debug = true;
        }
        if let Some(secs) = self.connect_timeout {
            config.connect_timeout_secs = secs;
        }
        if let Some(secs) = self.read_timeout {
            config.read_timeout_secs = secs;
        }
        if let Some(secs) = self.write_timeout {
            config.write_timeout_secs = secs;
        }
        Ok(config)
    }
}

fn parse_query(pairs: &[String]) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => bail!("Invalid query parameter '{}'. Expected KEY=VALUE.", pair),
        })
        .collect()
}

/// Codes treated as success by the exit status.
fn is_ok_code(code: i32) -> bool {
    code == 0 || (200..300).contains(&code)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.client_config()?;

    let default_filter = if config.debug { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let network = Network::with_config(&config)?;
    let api: JsonService = network.service();
    let scope = CancellationToken::new();

    let response = match cli.command {
        Commands::Get(args) => {
            let query = parse_query(&args.query)?;
            api_call(&scope, move |_| async move {
                if query.is_empty() {
                    api.get(&args.path).await
                } else {
                    api.get_with_query(&args.path, &query).await
                }
            })
            .await
        }
        Commands::Post(args) => {
            let body: Value =
                serde_json::from_str(&args.body).context("--body is not valid JSON")?;
            api_call(&scope, move |_| async move { api.post(&args.path, &body).await }).await
        }
    };

    println!("{}", serde_json::to_string_pretty(&response)?);

    if scope.is_cancelled() {
        warn!("Session is no longer valid");
    }
    if !is_ok_code(response.code) {
        std::process::exit(1);
    }
    Ok(())
}
