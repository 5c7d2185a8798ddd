use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use research_agent::api::{router, AppState};
use research_agent::config::{find_config_file, get_config, load_config, AgentConfig};
use research_agent::mcp::McpServer;
use research_agent::models::ResearchDependencies;
use research_agent::tools::ListSourcesTool;
use research_agent::utils::{HttpClient, HEALTH_TIMEOUT};
use research_agent::ResearchAgent;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// Research Agent - AI research assistant over REST and MCP
#[derive(Parser, Debug)]
#[command(name = "research-agent")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "AI research assistant exposing knowledge-base research tools over REST and MCP", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// MCP transport selection
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Transport {
    /// JSON-RPC over stdin/stdout (for Claude Desktop and similar clients)
    Stdio,
    /// Streamable HTTP with Server-Sent Events
    Http,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the REST API server
    Serve {
        /// Listen address (overrides the configured bind address)
        #[arg(long)]
        addr: Option<String>,
    },

    /// Run the MCP server
    Mcp {
        /// Transport to serve on
        #[arg(long, value_enum, default_value_t = Transport::Stdio)]
        transport: Transport,

        /// Listen address for the HTTP transport
        #[arg(long, default_value = "127.0.0.1:3001")]
        addr: String,
    },

    /// Run a one-shot research query in-process and print the answer
    Query {
        /// The research question
        query: String,

        /// Restrict searches to one source ID
        #[arg(long)]
        source_filter: Option<String>,

        /// Max results per internal search
        #[arg(long, default_value_t = 5)]
        match_count: usize,

        /// Allow the agent to fetch external web pages
        #[arg(long)]
        enable_web_search: bool,
    },

    /// List the knowledge sources available for searching
    Sources,

    /// Check the research endpoint's health
    Health,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("research_agent={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from file if specified or found in default locations
    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)?
    } else if let Some(config_path) = find_config_file() {
        tracing::info!("Using config file: {}", config_path.display());
        load_config(&config_path)?
    } else {
        get_config()
    };

    match cli.command {
        Some(Commands::Serve { addr }) => {
            serve(config, addr).await?;
        }

        Some(Commands::Mcp { transport, addr }) => {
            let server = McpServer::new(&config)?;
            match transport {
                Transport::Stdio => {
                    server.run().await?;
                }
                Transport::Http => {
                    let (bound_addr, handle) = server.run_http(&addr).await?;
                    tracing::info!("MCP server listening on {}", bound_addr);
                    handle
                        .await
                        .map_err(|e| anyhow::anyhow!("Server task failed: {}", e))?;
                }
            }
        }

        Some(Commands::Query {
            query,
            source_filter,
            match_count,
            enable_web_search,
        }) => {
            let agent = ResearchAgent::new(&config)?;
            let deps = ResearchDependencies {
                source_filter,
                match_count,
                enable_web_search,
            };

            let answer = agent.run(&query, &deps).await?;
            println!("{}", answer);
        }

        Some(Commands::Sources) => {
            let api_url = Url::parse(&config.api_url)?;
            let tool = ListSourcesTool::new(HttpClient::new(), api_url);
            println!("{}", tool.list().await?);
        }

        Some(Commands::Health) => {
            let health = fetch_health(&config).await?;
            println!("{}", serde_json::to_string_pretty(&health)?);
        }

        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "research-agent", &mut std::io::stdout());
        }

        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Run the REST API server until shutdown
async fn serve(config: AgentConfig, addr: Option<String>) -> Result<()> {
    let addr = addr.unwrap_or_else(|| config.bind_addr.clone());
    let state = AppState::new(Arc::new(config));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("REST API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("failed to install Ctrl+C handler");
    }
    tracing::info!("shutting down");
}

/// Probe the configured research endpoint's health route
async fn fetch_health(config: &AgentConfig) -> Result<serde_json::Value> {
    let url = Url::parse(&config.api_url)?.join("/api/research/health")?;
    let client = HttpClient::with_timeouts(HEALTH_TIMEOUT, Duration::from_secs(5));

    let response = client.client().get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("health endpoint returned status {}", status);
    }

    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_serve() {
        let cli = Cli::parse_from(["research-agent", "serve", "--addr", "127.0.0.1:9000"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Serve { addr: Some(ref a) }) if a == "127.0.0.1:9000"
        ));
    }

    #[test]
    fn test_cli_parses_query_flags() {
        let cli = Cli::parse_from([
            "research-agent",
            "query",
            "how do I configure tracing?",
            "--match-count",
            "7",
            "--enable-web-search",
        ]);
        match cli.command {
            Some(Commands::Query {
                query,
                match_count,
                enable_web_search,
                source_filter,
            }) => {
                assert_eq!(query, "how do I configure tracing?");
                assert_eq!(match_count, 7);
                assert!(enable_web_search);
                assert!(source_filter.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_mcp_defaults_to_stdio() {
        let cli = Cli::parse_from(["research-agent", "mcp"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Mcp {
                transport: Transport::Stdio,
                ..
            })
        ));
    }
}
