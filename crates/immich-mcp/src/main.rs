//! Immich MCP server entry point.

use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tokio_util::sync::CancellationToken;

use immich_mcp::config::ConnectionArgs;
use immich_mcp::context::AppContext;
use immich_mcp::protocol::ProtocolHandler;
use immich_mcp::resources::ResourceRegistry;
use immich_mcp::tools::ToolRegistry;
use immich_mcp::transport::StdioTransport;

#[derive(Parser)]
#[command(
    name = "immich-mcp",
    about = "MCP server exposing an Immich photo library to LLM agents",
    version
)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve,

    /// Start MCP server over HTTP.
    #[cfg(feature = "http")]
    ServeHttp {
        /// Listen address (host:port).
        #[arg(long, default_value = "127.0.0.1:3100")]
        addr: String,

        /// Bearer token required on /mcp.
        #[arg(long, env = "IMMICH_MCP_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Print server capabilities as JSON.
    Info,

    /// Connect to Immich and report what the API key can do.
    Check,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   immich-mcp completions bash > ~/.local/share/bash-completion/completions/immich-mcp
    ///   immich-mcp completions zsh > ~/.zfunc/_immich-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let context = Arc::new(connect(&cli.connection).await?);
            let handler = ProtocolHandler::new(context.clone());
            let transport = StdioTransport::new(handler);
            let result = transport.run().await;
            context.shutdown();
            result?;
        }

        #[cfg(feature = "http")]
        Commands::ServeHttp { addr, token } => {
            use immich_mcp::transport::HttpTransport;

            let context = Arc::new(connect(&cli.connection).await?);
            if token.is_some() {
                tracing::info!("Auth: bearer token required");
            }
            let handler = ProtocolHandler::new(context);
            HttpTransport::with_token(handler, token).run(&addr).await?;
        }

        Commands::Info => {
            let capabilities = immich_mcp::types::InitializeResult::default_result();
            let tools = ToolRegistry::list_tools();
            let resources = ResourceRegistry::list_resources();
            let templates = ResourceRegistry::list_templates();
            let info = serde_json::json!({
                "server": capabilities.server_info,
                "protocol_version": capabilities.protocol_version,
                "supported_versions": immich_mcp::types::SUPPORTED_VERSIONS,
                "capabilities": capabilities.capabilities,
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "tool_count": tools.len(),
                "resources": resources.iter().map(|r| &r.uri).collect::<Vec<_>>(),
                "resource_templates": templates.iter().map(|t| &t.uri_template).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Check => {
            let context = connect(&cli.connection).await?;
            let reachable = context.api().ping().await.unwrap_or(false);
            let version = match context.api().server_version().await {
                Ok(v) => Some(v.to_string()),
                Err(e) => {
                    tracing::warn!("Could not read server version: {e}");
                    None
                }
            };
            let report = context
                .prober()
                .probe_report(context.api(), &CancellationToken::new())
                .await?;
            let check = serde_json::json!({
                "reachable": reachable,
                "server_version": version,
                "permission_source": report.source,
                "permissions": report.capabilities,
            });
            println!("{}", serde_json::to_string_pretty(&check)?);
            if !reachable {
                std::process::exit(1);
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "immich-mcp", &mut std::io::stdout());
        }
    }

    Ok(())
}

async fn connect(args: &ConnectionArgs) -> anyhow::Result<AppContext> {
    let config = args.resolve()?;
    tracing::info!(base_url = %config.base_url(), "Immich MCP server");
    Ok(AppContext::connect(&config).await?)
}
