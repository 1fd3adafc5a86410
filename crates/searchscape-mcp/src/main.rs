//! SearchScape MCP server entry point.

use std::sync::Arc;
use tokio::sync::Mutex;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use searchscape_mcp::config::{ConfigOverrides, ServerConfig};
use searchscape_mcp::protocol::ProtocolHandler;
use searchscape_mcp::session::ImageSessionManager;
use searchscape_mcp::tools::ToolRegistry;
use searchscape_mcp::transport::StdioTransport;

#[derive(Parser)]
#[command(
    name = "searchscape-mcp",
    about = "MCP server for SearchScape: fetch images by prompt and transform them with hosted models",
    version
)]
struct Cli {
    #[command(flatten)]
    providers: ProviderArgs,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone, Default)]
struct ProviderArgs {
    /// Unsplash access key. Also reads UNSPLASH_ACCESS_KEY.
    #[arg(long, global = true)]
    unsplash_key: Option<String>,

    /// Hugging Face API key. Also reads HUGGING_FACE_API_KEY.
    #[arg(long, global = true)]
    hf_key: Option<String>,

    /// Unsplash API base URL. Also reads SEARCHSCAPE_UNSPLASH_URL.
    #[arg(long, global = true)]
    unsplash_url: Option<String>,

    /// Hugging Face inference base URL. Also reads SEARCHSCAPE_HF_URL.
    #[arg(long, global = true)]
    hf_url: Option<String>,

    /// Timeout for each outbound request, in seconds. Also reads SEARCHSCAPE_TIMEOUT_SECS.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

impl From<ProviderArgs> for ConfigOverrides {
    fn from(args: ProviderArgs) -> Self {
        Self {
            unsplash_key: args.unsplash_key,
            hf_key: args.hf_key,
            unsplash_url: args.unsplash_url,
            hf_url: args.hf_url,
            timeout_secs: args.timeout_secs,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve,

    /// Start MCP server over HTTP.
    #[cfg(feature = "sse")]
    ServeHttp {
        /// Listen address (host:port).
        #[arg(long, default_value = "127.0.0.1:3100")]
        addr: String,

        /// Bearer token for authentication.
        /// Also reads from SEARCHSCAPE_TOKEN env var.
        #[arg(long)]
        token: Option<String>,
    },

    /// Print server capabilities as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   searchscape-mcp completions bash > ~/.local/share/bash-completion/completions/searchscape-mcp
    ///   searchscape-mcp completions zsh > ~/.zfunc/_searchscape-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Launch interactive REPL mode.
    Repl,
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

    let config = ServerConfig::resolve(cli.providers.into());

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let session = Arc::new(Mutex::new(ImageSessionManager::new(&config)));
            let handler = ProtocolHandler::new(session);
            let transport = StdioTransport::new(handler);
            transport.run().await?;
        }

        #[cfg(feature = "sse")]
        Commands::ServeHttp { addr, token } => {
            use searchscape_mcp::config::{resolve_setting, TOKEN_ENV};
            use searchscape_mcp::transport::SseTransport;

            // Resolve token: CLI flag > env var
            let effective_token = resolve_setting(token, TOKEN_ENV);

            tracing::info!("SearchScape MCP server (HTTP)");
            if effective_token.is_some() {
                tracing::info!("Auth: bearer token required");
            }

            let session = Arc::new(Mutex::new(ImageSessionManager::new(&config)));
            let handler = ProtocolHandler::new(session);
            let transport = SseTransport::new(handler, effective_token);
            transport.run(&addr).await?;
        }

        Commands::Info => {
            let capabilities = searchscape_mcp::types::InitializeResult::default_result();
            let tools = ToolRegistry::list_tools();
            let info = serde_json::json!({
                "server": capabilities.server_info,
                "protocol_version": capabilities.protocol_version,
                "capabilities": capabilities.capabilities,
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "tool_count": tools.len(),
                "missing_credentials": config.missing_keys(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "searchscape-mcp", &mut std::io::stdout());
        }

        Commands::Repl => {
            let runtime = tokio::runtime::Handle::current();
            tokio::task::spawn_blocking(move || searchscape_mcp::repl::run(&config, runtime))
                .await??;
        }
    }

    Ok(())
}
