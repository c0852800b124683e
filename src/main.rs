use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use youtube_summary::provider::{TranscriptProvider, YoutubeProvider};
use youtube_summary::{Cli, Commands, Config, McpServer, TranscriptTools};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);

    let config = Config::load(cli.config.as_deref()).await?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let server = McpServer::new(build_tools(&config)?, config.server.clone());
            server.serve_stdio().await?;
        }
        Commands::Transcript {
            url,
            languages,
            format,
            preserve_formatting,
        } => {
            let tools = build_tools(&config)?;
            let output = tools
                .get_transcript(&url, Some(languages), &format, preserve_formatting)
                .await;
            println!("{}", output);
        }
        Commands::Summarize { url, prompt, languages } => {
            let tools = build_tools(&config)?;
            println!("{}", tools.summarize_transcript(&url, prompt, Some(languages)).await);
        }
        Commands::List { url } => {
            let tools = build_tools(&config)?;
            println!("{}", tools.list_transcripts(&url).await);
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                let path = config.save(cli.config.as_deref()).await?;
                println!("Configuration written to: {}", path.display());
            }
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout belongs to the MCP client
fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose { "youtube_summary=debug" } else { "youtube_summary=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn build_tools(config: &Config) -> Result<TranscriptTools> {
    let provider = YoutubeProvider::new(&config.http)?;
    tracing::debug!("Using {} transcript provider", provider.provider_name());

    Ok(TranscriptTools::new(Arc::new(provider), config.transcripts.clone()))
}
