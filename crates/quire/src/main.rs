//! quire CLI - Markdown documentation server.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use quire_server::RenderMode;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

use commands::serve::ServeOptions;

#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "Markdown documentation server with source file inclusion")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to docs.toml config file
    #[arg(short, long, default_value = "docs.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve documentation pages over HTTP
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Render pages per request (live) or once at startup (cached).
        /// Defaults to cached when GAE_APPLICATION is set.
        #[arg(short, long)]
        mode: Option<RenderMode>,

        /// Open browser on start
        #[arg(long)]
        open: bool,
    },

    /// Render every page to HTML files
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Serve {
            port,
            host,
            mode,
            open,
        } => {
            let options = ServeOptions {
                port,
                host,
                mode,
                open,
            };
            commands::serve::run(&cli.config, options).await?;
        }
        Commands::Build { output } => {
            commands::build::run(&cli.config, output)?;
        }
    }

    Ok(())
}
