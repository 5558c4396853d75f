use anyhow::Context;
use clap::{Parser, Subcommand};
use libris::Stores;
use libris_kernel::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "libris-cli", version, about = "Libris library catalog service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server until Ctrl-C
    Serve {
        /// Override `server.host`
        #[arg(long)]
        host: Option<String>,
        /// Override `server.port`
        #[arg(long)]
        port: Option<u16>,
        /// Start with an empty catalog
        #[arg(long)]
        no_seed: bool,
    },
    /// Print the merged OpenAPI document
    Openapi,
    /// Print the effective settings as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load Libris settings")?;
    libris_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve {
            host,
            port,
            no_seed,
        } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            if no_seed {
                settings.catalog.seed_sample_books = false;
            }

            tracing::info!(env = ?settings.environment, "serving from CLI");
            libris::run(settings).await
        }
        Command::Openapi => {
            let registry = libris::registry(&Stores::new())?;
            let document = libris_http::router::openapi_document(&registry);
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(())
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}
