// ABOUTME: CLI entry point for the pcbook laptop client.
// ABOUTME: Logs in once, keeps the token fresh in the background, and runs one command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pcbook_client::{sample, ClientConfig, ClientError, LaptopClient};

#[derive(Parser)]
#[command(name = "pcbook-client")]
#[command(about = "Client for the pcbook laptop service")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.config/pcbook/client.toml)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Server address (e.g., http://localhost:8080)
    #[arg(long, env = "PCBOOK_SERVER", global = true)]
    server: Option<String>,

    #[arg(long, env = "PCBOOK_USERNAME", global = true)]
    username: Option<String>,

    #[arg(long, env = "PCBOOK_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create random sample laptops
    Create {
        #[arg(long, short = 'n', default_value_t = 1)]
        count: usize,
    },

    /// Search laptops matching a filter
    Search {
        #[arg(long, default_value_t = 3000.0)]
        max_price: f64,

        #[arg(long, default_value_t = 4)]
        min_cores: u32,

        #[arg(long, default_value_t = 2.5)]
        min_ghz: f64,

        #[arg(long, default_value_t = 8)]
        min_ram_gb: u64,
    },

    /// Upload an image for a laptop
    UploadImage {
        laptop_id: String,
        path: PathBuf,
    },

    /// Rate one or more laptops
    Rate {
        #[arg(required = true)]
        laptop_ids: Vec<String>,

        /// Score to give every laptop (random 1-10 if omitted)
        #[arg(long)]
        score: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    pcbook_log::init_for(&["pcbook-client", "pcbook-auth"], tracing::Level::INFO);

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ClientConfig::load(path),
        None => ClientConfig::load_default(),
    }
    .context("Failed to load config")?
    .with_overrides(cli.server, cli.username, cli.password);

    tracing::info!(server = %config.server, "dial server");
    let (laptops, auth) = pcbook_client::connect(&config)
        .await
        .context("Failed to connect to pcbook server")?;

    let result = run(cli.command, &laptops).await;
    auth.shutdown().await;
    result
}

async fn run(command: Commands, laptops: &LaptopClient) -> Result<()> {
    match command {
        Commands::Create { count } => {
            for _ in 0..count {
                match laptops.create_laptop(sample::new_laptop()).await {
                    Ok(id) => println!("{}", id),
                    Err(ClientError::AlreadyExists(id)) => {
                        // not a big deal
                        tracing::info!(laptop_id = %id, "laptop already exists");
                    }
                    Err(e) => return Err(e).context("Failed to create laptop"),
                }
            }
        }

        Commands::Search {
            max_price,
            min_cores,
            min_ghz,
            min_ram_gb,
        } => {
            let filter = sample::new_filter(max_price, min_cores, min_ghz, min_ram_gb);
            let found = laptops
                .search_laptop(filter)
                .await
                .context("Failed to search laptops")?;
            for laptop in &found {
                println!(
                    "{}  {} {}  ${:.2}",
                    laptop.id, laptop.brand, laptop.name, laptop.price_usd
                );
            }
            tracing::info!(count = found.len(), "search finished");
        }

        Commands::UploadImage { laptop_id, path } => {
            let response = laptops
                .upload_image(&laptop_id, &path)
                .await
                .context("Failed to upload image")?;
            println!("{} ({} bytes)", response.id, response.size);
        }

        Commands::Rate { laptop_ids, score } => {
            let ratings = laptop_ids
                .into_iter()
                .map(|id| (id, score.unwrap_or_else(sample::random_score)))
                .collect();
            let replies = laptops
                .rate_laptop(ratings)
                .await
                .context("Failed to rate laptops")?;
            for reply in replies {
                println!(
                    "{}  rated {} times, average {:.2}",
                    reply.laptop_id, reply.rated_count, reply.average_score
                );
            }
        }
    }

    Ok(())
}
