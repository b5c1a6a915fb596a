use clap::Parser;
use log::info;
use server::config::{ServerConfig, DEFAULT_DATA_FILE, DEFAULT_INDEX_FILE};
use server::leaderboard::Durability;
use server::network::Server;
use shared::{DEFAULT_HOST, DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// JSON file the leaderboard is persisted to
    #[arg(short, long, default_value = DEFAULT_DATA_FILE)]
    data_file: String,

    /// HTML page served at / and /index.html
    #[arg(short, long, default_value = DEFAULT_INDEX_FILE)]
    index_file: String,

    /// Answer 500 when a score cannot be persisted instead of reporting success
    #[arg(long)]
    strict_durability: bool,

    /// Keep the leaderboard in memory only
    #[arg(long)]
    in_memory: bool,
}

/// Parses command-line arguments, then serves the leaderboard until Ctrl+C.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let durability = if args.strict_durability {
        Durability::Strict
    } else {
        Durability::BestEffort
    };

    let config = ServerConfig::new()
        .with_host(args.host)
        .with_port(args.port)
        .with_data_file(args.data_file)
        .with_index_file(args.index_file)
        .with_durability(durability)
        .with_in_memory(args.in_memory);

    info!("Starting score server...");
    if config.in_memory {
        info!("Leaderboard is kept in memory only");
    } else {
        info!("Persisting leaderboard to {}", config.data_file.display());
    }

    let server = Server::new(&config).await?;
    info!("Open http://{} to view the leaderboard", server.local_addr()?);

    server.run().await?;

    Ok(())
}
