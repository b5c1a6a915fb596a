use clap::{Parser, Subcommand};
use client::network::LeaderboardClient;
use client::rendering::render_leaderboard;
use client::score_argument;
use log::{error, info};
use shared::Submission;
use tokio::time::{interval, Duration, MissedTickBehavior};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the score server
    #[arg(short = 's', long, default_value = "http://127.0.0.1:8000")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a score for a player
    Submit {
        /// Player name
        #[arg(short, long)]
        username: Option<String>,

        /// Score to submit; non-numeric values are recorded as 0
        #[arg(short = 'S', long, allow_hyphen_values = true)]
        score: Option<String>,
    },

    /// Print the ranked leaderboard
    Leaderboard {
        /// Show at most this many rows
        #[arg(short, long)]
        limit: Option<usize>,

        /// Refresh every N seconds until Ctrl+C
        #[arg(short, long)]
        watch: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let client = LeaderboardClient::new(&args.server)?;
    info!("Using server {}", client.base_url());

    match args.command {
        Command::Submit { username, score } => {
            let submission = Submission {
                username,
                score: score.as_deref().map(score_argument),
            };
            let reply = client.submit_score(&submission).await?;
            println!("{}", reply);
        }
        Command::Leaderboard { limit, watch: None } => {
            let ranked = client.fetch_leaderboard().await?;
            print!("{}", render_leaderboard(&ranked, limit));
        }
        Command::Leaderboard {
            limit,
            watch: Some(seconds),
        } => {
            let mut refresh = interval(Duration::from_secs(seconds.max(1)));
            refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = refresh.tick() => {
                        match client.fetch_leaderboard().await {
                            Ok(ranked) => {
                                // Clear the terminal before redrawing
                                print!("\x1B[2J\x1B[H{}", render_leaderboard(&ranked, limit));
                            }
                            Err(e) => error!("Unable to load leaderboard: {}", e),
                        }
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
        }
    }

    Ok(())
}
