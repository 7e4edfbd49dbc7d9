mod collect;
mod select;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "blogfeed")]
#[command(about = "Collect blog topic candidates and pick the day's topics")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch every RSS/Atom source into the inbox
    CollectFeeds {
        /// Append three offline test items
        #[arg(long)]
        seed: bool,

        /// Keep at most this many entries per feed
        #[arg(long, default_value_t = 25)]
        max_per_source: usize,
    },
    /// Fetch Hacker News and Reddit sources into the inbox
    CollectCommunity {
        /// Append three offline community test items
        #[arg(long)]
        seed: bool,

        /// Request at most this many posts per source
        #[arg(long, default_value_t = 20)]
        max_per_source: usize,

        /// Ignore posts older than this (at least 12)
        #[arg(long, default_value_t = 96)]
        max_age_hours: u32,
    },
    /// Score the inbox and write the selected topics
    Select {
        /// Number of topics to pick (at least 1)
        #[arg(long, default_value_t = 3)]
        count: usize,

        /// Only consider items published within this window (at least 6)
        #[arg(long, default_value_t = 72)]
        max_age_hours: u32,

        /// Minimum score for a candidate
        #[arg(long, default_value_t = 18.0)]
        min_score: f64,

        /// Let seed items compete with fetched ones
        #[arg(long)]
        include_seed: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = blogfeed_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::CollectFeeds {
            seed,
            max_per_source,
        }) => collect::run_collect_feeds(&config, seed, max_per_source).await?,
        Some(Commands::CollectCommunity {
            seed,
            max_per_source,
            max_age_hours,
        }) => {
            collect::run_collect_community(&config, seed, max_per_source, max_age_hours).await?;
        }
        Some(Commands::Select {
            count,
            max_age_hours,
            min_score,
            include_seed,
        }) => select::run_select(&config, count, max_age_hours, min_score, include_seed)?,
        None => Cli::command().print_help()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
