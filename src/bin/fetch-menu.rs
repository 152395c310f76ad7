/// Fetch one day's menu, send the notification and print the result as JSON.
///
/// Usage: fetch-menu --date 2023/05/17 --school SLUG --menu-type lunch
use std::sync::Arc;

use clap::Parser;

use menu_notifier::{
    config::Config,
    services::{
        menu::{ErrorResponse, MenuFetcher},
        notifications::SmsNotifier,
    },
};

#[derive(Parser)]
#[command(name = "fetch-menu", about = "Fetch and normalize a school menu from Nutrislice")]
struct Args {
    /// Day to fetch, as YYYY/MM/DD
    #[arg(long)]
    date: String,

    /// Nutrislice school slug
    #[arg(long)]
    school: String,

    /// breakfast or lunch
    #[arg(long, default_value = "lunch")]
    menu_type: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let notifier = Arc::new(SmsNotifier::from_config(&config)?);
    let fetcher = MenuFetcher::from_config(&config, notifier)?;

    match fetcher.fetch(&args.date, &args.school, &args.menu_type).await {
        Ok(result) => println!("{}", serde_json::to_string_pretty(&result)?),
        Err(e) => {
            tracing::error!("Menu fetch failed: {}", e);
            println!("{}", serde_json::to_string_pretty(&ErrorResponse::from(&e))?);
            std::process::exit(1);
        }
    }

    Ok(())
}
