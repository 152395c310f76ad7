/// Send the fixed test SMS to NOTIFY_PHONE_NUMBER to check gateway wiring.
///
/// Usage: send-test-message [--to +15550100]
use clap::Parser;

use menu_notifier::{
    config::Config,
    models::notification::NotificationTarget,
    services::notifications::{send_test_message, SmsNotifier},
};

#[derive(Parser)]
#[command(name = "send-test-message", about = "Send a test SMS through the configured gateway")]
struct Args {
    /// Override the destination phone number
    #[arg(long)]
    to: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let notifier = SmsNotifier::from_config(&config)?;
    if !notifier.is_configured() {
        anyhow::bail!("SMS_GATEWAY_URL is not set");
    }

    let mut target = NotificationTarget::from_config(&config);
    if let Some(to) = args.to {
        target.phone_number = to;
    }

    send_test_message(&notifier, &target).await
}
