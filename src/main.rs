use anyhow::Context;

use guest_registration::cli::{Session, SessionEnd};
use guest_registration::config::ClientConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so prompts on stdout stay readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env().context("invalid configuration")?;

    eprintln!("🏨 Guest Registration v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: {}", config.api_url);
    eprintln!("   State: {}", config.store_path.display());
    eprintln!("   Type /quit to exit.");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut session = Session::from_config(&config, stdin, std::io::stdout())
        .await
        .context("failed to start registration session")?;

    match session.run().await? {
        SessionEnd::Registered(message) => println!("\n🎉 {message}"),
        SessionEnd::Aborted => {
            eprintln!("\nRegistration paused. Run again to pick up where you left off.")
        }
    }
    Ok(())
}
