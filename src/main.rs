use clap::Parser;
use paddock::cli::{Cli, Commands};
use paddock::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        toml::from_str(include_str!("../config.toml.example")).expect("Invalid default config")
    });

    // Initialize telemetry
    let _telemetry = paddock::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Login(args) => {
            tracing::info!("Logging in to backend");
            args.execute(&config).await?;
        }
        Commands::Logout => {
            let client = paddock::api::BackendClient::new(&config.backend)?;
            match client.logout().await {
                Ok(envelope) if envelope.success => println!("Logged out."),
                Ok(envelope) => println!(
                    "Logout failed: {}",
                    envelope.error.or(envelope.message).unwrap_or_default()
                ),
                Err(e) => println!("Logout failed: {e}"),
            }
        }
        Commands::Watch(args) => {
            tracing::info!("Opening race list");
            args.execute(&config).await?;
        }
        Commands::Race(args) => {
            tracing::info!(market_id = %args.market_id, "Opening race window");
            args.execute(&config).await?;
        }
        Commands::Status(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Backend: {} (timeout {}s)",
                config.backend.base_url, config.backend.timeout_secs
            );
            println!(
                "  Schedule: <{}m {}s, <{}m {}s, <{}m {}s, else {}s, idle {}s",
                config.schedule.imminent_threshold_minutes,
                config.schedule.imminent_interval_secs,
                config.schedule.soon_threshold_minutes,
                config.schedule.soon_interval_secs,
                config.schedule.near_threshold_minutes,
                config.schedule.near_interval_secs,
                config.schedule.far_interval_secs,
                config.schedule.idle_interval_secs,
            );
            println!("  Credentials: {}", config.credentials.path.display());
            println!("  Log level: {}", config.telemetry.log_level);
        }
    }

    Ok(())
}
