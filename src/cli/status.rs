//! Status command implementation

use clap::Args;

use crate::api::BackendClient;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct StatusArgs {}

impl StatusArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = BackendClient::new(&config.backend)?;

        let healthy = client.health().await;
        println!(
            "Backend: {} ({})",
            if healthy { "reachable" } else { "unreachable" },
            client.base_url()
        );
        if !healthy {
            return Ok(());
        }

        match client.status().await {
            Ok(status) => {
                let session = match status.logged_in {
                    Some(true) => "logged in",
                    Some(false) => "not logged in",
                    None => "unknown",
                };
                println!("Session: {session}");
                if let Some(message) = status.message.or(status.error) {
                    println!("  {message}");
                }
            }
            Err(e) => println!("Session: {e}"),
        }

        match client.account().await {
            Ok(account) => {
                if let Some(balance) = account.available_to_bet_balance {
                    println!("Balance: £{balance}");
                }
                if let Some(exposure) = account.exposure {
                    println!("Exposure: £{exposure}");
                }
            }
            Err(e) => println!("Account: {e}"),
        }

        Ok(())
    }
}
