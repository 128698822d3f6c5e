//! Login command implementation

use anyhow::Context;
use clap::Args;
use tokio::time::Instant;

use crate::api::BackendClient;
use crate::config::Config;
use crate::credentials::SavedCredentials;
use crate::telemetry::{record_latency, LatencyMetric};

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Exchange username (falls back to the saved value)
    #[arg(short, long)]
    pub username: Option<String>,

    /// Exchange password (falls back to the saved value)
    #[arg(short, long)]
    pub password: Option<String>,

    /// Application key (falls back to the saved value)
    #[arg(short, long)]
    pub app_key: Option<String>,

    /// Remember these credentials for the next session
    #[arg(long)]
    pub remember: bool,
}

impl LoginArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = BackendClient::new(&config.backend)?;

        if !client.health().await {
            tracing::warn!(base_url = %client.base_url(), "backend service is not responding");
            println!("Warning: backend service not running at {}", client.base_url());
        }

        let saved = SavedCredentials::load(&config.credentials.path)?;
        let username = self
            .username
            .clone()
            .or_else(|| non_empty(&saved.username))
            .context("username required (pass --username or save credentials)")?;
        let app_key = self
            .app_key
            .clone()
            .or_else(|| non_empty(&saved.app_key))
            .context("app key required (pass --app-key or save credentials)")?;
        let password = self
            .password
            .clone()
            .or_else(|| saved.password.clone())
            .context("password required (pass --password or save credentials)")?;

        let started = Instant::now();
        let token = client.login(&username, &password, &app_key).await?;
        record_latency(LatencyMetric::Login, started.elapsed());

        tracing::info!(username = %username, "login successful");
        println!(
            "Login successful (session token {}…)",
            &token[..8.min(token.len())]
        );

        if self.remember {
            let creds = SavedCredentials {
                username,
                app_key,
                remember: true,
                password: Some(password),
            };
            creds.save(&config.credentials.path)?;
            println!("Credentials saved to {}", config.credentials.path.display());
        } else {
            SavedCredentials::clear(&config.credentials.path)?;
        }

        Ok(())
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
