//! HTTP client for the backend service
//!
//! The backend owns the exchange session; this client only consumes its
//! documented endpoints. Race-list responses must carry a 2xx status; the
//! market-detail endpoint reports failures inside the JSON envelope, so its
//! body is parsed regardless of status.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::types::{
    AccountResponse, AccountSummary, Envelope, FetchError, LoginRequest, LoginResponse,
    MarketDetailResponse, MarketsResponse, ServiceStatus,
};
use crate::config::BackendConfig;
use crate::market::{validate_snapshot, MarketDetail, MarketSource, RaceListPage};

/// Client for the local backend service.
pub struct BackendClient {
    base_url: String,
    client: Client,
}

impl BackendClient {
    /// Create a client from the backend section of the configuration.
    pub fn new(config: &BackendConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Base URL the client was built with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe `GET /health`; any reachable 2xx counts as healthy.
    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// Authenticate the backend against the exchange; returns the session
    /// token on success.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        app_key: &str,
    ) -> Result<String, FetchError> {
        let url = format!("{}/login", self.base_url);
        let body = LoginRequest {
            username,
            password,
            app_key,
        };

        tracing::debug!(url = %url, username = %username, "backend login");

        let resp = self.client.post(&url).json(&body).send().await?;
        // The backend reports login failures in the envelope with a non-2xx
        // status; parse the body either way.
        let text = resp.text().await?;
        let login: LoginResponse = serde_json::from_str(&text)
            .map_err(|e| FetchError::Data(format!("login response: {e}")))?;
        login.into_token()
    }

    /// Drop the backend's exchange session.
    pub async fn logout(&self) -> Result<Envelope, FetchError> {
        let url = format!("{}/logout", self.base_url);
        let resp = self.client.post(&url).send().await?;
        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| FetchError::Data(format!("logout response: {e}")))
    }

    /// Fetch the exchange account summary.
    pub async fn account(&self) -> Result<AccountSummary, FetchError> {
        let resp: AccountResponse = self.get_json("/account").await?;
        if !resp.success {
            let detail = resp.error.unwrap_or_default();
            let reason = super::types::ApplicationReason::classify(None, Some(&detail));
            return Err(FetchError::Application { reason, detail });
        }
        Ok(resp.account.unwrap_or_default())
    }

    /// Fetch the backend's session status.
    pub async fn status(&self) -> Result<ServiceStatus, FetchError> {
        self.get_json("/status").await
    }

    /// Fetch today's race list, validated against the snapshot invariant.
    pub async fn horse_markets(&self) -> Result<RaceListPage, FetchError> {
        let url = format!("{}/data/horse-markets", self.base_url);
        let resp = self.client.get(&url).send().await?.error_for_status()?;
        let text = resp.text().await?;
        let resp: MarketsResponse = serde_json::from_str(&text)
            .map_err(|e| FetchError::Data(format!("race list response: {e}")))?;
        validate_snapshot(&resp.markets)?;

        tracing::debug!(count = resp.markets.len(), "race list fetched");

        Ok(RaceListPage {
            races: resp.markets,
            current_time_uk: resp.current_time_uk,
        })
    }

    /// Fetch runners and prices for one market.
    pub async fn market_details(&self, market_id: &str) -> Result<MarketDetail, FetchError> {
        let url = format!("{}/data/market-details/{}", self.base_url, market_id);

        tracing::debug!(url = %url, "market detail fetch");

        let resp = self.client.get(&url).send().await?;
        // Failure envelopes (closed, suspended, not logged in) arrive with
        // non-2xx statuses; the body still carries the reason.
        let text = resp.text().await?;
        let detail: MarketDetailResponse = serde_json::from_str(&text)
            .map_err(|e| FetchError::Data(format!("market detail response: {e}")))?;
        detail.into_detail()
    }

    /// GET a JSON body from `path`. Envelope endpoints report failures via
    /// `success: false` rather than the status line, so the body is parsed
    /// regardless of status.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.get(&url).send().await?;
        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| FetchError::Data(format!("{path}: {e}")))
    }
}

#[async_trait]
impl MarketSource for BackendClient {
    async fn race_list(&self) -> Result<RaceListPage, FetchError> {
        self.horse_markets().await
    }

    async fn market_detail(&self, market_id: &str) -> Result<MarketDetail, FetchError> {
        self.market_details(market_id).await
    }
}
