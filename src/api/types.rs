//! Wire types and the fetch error taxonomy

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::market::{MarketDetail, RaceSummary, RunnerQuote};

/// Why the backend declined a request that reached it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationReason {
    /// Market status CLOSED — the race has finished
    MarketClosed,
    /// Market status SUSPENDED — temporarily unavailable
    MarketSuspended,
    /// The backend holds no exchange session
    NotLoggedIn,
    /// Any other reported failure
    Other,
}

impl ApplicationReason {
    /// Classify a `success: false` envelope from its `market_status`
    /// and error text.
    pub fn classify(market_status: Option<&str>, error: Option<&str>) -> Self {
        match market_status {
            Some("CLOSED") => return Self::MarketClosed,
            Some("SUSPENDED") => return Self::MarketSuspended,
            _ => {}
        }
        if error.is_some_and(|e| e.contains("Not logged in")) {
            return Self::NotLoggedIn;
        }
        Self::Other
    }

    /// User-facing message; each reason maps to a distinct line.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MarketClosed => "This race has finished",
            Self::MarketSuspended => "Market is suspended",
            Self::NotLoggedIn => "Please log in first",
            Self::Other => "The backend rejected the request",
        }
    }
}

/// Errors from a single fetch against the backend.
///
/// None of these are fatal to a refresh cycle: the triggering operation
/// reduces them to a status message and keeps the last good state.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No usable connection to the backend service
    #[error("backend unreachable: {0}")]
    Transport(String),
    /// The backend answered `success: false` with a reason
    #[error("{}: {}", .reason.user_message(), .detail)]
    Application {
        reason: ApplicationReason,
        /// Raw error / user_message text from the envelope
        detail: String,
    },
    /// Payload did not match the documented shape
    #[error("malformed backend payload: {0}")]
    Data(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Data(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// Generic envelope for the control endpoints (`/logout`, `/status`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /login` request body; field names match the backend route.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub app_key: &'a str,
}

/// `POST /login` response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub session_token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LoginResponse {
    /// Reduce the envelope to a session token or a fetch error.
    pub fn into_token(self) -> Result<String, FetchError> {
        if !self.success {
            let detail = self.error.or(self.message).unwrap_or_default();
            let reason = ApplicationReason::classify(None, Some(&detail));
            return Err(FetchError::Application { reason, detail });
        }
        self.session_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| FetchError::Data("login succeeded without a session token".to_string()))
    }
}

/// `GET /account` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountSummary {
    #[serde(default)]
    pub available_to_bet_balance: Option<Decimal>,
    #[serde(default)]
    pub exposure: Option<Decimal>,
    #[serde(default)]
    pub retained_commission: Option<Decimal>,
    #[serde(default)]
    pub discount_rate: Option<Decimal>,
}

/// `GET /account` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub account: Option<AccountSummary>,
}

/// `GET /status` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceStatus {
    pub success: bool,
    #[serde(default)]
    pub logged_in: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /data/horse-markets` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketsResponse {
    pub markets: Vec<RaceSummary>,
    /// Display clock line from the server, when provided
    #[serde(default)]
    pub current_time_uk: Option<String>,
}

/// `GET /data/market-details/{market_id}` payload.
///
/// Three shapes share this struct: success with runner data, success=false
/// with a reason, and (upstream of parsing) transport failure.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketDetailResponse {
    pub success: bool,
    #[serde(default)]
    pub runners: Option<Vec<RunnerQuote>>,
    #[serde(default)]
    pub non_runner_count: u32,
    #[serde(default)]
    pub total_matched: Decimal,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub in_play: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub user_message: Option<String>,
    #[serde(default)]
    pub market_status: Option<String>,
}

impl MarketDetailResponse {
    /// Reduce the envelope to a `MarketDetail` or a classified error.
    pub fn into_detail(self) -> Result<MarketDetail, FetchError> {
        if !self.success {
            let reason =
                ApplicationReason::classify(self.market_status.as_deref(), self.error.as_deref());
            let detail = self
                .user_message
                .or(self.error)
                .unwrap_or_else(|| "no reason given".to_string());
            return Err(FetchError::Application { reason, detail });
        }

        let runners = self
            .runners
            .ok_or_else(|| FetchError::Data("market detail succeeded without runners".to_string()))?;

        Ok(MarketDetail {
            runners,
            non_runner_count: self.non_runner_count,
            total_matched: self.total_matched,
            status_message: self.status_message,
            in_play: self.in_play,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_closed() {
        let reason = ApplicationReason::classify(Some("CLOSED"), None);
        assert_eq!(reason, ApplicationReason::MarketClosed);
    }

    #[test]
    fn test_classify_suspended() {
        let reason = ApplicationReason::classify(Some("SUSPENDED"), Some("unavailable"));
        assert_eq!(reason, ApplicationReason::MarketSuspended);
    }

    #[test]
    fn test_classify_not_logged_in() {
        let reason = ApplicationReason::classify(None, Some("Not logged in"));
        assert_eq!(reason, ApplicationReason::NotLoggedIn);
    }

    #[test]
    fn test_classify_unknown_status_falls_through_to_error_text() {
        let reason = ApplicationReason::classify(Some("INACTIVE"), Some("Not logged in"));
        assert_eq!(reason, ApplicationReason::NotLoggedIn);
    }

    #[test]
    fn test_classify_other() {
        let reason = ApplicationReason::classify(None, Some("boom"));
        assert_eq!(reason, ApplicationReason::Other);
    }

    #[test]
    fn test_user_messages_are_distinct() {
        let messages = [
            ApplicationReason::MarketClosed.user_message(),
            ApplicationReason::MarketSuspended.user_message(),
            ApplicationReason::NotLoggedIn.user_message(),
            ApplicationReason::Other.user_message(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_detail_response_success() {
        let json = r#"{
            "success": true,
            "runners": [
                {"selection_id": 1, "name": "Dancing Brave", "back_price": 3.5,
                 "lay_price": 3.6, "last_price_traded": 3.55,
                 "status": "ACTIVE", "total_matched": 1200.0}
            ],
            "non_runner_count": 1,
            "total_matched": 54000.5,
            "status_message": " (2 NR)",
            "in_play": false
        }"#;
        let resp: MarketDetailResponse = serde_json::from_str(json).unwrap();
        let detail = resp.into_detail().unwrap();
        assert_eq!(detail.runners.len(), 1);
        assert_eq!(detail.non_runner_count, 1);
        assert!(!detail.in_play);
    }

    #[test]
    fn test_detail_response_closed() {
        let json = r#"{"success": false, "error": "market closed",
                       "user_message": "This race has ended", "market_status": "CLOSED"}"#;
        let resp: MarketDetailResponse = serde_json::from_str(json).unwrap();
        match resp.into_detail() {
            Err(FetchError::Application { reason, detail }) => {
                assert_eq!(reason, ApplicationReason::MarketClosed);
                assert_eq!(detail, "This race has ended");
            }
            other => panic!("expected application error, got {other:?}"),
        }
    }

    #[test]
    fn test_detail_response_success_without_runners_is_data_error() {
        let json = r#"{"success": true}"#;
        let resp: MarketDetailResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(resp.into_detail(), Err(FetchError::Data(_))));
    }

    #[test]
    fn test_login_response_token() {
        let json = r#"{"success": true, "session_token": "tok-123"}"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.into_token().unwrap(), "tok-123");
    }

    #[test]
    fn test_login_response_failure() {
        let json = r#"{"success": false, "error": "Missing credentials"}"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        match resp.into_token() {
            Err(FetchError::Application { reason, detail }) => {
                assert_eq!(reason, ApplicationReason::Other);
                assert_eq!(detail, "Missing credentials");
            }
            other => panic!("expected application error, got {other:?}"),
        }
    }

    #[test]
    fn test_login_response_success_without_token_is_data_error() {
        let json = r#"{"success": true}"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(resp.into_token(), Err(FetchError::Data(_))));
    }

    #[test]
    fn test_markets_response_requires_markets_key() {
        let result = serde_json::from_str::<MarketsResponse>(r#"{"success": true}"#);
        assert!(result.is_err());
    }
}
