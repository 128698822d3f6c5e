//! Backend service access
//!
//! HTTP/JSON consumer for the local service that authenticates against the
//! exchange and serves market data. Nothing here owns a wire format; the
//! endpoints and envelopes are the backend's contract.

mod client;
mod types;

pub use client::BackendClient;
pub use types::{
    AccountResponse, AccountSummary, ApplicationReason, Envelope, FetchError, LoginRequest,
    LoginResponse, MarketDetailResponse, MarketsResponse, ServiceStatus,
};
