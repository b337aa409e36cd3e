//! Async client for the voice-campaign backend's JSON/HTTP contract.

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::ConsoleClient;
pub use error::Error;
pub use models::{
    BusinessHours, Call, CallId, CallStatus, Campaign, CampaignCreate, CampaignId,
    CampaignMetrics, CampaignStatus, GlobalMetrics, ImportResult, RetryConfig,
};
pub use transport::TransportConfig;
