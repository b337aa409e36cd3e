// Wire models for the voice-campaign backend.
//
// Field names mirror the backend's JSON contract exactly (camelCase, with
// enum values in SCREAMING_SNAKE_CASE). The console never owns canonical
// state: every value here is an eventually-consistent snapshot, replaced
// wholesale by the next successful fetch.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

/// Backend identifier for a campaign.
pub type CampaignId = Uuid;
/// Backend identifier for a single call attempt.
pub type CallId = Uuid;

// ── Status enums (consumed, not owned) ───────────────────────────────

/// Campaign lifecycle status. Transitions are enforced server-side; the
/// console only decides which actions to *offer* per status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Pending,
    InProgress,
    Paused,
    Completed,
    Failed,
    Cancelled,
    PermanentlyFailed,
    Scheduled,
}

impl CampaignStatus {
    /// Whether the start action is offered for this status.
    pub fn can_start(self) -> bool {
        matches!(self, Self::Pending | Self::Paused)
    }

    /// Whether the pause action is offered for this status.
    pub fn can_pause(self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// Whether the cancel action is offered for this status.
    pub fn can_cancel(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress | Self::Paused)
    }
}

/// Per-call status within a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CallStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    PermanentlyFailed,
}

// ── Campaign ─────────────────────────────────────────────────────────

/// A campaign as returned by the backend, with embedded aggregate metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: CampaignStatus,
    pub concurrency_limit: u32,
    pub priority: u8,
    #[serde(default)]
    pub retry_config: RetryConfig,
    #[serde(default)]
    pub business_hours: Option<BusinessHours>,
    #[serde(default)]
    pub metrics: CampaignMetrics,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Retry behaviour attached to a campaign. Enforced server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryConfig {
    pub max_retries: u32,
    pub sync_initial_backoff_ms: u64,
    pub sync_backoff_multiplier: f64,
    pub callback_retry_delay_ms: u64,
    pub callback_timeout_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            sync_initial_backoff_ms: 1_000,
            sync_backoff_multiplier: 2.0,
            callback_retry_delay_ms: 30_000,
            callback_timeout_ms: 120_000,
        }
    }
}

/// Optional server-enforced calling window.
///
/// `allowed_days` is a comma-joined list of weekday names (e.g.
/// `"MONDAY,TUESDAY"`) — the contract uses a flat string, never an array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessHours {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub timezone: String,
    pub allowed_days: String,
}

/// Aggregate call counters embedded in a campaign.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignMetrics {
    pub total_calls: u64,
    pub pending_calls: u64,
    pub in_progress_calls: u64,
    pub completed_calls: u64,
    pub failed_calls: u64,
    pub permanently_failed_calls: u64,
    pub total_retries: u64,
}

// ── Call ─────────────────────────────────────────────────────────────

/// One phone number's attempt record within a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub id: CallId,
    #[serde(default)]
    pub campaign_id: Option<CampaignId>,
    pub phone_number: String,
    pub status: CallStatus,
    #[serde(default)]
    pub retry_count: u32,
    #[serde(default)]
    pub last_attempted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub external_call_id: Option<String>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub call_duration_seconds: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

// ── Global metrics ───────────────────────────────────────────────────

/// Process-wide metrics snapshot. Treated as opaque: replaced wholesale
/// on each poll, never partially merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalMetrics {
    pub total_campaigns: u32,
    pub active_campaigns: u32,
    pub completed_campaigns: u32,

    pub total_calls: u64,
    pub pending_calls: u64,
    pub in_progress_calls: u64,
    pub completed_calls: u64,
    pub failed_calls: u64,
    pub permanently_failed_calls: u64,

    pub total_retries: u64,

    pub worker_pool_size: u32,
    pub active_worker_threads: u32,
    pub worker_thread_utilization_percent: f64,
    pub queue_depth: u64,

    pub total_concurrency_slots: u32,
    pub active_concurrency_slots: u32,
    pub concurrency_utilization_percent: f64,

    pub calls_per_second: f64,
    pub avg_call_duration_seconds: f64,
}

// ── Requests & import results ────────────────────────────────────────

/// Campaign creation payload.
///
/// `business_hours` is omitted from the JSON entirely when `None` — the
/// backend treats an empty object differently from an absent key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub phone_numbers: Vec<String>,
    pub concurrency_limit: u32,
    pub priority: u8,
    pub retry_config: RetryConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_hours: Option<BusinessHours>,
}

/// Result of a phone-number import (file or batch).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportResult {
    pub total_received: u32,
    pub total_imported: u32,
    pub duplicates_skipped: u32,
    pub invalid_skipped: u32,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campaign_deserializes_from_backend_shape() {
        let raw = serde_json::json!({
            "id": "6f2c0bd4-6a2f-4b6f-9d0e-1f4d9c8b7a65",
            "name": "Q1 Outreach",
            "description": null,
            "status": "IN_PROGRESS",
            "concurrencyLimit": 10,
            "priority": 5,
            "retryConfig": {
                "maxRetries": 3,
                "syncInitialBackoffMs": 1000,
                "syncBackoffMultiplier": 2.0,
                "callbackRetryDelayMs": 30000,
                "callbackTimeoutMs": 120000
            },
            "businessHours": {
                "startTime": "09:00:00",
                "endTime": "18:00:00",
                "timezone": "UTC",
                "allowedDays": "MONDAY,TUESDAY"
            },
            "metrics": { "totalCalls": 42, "completedCalls": 40 }
        });

        let campaign: Campaign = serde_json::from_value(raw).expect("should deserialize");
        assert_eq!(campaign.status, CampaignStatus::InProgress);
        assert_eq!(campaign.metrics.total_calls, 42);
        let hours = campaign.business_hours.expect("business hours present");
        assert_eq!(hours.allowed_days, "MONDAY,TUESDAY");
    }

    #[test]
    fn create_payload_omits_absent_business_hours() {
        let req = CampaignCreate {
            name: "test".into(),
            description: None,
            phone_numbers: vec!["+15551234567".into()],
            concurrency_limit: 10,
            priority: 5,
            retry_config: RetryConfig::default(),
            business_hours: None,
        };

        let value = serde_json::to_value(&req).expect("should serialize");
        assert!(value.get("businessHours").is_none());
    }

    #[test]
    fn status_display_matches_wire_form() {
        assert_eq!(CampaignStatus::PermanentlyFailed.to_string(), "PERMANENTLY_FAILED");
        assert_eq!(CallStatus::InProgress.to_string(), "IN_PROGRESS");
    }

    #[test]
    fn lifecycle_offerings_follow_status() {
        assert!(CampaignStatus::Pending.can_start());
        assert!(CampaignStatus::Paused.can_start());
        assert!(!CampaignStatus::Completed.can_start());
        assert!(CampaignStatus::InProgress.can_pause());
        assert!(!CampaignStatus::Paused.can_pause());
        assert!(CampaignStatus::Paused.can_cancel());
        assert!(!CampaignStatus::Cancelled.can_cancel());
    }
}
