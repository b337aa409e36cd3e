// ── Bulk provisioning driver ──
//
// Provisions a batch of load-test campaigns without a backend batch
// primitive: create N campaigns with generated phone numbers, then
// optionally start each one. Requests go out strictly in index order,
// one in flight at a time, and a per-item failure is recorded and
// skipped rather than aborting the batch.

use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;
use tracing::{info, warn};

use dialdeck_api::{CampaignCreate, CampaignId, ConsoleClient, RetryConfig};

/// Retry template applied to every provisioned campaign.
fn simulation_retry_config() -> RetryConfig {
    RetryConfig {
        max_retries: 3,
        sync_initial_backoff_ms: 1_000,
        sync_backoff_multiplier: 2.0,
        callback_retry_delay_ms: 30_000,
        callback_timeout_ms: 600_000,
    }
}

/// Batch parameters. `settle` is the pause between the last request and
/// the completion signal, giving the backend a beat to register the new
/// campaigns before the caller reloads.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub num_campaigns: usize,
    pub calls_per_campaign: usize,
    pub concurrency_limit: u32,
    pub auto_start: bool,
    pub settle: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_campaigns: 5,
            calls_per_campaign: 20,
            concurrency_limit: 5,
            auto_start: true,
            settle: Duration::from_secs(1),
        }
    }
}

/// Where a run currently is. Per-item failure never moves the phase
/// backwards; `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationPhase {
    Idle,
    CreatingBatch,
    StartingBatch,
    Done,
}

/// Progress snapshot published over a watch channel after every step.
#[derive(Debug, Clone)]
pub struct SimulationProgress {
    pub phase: SimulationPhase,
    pub current: usize,
    pub total: usize,
    pub message: String,
}

impl SimulationProgress {
    fn idle() -> Self {
        Self {
            phase: SimulationPhase::Idle,
            current: 0,
            total: 0,
            message: String::new(),
        }
    }
}

/// Outcome of one run. Failed items carry the failure reason; they are
/// absent from the started list entirely (only created ids are started).
#[derive(Debug, Default)]
pub struct SimulationReport {
    pub created: Vec<Result<CampaignId, String>>,
    pub started: Vec<Result<CampaignId, String>>,
}

impl SimulationReport {
    /// Ids of campaigns that were actually created.
    pub fn created_ids(&self) -> Vec<CampaignId> {
        self.created.iter().filter_map(|r| r.clone().ok()).collect()
    }

    pub fn created_ok(&self) -> usize {
        self.created.iter().filter(|r| r.is_ok()).count()
    }

    pub fn started_ok(&self) -> usize {
        self.started.iter().filter(|r| r.is_ok()).count()
    }
}

/// Drives one provisioning batch. The caller is responsible for not
/// running two batches concurrently from the same console.
pub struct SimulationDriver {
    client: ConsoleClient,
    config: SimulationConfig,
    progress: watch::Sender<SimulationProgress>,
}

impl SimulationDriver {
    pub fn new(client: ConsoleClient, config: SimulationConfig) -> Self {
        let (progress, _) = watch::channel(SimulationProgress::idle());
        Self {
            client,
            config,
            progress,
        }
    }

    /// Subscribe to step-by-step progress for this run.
    pub fn subscribe(&self) -> watch::Receiver<SimulationProgress> {
        self.progress.subscribe()
    }

    /// Run the batch to completion. Per-item failures are logged and
    /// recorded in the report; only transport-free local work happens
    /// outside the two sequential request loops.
    pub async fn run(&self) -> SimulationReport {
        let total = self.config.num_campaigns;
        let mut report = SimulationReport::default();

        for i in 1..=total {
            self.publish(
                SimulationPhase::CreatingBatch,
                i - 1,
                total,
                format!("Creating campaign {i} of {total}"),
            );

            let request = self.build_campaign(i);
            match self.client.create_campaign(&request).await {
                Ok(campaign) => {
                    info!(campaign = %campaign.id, "provisioned {}", request.name);
                    report.created.push(Ok(campaign.id));
                }
                Err(e) => {
                    warn!(error = %e, "failed to create {}", request.name);
                    report.created.push(Err(e.to_string()));
                }
            }

            self.publish(
                SimulationPhase::CreatingBatch,
                i,
                total,
                format!("Created {i} of {total}"),
            );
        }

        if self.config.auto_start {
            let ids = report.created_ids();
            for (i, id) in ids.iter().enumerate() {
                self.publish(
                    SimulationPhase::StartingBatch,
                    i,
                    ids.len(),
                    format!("Starting campaign {} of {}", i + 1, ids.len()),
                );

                match self.client.start_campaign(*id).await {
                    Ok(_) => report.started.push(Ok(*id)),
                    Err(e) => {
                        warn!(campaign = %id, error = %e, "failed to start campaign");
                        report.started.push(Err(e.to_string()));
                    }
                }
            }
        }

        // Let the backend register the batch before the caller reloads.
        tokio::time::sleep(self.config.settle).await;

        self.publish(
            SimulationPhase::Done,
            total,
            total,
            format!(
                "Created {} of {total} campaigns ({} started)",
                report.created_ok(),
                report.started_ok(),
            ),
        );
        report
    }

    fn build_campaign(&self, index: usize) -> CampaignCreate {
        let phone_numbers = (0..self.config.calls_per_campaign)
            .map(|_| random_phone_number())
            .collect();

        CampaignCreate {
            name: format!("Simulation Campaign {index}"),
            description: Some(format!(
                "Load-test batch campaign with {} synthetic numbers",
                self.config.calls_per_campaign
            )),
            phone_numbers,
            concurrency_limit: self.config.concurrency_limit,
            priority: rand::rng().random_range(1..=10),
            retry_config: simulation_retry_config(),
            business_hours: None,
        }
    }

    fn publish(&self, phase: SimulationPhase, current: usize, total: usize, message: String) {
        self.progress.send_replace(SimulationProgress {
            phase,
            current,
            total,
            message,
        });
    }
}

/// A synthetic NANP-shaped number: `+1` followed by ten random digits.
fn random_phone_number() -> String {
    let digits = rand::rng().random_range(1_000_000_000_u64..10_000_000_000_u64);
    format!("+1{digits}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use uuid::Uuid;
    use wiremock::matchers::{body_string_contains, method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn created_body(name: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "name": name,
            "status": "PENDING",
            "concurrencyLimit": 5,
            "priority": 5
        })
    }

    fn driver_against(server: &MockServer, config: SimulationConfig) -> SimulationDriver {
        let client =
            ConsoleClient::from_reqwest(&server.uri(), reqwest::Client::new()).expect("client");
        SimulationDriver::new(client, config)
    }

    #[test]
    fn synthetic_numbers_are_plus_one_and_ten_digits() {
        for _ in 0..100 {
            let number = random_phone_number();
            assert_eq!(number.len(), 12);
            assert!(number.starts_with("+1"));
            assert!(number[2..].bytes().all(|b| b.is_ascii_digit()));
            assert_ne!(&number[2..3], "0", "leading digit is never zero");
        }
    }

    #[tokio::test]
    async fn partial_failure_continues_and_reports_completion() {
        let server = MockServer::start().await;

        // Campaigns #2 and #4 fail; the rest are created. Specific mocks
        // first so they win over the catch-all.
        for failing in ["Simulation Campaign 2", "Simulation Campaign 4"] {
            Mock::given(method("POST"))
                .and(path("/api/v1/campaigns"))
                .and(body_string_contains(failing))
                .respond_with(ResponseTemplate::new(500).set_body_string("provisioning error"))
                .expect(1)
                .mount(&server)
                .await;
        }
        Mock::given(method("POST"))
            .and(path("/api/v1/campaigns"))
            .respond_with(ResponseTemplate::new(201).set_body_json(created_body("sim")))
            .expect(3)
            .mount(&server)
            .await;

        // Only the three created campaigns get start requests.
        Mock::given(method("POST"))
            .and(path_regex(r"^/api/v1/campaigns/[0-9a-f-]+/start$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": Uuid::new_v4(),
                "name": "sim",
                "status": "IN_PROGRESS",
                "concurrencyLimit": 5,
                "priority": 5
            })))
            .expect(3)
            .mount(&server)
            .await;

        let config = SimulationConfig {
            num_campaigns: 5,
            calls_per_campaign: 3,
            settle: Duration::ZERO,
            ..SimulationConfig::default()
        };
        let driver = driver_against(&server, config);
        let progress = driver.subscribe();

        let report = driver.run().await;

        assert_eq!(report.created.len(), 5);
        assert_eq!(report.created_ok(), 3);
        assert_eq!(report.created_ids().len(), 3);
        assert_eq!(report.started.len(), 3);
        assert_eq!(report.started_ok(), 3);

        let last = progress.borrow();
        assert_eq!(last.phase, SimulationPhase::Done);
        assert_eq!(last.current, 5);
        assert_eq!(last.total, 5);
    }

    #[tokio::test]
    async fn auto_start_disabled_issues_no_start_requests() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/campaigns"))
            .respond_with(ResponseTemplate::new(201).set_body_json(created_body("sim")))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path_regex(r"/start$"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = SimulationConfig {
            num_campaigns: 2,
            calls_per_campaign: 1,
            auto_start: false,
            settle: Duration::ZERO,
            ..SimulationConfig::default()
        };
        let driver = driver_against(&server, config);

        let report = driver.run().await;
        assert_eq!(report.created_ok(), 2);
        assert!(report.started.is_empty());
    }

    #[tokio::test]
    async fn creation_payload_carries_the_retry_template() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/campaigns"))
            .and(body_string_contains("\"maxRetries\":3"))
            .and(body_string_contains("\"callbackTimeoutMs\":600000"))
            .respond_with(ResponseTemplate::new(201).set_body_json(created_body("sim")))
            .expect(1)
            .mount(&server)
            .await;

        let config = SimulationConfig {
            num_campaigns: 1,
            calls_per_campaign: 2,
            auto_start: false,
            settle: Duration::ZERO,
            ..SimulationConfig::default()
        };
        let driver = driver_against(&server, config);

        let report = driver.run().await;
        assert_eq!(report.created_ok(), 1);
    }
}
