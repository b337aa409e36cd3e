// Campaign backend HTTP client
//
// Wraps `reqwest::Client` with versioned URL construction and uniform
// non-2xx error mapping. Pure I/O boundary: no retry, caching, or state
// of its own — polling and batch orchestration live in `dialdeck-core`.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{
    Call, CallId, CallStatus, Campaign, CampaignCreate, CampaignId, GlobalMetrics, ImportResult,
};
use crate::transport::TransportConfig;

/// All endpoints live under this versioned base path.
const API_BASE: &str = "api/v1/";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TriggerCallRequest<'a> {
    phone_number: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchImportRequest<'a> {
    phone_numbers: &'a [String],
}

/// Async client for the voice-campaign backend.
///
/// Every method issues exactly one request and returns the deserialized
/// payload. Any non-2xx response becomes [`Error::Api`] carrying the raw
/// body as a human-readable message — the contract has no structured
/// error envelope.
#[derive(Clone)]
pub struct ConsoleClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ConsoleClient {
    /// Create a new client from a backend root URL and transport config.
    ///
    /// The `base_url` should be the server root (e.g.
    /// `http://localhost:8080`); the `/api/v1` prefix is appended here.
    pub fn new(base_url: &Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url.as_str(), http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let mut url = Url::parse(base_url)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/{API_BASE}"));
        Ok(Self {
            http,
            base_url: url,
        })
    }

    /// The backend base URL (including the `/api/v1/` prefix).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Metrics ──────────────────────────────────────────────────────

    /// GET `/metrics` — the process-wide metrics snapshot.
    pub async fn global_metrics(&self) -> Result<GlobalMetrics, Error> {
        self.get(self.url("metrics")?).await
    }

    // ── Campaigns ────────────────────────────────────────────────────

    /// GET `/campaigns` — the full campaign set.
    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>, Error> {
        self.get(self.url("campaigns")?).await
    }

    /// GET `/campaigns/{id}`.
    pub async fn get_campaign(&self, id: CampaignId) -> Result<Campaign, Error> {
        self.get(self.url(&format!("campaigns/{id}"))?).await
    }

    /// POST `/campaigns` — create a campaign, returning the created record.
    pub async fn create_campaign(&self, req: &CampaignCreate) -> Result<Campaign, Error> {
        self.post(self.url("campaigns")?, req).await
    }

    /// POST `/campaigns/{id}/start` — returns the updated campaign.
    pub async fn start_campaign(&self, id: CampaignId) -> Result<Campaign, Error> {
        self.post_empty(self.url(&format!("campaigns/{id}/start"))?)
            .await
    }

    /// POST `/campaigns/{id}/pause` — returns the updated campaign.
    pub async fn pause_campaign(&self, id: CampaignId) -> Result<Campaign, Error> {
        self.post_empty(self.url(&format!("campaigns/{id}/pause"))?)
            .await
    }

    /// POST `/campaigns/{id}/cancel` — returns the updated campaign.
    pub async fn cancel_campaign(&self, id: CampaignId) -> Result<Campaign, Error> {
        self.post_empty(self.url(&format!("campaigns/{id}/cancel"))?)
            .await
    }

    // ── Phone-number import ──────────────────────────────────────────

    /// POST `/campaigns/{id}/import` — multipart file upload, one phone
    /// number per line.
    pub async fn import_numbers_file(
        &self,
        id: CampaignId,
        filename: &str,
        contents: Vec<u8>,
    ) -> Result<ImportResult, Error> {
        let url = self.url(&format!("campaigns/{id}/import"))?;
        debug!("POST {url} (multipart, {} bytes)", contents.len());

        let part = reqwest::multipart::Part::bytes(contents).file_name(filename.to_owned());
        let form = reqwest::multipart::Form::new().part("file", part);

        let resp = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::handle_response(resp).await
    }

    /// POST `/campaigns/{id}/import/batch` — JSON phone-number array.
    pub async fn import_numbers_batch(
        &self,
        id: CampaignId,
        phone_numbers: &[String],
    ) -> Result<ImportResult, Error> {
        let url = self.url(&format!("campaigns/{id}/import/batch"))?;
        self.post(url, &BatchImportRequest { phone_numbers }).await
    }

    // ── Calls ────────────────────────────────────────────────────────

    /// GET `/campaigns/{id}/calls?page&size&status?` — one page of calls.
    ///
    /// Pagination is zero-indexed. The `status` parameter is omitted
    /// entirely when `filter` is `None` (the "all" sentinel) rather than
    /// sent as a wildcard value.
    pub async fn list_calls(
        &self,
        id: CampaignId,
        page: u32,
        size: usize,
        filter: Option<CallStatus>,
    ) -> Result<Vec<Call>, Error> {
        let mut url = self.url(&format!("campaigns/{id}/calls"))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &page.to_string());
            pairs.append_pair("size", &size.to_string());
            if let Some(status) = filter {
                pairs.append_pair("status", &status.to_string());
            }
        }
        self.get(url).await
    }

    /// POST `/calls` — trigger a single out-of-campaign call.
    pub async fn trigger_call(&self, phone_number: &str) -> Result<Call, Error> {
        self.post(self.url("calls")?, &TriggerCallRequest { phone_number })
            .await
    }

    /// GET `/calls/{id}`.
    pub async fn get_call(&self, id: CallId) -> Result<Call, Error> {
        self.get(self.url(&format!("calls/{id}"))?).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        Self::handle_response(resp).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("POST {url}");
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::handle_response(resp).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("POST {url}");
        let resp = self.http.post(url).send().await.map_err(Error::Transport)?;
        Self::handle_response(resp).await
    }

    /// Map the response: 2xx → deserialized body, anything else → a
    /// uniform [`Error::Api`] with the body text as the message.
    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_owned()
            } else {
                body.trim().to_owned()
            };
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
