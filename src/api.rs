// ABOUTME: Blocking HTTP client for the Trello REST API
// ABOUTME: Handles throttling, key/token auth, and attachment streaming

use crate::auth::Credentials;
use crate::config::BoardFilters;
use crate::model::{BoardSummary, Organization};
use crate::{Error, Result};
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::Url;
use serde_json::Value;
use std::io::Read;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://api.trello.com/1";
pub const DEFAULT_ATTACHMENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote side of an export run.
pub trait TrelloSource {
    fn my_boards(&self) -> Result<Vec<BoardSummary>>;

    fn my_organizations(&self) -> Result<Vec<Organization>>;

    fn organization_boards(&self, org_id: &str) -> Result<Vec<BoardSummary>>;

    /// Full board payload with every nested resource, as returned.
    fn board(&self, board_id: &str, filters: &BoardFilters) -> Result<Value>;

    /// Opens a streaming body for an attachment URL. Non-success statuses
    /// are errors.
    fn download(&self, url: &str) -> Result<Box<dyn Read>>;
}

fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.len() <= max_chars {
        return s.to_string();
    }

    // Find a valid UTF-8 boundary at or before max_chars
    let mut boundary = max_chars;
    while boundary > 0 && !s.is_char_boundary(boundary) {
        boundary -= 1;
    }

    if boundary == 0 {
        return String::new();
    }

    format!("{}...", &s[..boundary])
}

/// Attachments can be large: the timeout bounds connecting, never the
/// whole transfer, so a slow but live download runs to completion.
fn build_download_client(connect_timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .user_agent(concat!("trello-full-backup/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(connect_timeout)
        .timeout(None)
        .tcp_keepalive(Duration::from_secs(15))
        .build()?;
    Ok(client)
}

pub struct ApiClient {
    client: Client,
    download_client: Client,
    base_url: String,
    credentials: Credentials,
    attachment_timeout: Duration,
    throttle_min: u64,
    throttle_max: u64,
}

impl ApiClient {
    pub fn new(credentials: Credentials, base_url: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("trello-full-backup/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(30))
            .build()?;
        let download_client = build_download_client(DEFAULT_ATTACHMENT_TIMEOUT)?;

        let base_url = base_url.unwrap_or_else(|| DEFAULT_API_BASE.into());

        Ok(ApiClient {
            client,
            download_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            attachment_timeout: DEFAULT_ATTACHMENT_TIMEOUT,
            throttle_min: 100,
            throttle_max: 300,
        })
    }

    pub fn with_attachment_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.download_client = build_download_client(timeout)?;
        self.attachment_timeout = timeout;
        Ok(self)
    }

    pub fn with_throttle(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.throttle_min = min_ms;
        self.throttle_max = max_ms;
        self
    }

    pub fn disable_throttle(mut self) -> Self {
        self.throttle_min = 0;
        self.throttle_max = 0;
        self
    }

    fn throttle(&self) {
        if self.throttle_max > 0 {
            let sleep_ms = rand::thread_rng().gen_range(self.throttle_min..=self.throttle_max);
            std::thread::sleep(Duration::from_millis(sleep_ms));
        }
    }

    fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.credentials.api_key.as_str()),
                ("token", self.credentials.token.as_str()),
            ])
            .query(params)
            .header("Accept", "application/json")
            .send()?;

        self.throttle();

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            let preview = truncate_str(&message, 100);
            return Err(Error::Api {
                endpoint: endpoint.into(),
                status: status.as_u16(),
                message: preview,
            });
        }

        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| {
            debug!(
                "Response body from {} (first 500 chars): {}",
                endpoint,
                truncate_str(&body, 500)
            );
            Error::Parse(e)
        })
    }

    /// Attachment downloads hosted by Trello need the OAuth header; foreign
    /// hosts (S3 links, user URLs) must not receive the credentials.
    fn sends_credentials_to(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let api_host = Url::parse(&self.base_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string));

        host == "trello.com" || host.ends_with(".trello.com") || api_host.as_deref() == Some(host)
    }
}

impl TrelloSource for ApiClient {
    fn my_boards(&self) -> Result<Vec<BoardSummary>> {
        self.get("/members/me/boards", &[])
    }

    fn my_organizations(&self) -> Result<Vec<Organization>> {
        self.get("/members/me/organizations", &[])
    }

    fn organization_boards(&self, org_id: &str) -> Result<Vec<BoardSummary>> {
        self.get(&format!("/organizations/{}/boards", org_id), &[])
    }

    fn board(&self, board_id: &str, filters: &BoardFilters) -> Result<Value> {
        self.get(
            &format!("/boards/{}", board_id),
            &[
                ("actions", "all"),
                ("actions_limit", "1000"),
                ("cards", filters.cards_filter()),
                ("card_attachments", "true"),
                ("labels", "all"),
                ("lists", filters.lists_filter()),
                ("members", "all"),
                ("member_fields", "all"),
                ("checklists", "all"),
                ("fields", "all"),
            ],
        )
    }

    fn download(&self, url: &str) -> Result<Box<dyn Read>> {
        let parsed = Url::parse(url).map_err(|e| Error::Api {
            endpoint: url.into(),
            status: 0,
            message: format!("invalid attachment URL: {}", e),
        })?;

        let mut request = self.download_client.get(parsed.clone());
        if self.sends_credentials_to(&parsed) {
            request = request.header(
                "Authorization",
                format!(
                    "OAuth oauth_consumer_key=\"{}\", oauth_token=\"{}\"",
                    self.credentials.api_key, self.credentials.token
                ),
            );
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                endpoint: parsed.path().into(),
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or_default().into(),
            });
        }

        Ok(Box::new(response))
    }
}
