// src/core/net.rs
//
// GitHub REST listing over reqwest's blocking client.
// One request per call; pagination and caching decisions live in `sync`.

use chrono::Utc;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ETAG, IF_NONE_MATCH, USER_AGENT};
use reqwest::StatusCode;
use tracing::debug;

use crate::config::consts::{self, API_BASE};
use crate::config::ShopOptions;
use crate::error::SyncError;
use crate::sync::{PageRequest, PageResponse, TicketSource};
use crate::ticket::decode_tickets;

const RATE_REMAINING: &str = "x-ratelimit-remaining";
const RATE_RESET: &str = "x-ratelimit-reset";

/// Open issues of one repository carrying all of a fixed label set.
pub struct GitHubSource {
    client: Client,
    api_base: String,
    owner: String,
    repo: String,
    labels: Vec<String>,
}

impl GitHubSource {
    pub fn new(opts: &ShopOptions) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(opts.request_timeout())
            .build()?;
        Ok(Self {
            client,
            api_base: s!(API_BASE),
            owner: opts.inventory_owner.clone(),
            repo: opts.inventory_repo.clone(),
            labels: opts.required_labels(),
        })
    }

    /// Point at another API root (GitHub Enterprise, a local stub).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_base(&self) -> &str { &self.api_base }

    fn issues_url(&self) -> String {
        format!("{}/repos/{}/{}/issues", self.api_base, self.owner, self.repo)
    }
}

impl TicketSource for GitHubSource {
    fn fetch_page(&mut self, req: &PageRequest) -> Result<PageResponse, SyncError> {
        let per_page = req.per_page.to_string();
        let page = req.page.to_string();
        let labels = self.labels.join(",");

        let mut builder = self.client
            .get(self.issues_url())
            .query(&[
                ("state", "open"),
                ("per_page", per_page.as_str()),
                ("page", page.as_str()),
                ("labels", labels.as_str()),
            ])
            .header(ACCEPT, consts::ACCEPT)
            .header(USER_AGENT, consts::USER_AGENT);
        if let Some(tag) = req.if_none_match.as_deref() {
            builder = builder.header(IF_NONE_MATCH, tag);
        }

        debug!(page = req.page, conditional = req.if_none_match.is_some(), "GET issues");
        let res = builder.send()?;
        let status = res.status();

        if status == StatusCode::NOT_MODIFIED {
            return Ok(PageResponse::NotModified);
        }

        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            let header = |name: &str| {
                res.headers()
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned)
            };
            return Err(SyncError::rate_limited(
                header(RATE_REMAINING).as_deref(),
                header(RATE_RESET).as_deref(),
                Utc::now().timestamp_millis(),
            ));
        }

        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("").to_string();
            let text = res.text().unwrap_or_default();
            let body = if text.trim().is_empty() { reason } else { text };
            return Err(SyncError::Api { status: status.as_u16(), body });
        }

        let etag = res.headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let values: Vec<serde_json::Value> = res.json()?;
        let tickets = decode_tickets(values);
        Ok(PageResponse::Page { tickets, etag })
    }
}
