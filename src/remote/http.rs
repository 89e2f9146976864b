//! HTTP implementation of the bugs API.
//!
//! # Security Note - Logging
//!
//! The API token is protected from being logged through reqwest's request
//! logging by the `RedactedHeader` wrapper type, which implements `Display`
//! and `Debug` to redact sensitive values. Even if debug logging is enabled
//! for reqwest, the Authorization header renders as `[REDACTED]`.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use jiff::Timestamp;
use reqwest::Client;
use reqwest::header;
use secrecy::{ExposeSecret, SecretBox};
use url::Url;

use crate::config::Config;
use crate::error::{BugboardError, Result};
use crate::types::{BugRecord, Comment};

use super::{BugDraft, BugProvider, BugQuery, create_body, update_body, with_retry};

/// Wrapper for sensitive header values that redacts the value when formatted.
struct RedactedHeader {
    value: String,
}

impl RedactedHeader {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }

    fn as_header_value(&self) -> header::HeaderValue {
        // The token is validated at client construction, so this cannot trip
        // at request time.
        header::HeaderValue::from_str(&self.value).expect("Invalid header value")
    }
}

impl fmt::Display for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Debug for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactedHeader")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// reqwest-backed client for the bugs API.
pub struct HttpBugsApi {
    client: Client,
    base_url: Url,
    token: SecretBox<String>,
}

impl HttpBugsApi {
    /// Create a client from configuration.
    ///
    /// Configures the HTTP client with a 30s connect timeout and 60s total
    /// timeout, and validates the credential up front so it is always usable
    /// as a header value later.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_url(), &config.api_token())
    }

    /// Create a client for the given base URL and static credential.
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        let base_url = Url::parse(api_url)
            .map_err(|e| BugboardError::Config(format!("invalid API base URL '{api_url}': {e}")))?;

        header::HeaderValue::from_str(token).map_err(|_| {
            BugboardError::Config("API token is not a valid header value".to_string())
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: SecretBox::new(Box::new(token.to_string())),
        })
    }

    fn bugs_url(&self) -> Result<Url> {
        self.base_url
            .join("bugs")
            .map_err(|e| BugboardError::Config(format!("invalid bugs URL: {e}")))
    }

    fn bug_url(&self, id: u64) -> Result<Url> {
        self.base_url
            .join(&format!("bugs/{id}"))
            .map_err(|e| BugboardError::Config(format!("invalid bug URL: {e}")))
    }

    fn auth_header(&self) -> header::HeaderValue {
        RedactedHeader::new(self.token.expose_secret()).as_header_value()
    }

    /// Shared GET for list and search calls.
    async fn fetch_bugs(&self, pairs: Vec<(&'static str, String)>) -> Result<Vec<BugRecord>> {
        let url = self.bugs_url()?;
        with_retry(|| async {
            let mut request = self.client.get(url.clone());
            if !pairs.is_empty() {
                request = request.query(&pairs);
            }
            let response = request
                .header(header::AUTHORIZATION, self.auth_header())
                .send()
                .await?
                .error_for_status()?;
            response.json::<Vec<BugRecord>>().await
        })
        .await
    }
}

#[async_trait]
impl BugProvider for HttpBugsApi {
    async fn list(&self, query: &BugQuery) -> Result<Vec<BugRecord>> {
        self.fetch_bugs(query.query_pairs()).await
    }

    async fn create(&self, draft: &BugDraft) -> Result<BugRecord> {
        let url = self.bugs_url()?;
        // Timestamps are stamped once, so the retry resends the same body.
        let body = create_body(draft, Timestamp::now());
        with_retry(|| async {
            let response = self
                .client
                .post(url.clone())
                .header(header::AUTHORIZATION, self.auth_header())
                .json(&body)
                .send()
                .await?
                .error_for_status()?;
            response.json::<BugRecord>().await
        })
        .await
    }

    async fn update(
        &self,
        id: u64,
        draft: &BugDraft,
        created_at: Timestamp,
        comments: Vec<Comment>,
    ) -> Result<BugRecord> {
        let url = self.bug_url(id)?;
        let body = update_body(draft, created_at, comments, Timestamp::now());
        with_retry(|| async {
            let response = self
                .client
                .put(url.clone())
                .header(header::AUTHORIZATION, self.auth_header())
                .json(&body)
                .send()
                .await?
                .error_for_status()?;
            response.json::<BugRecord>().await
        })
        .await
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let url = self.bug_url(id)?;
        with_retry(|| async {
            let response = self
                .client
                .delete(url.clone())
                .header(header::AUTHORIZATION, self.auth_header())
                .send()
                .await?
                .error_for_status()?;
            response.json::<bool>().await
        })
        .await
    }

    async fn search(&self, title: &str) -> Result<Vec<BugRecord>> {
        self.fetch_bugs(vec![("title", title.to_string())]).await
    }
}
