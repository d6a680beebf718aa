//! Thin client for the pretalx conference-management API.
//!
//! Direct pass-through HTTP calls: one request per operation, no
//! retries and no pagination handling beyond the fixed `limit=999` on
//! the talks listing. Every request carries `Authorization: Token …`
//! and a JSON content type.

use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use reqwest::{Client, Method, header};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::application::speakers::{FetchError, TalksSource};
use crate::domain::speakers::{Talk, TalksResponse};

/// Outbound requests are bounded even though the original site never
/// configured a timeout; a hung remote must not wedge page renders.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum PretalxError {
    #[error("invalid pretalx url: {0}")]
    Url(#[from] url::ParseError),
    #[error("pretalx transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("pretalx returned status {status}")]
    Status { status: u16 },
    #[error("malformed pretalx payload: {message}")]
    Format { message: String },
}

impl From<PretalxError> for FetchError {
    fn from(err: PretalxError) -> Self {
        match err {
            PretalxError::Status { status } => FetchError::Status { status },
            PretalxError::Format { message } => FetchError::Format { message },
            PretalxError::Url(e) => FetchError::Transport {
                message: e.to_string(),
            },
            PretalxError::Transport(e) => FetchError::Transport {
                message: e.to_string(),
            },
        }
    }
}

pub struct PretalxClient {
    client: Client,
    base: Url,
    token: String,
}

impl PretalxClient {
    pub fn new(base_url: &Url, token: impl Into<String>) -> Result<Self, PretalxError> {
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base: ensure_trailing_slash(base_url.clone()),
            token: token.into(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("podium/", env!("CARGO_PKG_VERSION"))
    }

    pub async fn get_event(&self, event_slug: &str) -> Result<Value, PretalxError> {
        self.send(
            Method::GET,
            &format!("api/events/{event_slug}/"),
            None,
            None,
            "event",
        )
        .await
    }

    pub async fn get_submissions(&self, event_slug: &str) -> Result<Value, PretalxError> {
        self.send(
            Method::GET,
            &format!("api/events/{event_slug}/submissions/"),
            None,
            None,
            "submissions",
        )
        .await
    }

    pub async fn get_speakers(&self, event_slug: &str) -> Result<Value, PretalxError> {
        self.send(
            Method::GET,
            &format!("api/events/{event_slug}/speakers/"),
            None,
            None,
            "speakers",
        )
        .await
    }

    /// Confirmed talks for the event, typed. A payload without the
    /// expected `results`/`speakers` shape is a `Format` error, not a
    /// silent empty list.
    pub async fn get_talks(&self, event_slug: &str) -> Result<TalksResponse, PretalxError> {
        let value = self
            .send(
                Method::GET,
                &format!("api/events/{event_slug}/talks"),
                Some(&[("limit", "999"), ("state", "confirmed")]),
                None,
                "talks",
            )
            .await?;
        serde_json::from_value(value).map_err(|err| PretalxError::Format {
            message: err.to_string(),
        })
    }

    pub async fn update_submission(
        &self,
        event_slug: &str,
        submission_id: &str,
        data: &Value,
    ) -> Result<Value, PretalxError> {
        self.send(
            Method::PATCH,
            &format!("api/events/{event_slug}/submissions/{submission_id}/"),
            None,
            Some(data),
            "update_submission",
        )
        .await
    }

    pub async fn send_feedback(
        &self,
        event_slug: &str,
        submission_id: &str,
        feedback: &Value,
    ) -> Result<Value, PretalxError> {
        self.send(
            Method::POST,
            &format!("api/events/{event_slug}/submissions/{submission_id}/feedback/"),
            None,
            Some(feedback),
            "feedback",
        )
        .await
    }

    fn url(&self, path: &str) -> Result<Url, PretalxError> {
        self.base.join(path).map_err(PretalxError::Url)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, &str)]>,
        body: Option<&Value>,
        endpoint: &'static str,
    ) -> Result<Value, PretalxError> {
        let mut url = self.url(path)?;
        if let Some(pairs) = query {
            let mut qp = url.query_pairs_mut();
            for (key, value) in pairs {
                qp.append_pair(key, value);
            }
        }

        counter!("podium_pretalx_request_total", "endpoint" => endpoint).increment(1);

        let mut request = self
            .client
            .request(method, url)
            .header(header::AUTHORIZATION, format!("Token {}", self.token))
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PretalxError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| PretalxError::Format {
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl TalksSource for PretalxClient {
    async fn confirmed_talks(&self, event_slug: &str) -> Result<Vec<Talk>, FetchError> {
        let response = self.get_talks(event_slug).await?;
        Ok(response.results)
    }
}

/// Keep any deployment path prefix while guaranteeing that relative
/// endpoint paths append instead of replacing the last segment.
fn ensure_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> PretalxClient {
        let base = Url::parse(base).expect("base url");
        PretalxClient::new(&base, "secret").expect("client")
    }

    #[test]
    fn endpoint_urls_follow_the_pretalx_layout() {
        let client = client("https://pretalx.com");

        assert_eq!(
            client.url("api/events/pycon-apac-2026/").unwrap().as_str(),
            "https://pretalx.com/api/events/pycon-apac-2026/"
        );
        assert_eq!(
            client
                .url("api/events/pycon-apac-2026/submissions/42/")
                .unwrap()
                .as_str(),
            "https://pretalx.com/api/events/pycon-apac-2026/submissions/42/"
        );
        assert_eq!(
            client
                .url("api/events/pycon-apac-2026/submissions/42/feedback/")
                .unwrap()
                .as_str(),
            "https://pretalx.com/api/events/pycon-apac-2026/submissions/42/feedback/"
        );
    }

    #[test]
    fn talks_url_carries_fixed_query_parameters() {
        let client = client("https://pretalx.com");
        let mut url = client.url("api/events/pycon-apac-2026/talks").unwrap();
        {
            let mut qp = url.query_pairs_mut();
            qp.append_pair("limit", "999");
            qp.append_pair("state", "confirmed");
        }
        assert_eq!(
            url.as_str(),
            "https://pretalx.com/api/events/pycon-apac-2026/talks?limit=999&state=confirmed"
        );
    }

    #[test]
    fn base_url_path_prefix_is_preserved() {
        let client = client("https://conf.example.org/pretalx");
        assert_eq!(
            client.url("api/events/x/").unwrap().as_str(),
            "https://conf.example.org/pretalx/api/events/x/"
        );
    }
}
