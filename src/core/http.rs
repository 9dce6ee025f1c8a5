/// HTTP Fetch Adapter
///
/// Thin wrapper around a shared `reqwest::Client`. Every call returns
/// `Result<T, FetchError>`, whether it is a weather GET or an image
/// provider POST, so callers handle failures one way.

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::error::FetchError;

/// Outbound HTTP client with a fixed set of default headers.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    headers: HeaderMap,
}

impl HttpFetcher {
    /// Client for read-only JSON APIs that identify callers by user agent.
    pub fn new(client: reqwest::Client, user_agent: &str, accept: &'static str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(accept));
        if let Ok(ua) = HeaderValue::from_str(user_agent) {
            headers.insert(USER_AGENT, ua);
        } else {
            tracing::warn!(user_agent, "ignoring user agent that is not a valid header value");
        }
        Self { client, headers }
    }

    /// GET `url` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        tracing::debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(FetchError::Network)?;
        decode(response).await
    }

    /// POST a JSON body with a bearer token and extra headers, decode the JSON reply.
    ///
    /// Non-success statuses are reported with the provider's error text
    /// when the body carries one (`{"detail": ...}` or `{"error": ...}`).
    pub async fn post_json<B, T>(
        &self,
        url: &str,
        token: &str,
        extra_headers: &[(&'static str, &'static str)],
        body: &B,
    ) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(url, "POST");
        let mut request = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .json(body);
        for (name, value) in extra_headers {
            request = request.header(*name, *value);
        }
        let response = request.send().await.map_err(FetchError::Network)?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, FetchError> {
    let status = response.status();
    let body = response.text().await.map_err(FetchError::Network)?;

    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            body: provider_message(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
}

/// Pull a human readable message out of an error body, falling back to the raw text.
fn provider_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            v.get("detail")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}
