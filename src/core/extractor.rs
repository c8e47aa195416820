use crate::config::Settings;
use crate::domain::model::RawResponse;
use crate::utils::error::{EtlError, Result};
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Header carrying the feed credential.
pub const API_KEY_HEADER: &str = "X-OTX-API-KEY";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

/// Classification of one fetch attempt. A rate-limited attempt is Retryable
/// with the server-suggested wait; it draws from the same attempt budget as
/// every other retryable outcome.
enum FetchDisposition {
    Success(RawResponse),
    Retryable { wait: Duration, reason: String },
    Terminal(EtlError),
}

pub struct Extractor {
    client: Client,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
}

impl Extractor {
    /// Fails fast when the credential is absent; performs no network I/O.
    pub fn new(settings: &Settings) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| EtlError::MissingConfig {
                field: "API_KEY".to_string(),
            })?;

        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
            retry: settings.retry.clone(),
        })
    }

    /// Fetch one resource, retrying retryable failures up to the attempt
    /// ceiling. A 403 aborts immediately; success short-circuits the
    /// remaining attempts.
    pub async fn fetch(&self, resource: &str, params: &[(&str, String)]) -> Result<RawResponse> {
        let url = format!("{}/{}", self.base_url, resource);

        for attempt in 1..=self.retry.max_attempts {
            tracing::info!(attempt, max = self.retry.max_attempts, "📡 Fetching {}", url);

            match self.attempt(&url, params).await {
                FetchDisposition::Success(payload) => {
                    tracing::info!(attempt, "Fetch succeeded");
                    return Ok(payload);
                }
                FetchDisposition::Terminal(err) => {
                    tracing::error!(attempt, "❌ Fetch aborted: {}", err);
                    return Err(err);
                }
                FetchDisposition::Retryable { wait, reason } => {
                    tracing::warn!(attempt, "Fetch attempt failed: {}", reason);
                    if attempt < self.retry.max_attempts {
                        tracing::info!("Retrying in {:?}", wait);
                        tokio::time::sleep(wait).await;
                    }
                }
            }
        }

        Err(EtlError::AttemptsExhausted {
            attempts: self.retry.max_attempts,
        })
    }

    async fn attempt(&self, url: &str, params: &[(&str, String)]) -> FetchDisposition {
        let mut request = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(API_KEY_HEADER, &self.api_key);
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                return FetchDisposition::Retryable {
                    wait: self.retry.base_delay,
                    reason: format!("network error: {}", e),
                }
            }
        };

        let status = response.status();
        if status.is_success() {
            return match response.json::<RawResponse>().await {
                Ok(payload) => FetchDisposition::Success(payload),
                Err(e) => FetchDisposition::Retryable {
                    wait: self.retry.base_delay,
                    reason: format!("body decode failed: {}", e),
                },
            };
        }

        match status {
            StatusCode::FORBIDDEN => FetchDisposition::Terminal(EtlError::AuthRejected),
            StatusCode::TOO_MANY_REQUESTS => {
                let wait = retry_after_hint(response.headers(), self.retry.base_delay);
                FetchDisposition::Retryable {
                    wait,
                    reason: format!("rate limited, backing off {}s", wait.as_secs()),
                }
            }
            other => FetchDisposition::Retryable {
                wait: self.retry.base_delay,
                reason: format!("unexpected status {}", other),
            },
        }
    }
}

/// Server-suggested backoff from `Retry-After`, in whole seconds. Falls
/// back to the fixed delay when the header is absent or unparseable
/// (HTTP-date form included).
fn retry_after_hint(headers: &HeaderMap, fallback: Duration) -> Duration {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers_with_retry_after(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_retry_after_seconds_win_over_fallback() {
        let headers = headers_with_retry_after("5");
        let wait = retry_after_hint(&headers, Duration::from_secs(2));
        assert_eq!(wait, Duration::from_secs(5));
    }

    #[test]
    fn test_retry_after_missing_uses_fallback() {
        let wait = retry_after_hint(&HeaderMap::new(), Duration::from_secs(2));
        assert_eq!(wait, Duration::from_secs(2));
    }

    #[test]
    fn test_retry_after_unparseable_uses_fallback() {
        let headers = headers_with_retry_after("Fri, 07 Aug 2026 07:28:00 GMT");
        let wait = retry_after_hint(&headers, Duration::from_secs(2));
        assert_eq!(wait, Duration::from_secs(2));
    }
}
