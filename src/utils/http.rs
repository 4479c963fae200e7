use reqwest::StatusCode;
use std::time::Duration;

/// Backoff settings for [`request_with_retry`].
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 = single attempt).
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(60),
        }
    }
}

fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Retries a request closure with exponential backoff.
///
/// Retries on network errors, 429 (respecting `Retry-After`) and 5xx.
/// Other statuses are returned immediately for the caller to inspect; once
/// retries are exhausted the last response (or network error) is returned.
pub async fn request_with_retry<F, Fut>(
    mut task: F,
    policy: RetryPolicy,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut attempt = 0;
    let mut delay = policy.initial_delay;

    loop {
        attempt += 1;
        let exhausted = attempt > policy.max_retries;

        match task().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() || exhausted || !is_transient(status) {
                    return Ok(response);
                }

                let retry_delay = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(delay)
                    .min(policy.max_delay);

                tracing::warn!(
                    "[HTTP] Request failed with status {}, retrying in {:?} (attempt {}/{})",
                    status,
                    retry_delay,
                    attempt,
                    policy.max_retries
                );
                tokio::time::sleep(retry_delay).await;
            }
            Err(e) => {
                if exhausted {
                    return Err(e);
                }
                tracing::warn!(
                    "[HTTP] Network error: {}, retrying in {:?} (attempt {}/{})",
                    e,
                    delay,
                    attempt,
                    policy.max_retries
                );
                tokio::time::sleep(delay).await;
            }
        }

        delay = std::cmp::min(delay * 2, policy.max_delay);
    }
}
