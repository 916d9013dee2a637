use anyhow::{Result, anyhow};
use reqwest::Response;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// How often and how patiently an idempotent request is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub retries: usize,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            retries: 0,
            delay: Duration::ZERO,
        }
    }
}

/// Sends a request, repeating it on transport errors and 5xx responses.
///
/// Any other response, including 4xx, is handed back for the caller to interpret.
pub async fn send_with_retry<F, Fut>(mut send: F, policy: RetryPolicy) -> Result<Response>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let mut attempt = 1;
    loop {
        let err = match send().await {
            Ok(response) if response.status().is_server_error() => {
                anyhow!("Server responded with {}", response.status())
            }
            Ok(response) => return Ok(response),
            Err(e) => anyhow::Error::from(e),
        };

        if attempt > policy.retries {
            return Err(err);
        }
        debug!(
            "Attempt {}/{} failed: {}. Retrying...",
            attempt,
            policy.retries + 1,
            err
        );
        attempt += 1;
        tokio::time::sleep(policy.delay).await;
    }
}
