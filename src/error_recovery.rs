// src/error_recovery.rs
//! Retry of rate-limited requests on a fixed backoff schedule.

use crate::api::transport::RawResponse;
use crate::error::AppError;
use std::future::Future;
use std::time::Duration;

const TOO_MANY_REQUESTS: u16 = 429;

/// Runs `send` until it yields something other than a 429.
///
/// Each entry of `schedule` is the wait before one retry, so the request is
/// attempted at most `schedule.len() + 1` times. Errors from `send` and
/// every non-429 response are returned as-is, without retrying.
pub async fn retry_rate_limited<F, Fut>(
    mut send: F,
    schedule: &[Duration],
    url: &str,
) -> Result<RawResponse, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<RawResponse, AppError>>,
{
    let mut delays = schedule.iter();

    loop {
        let response = send().await?;
        if response.status != TOO_MANY_REQUESTS {
            return Ok(response);
        }

        match delays.next() {
            Some(delay) => {
                log::warn!("Rate limited by {}, retrying after {:?}", url, delay);
                tokio::time::sleep(*delay).await;
            }
            None => {
                return Err(AppError::RateLimitExhausted {
                    url: url.to_string(),
                    retries: schedule.len(),
                });
            }
        }
    }
}
