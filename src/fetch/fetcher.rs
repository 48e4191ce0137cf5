use crate::fetch::traits::Fetcher;
use crate::model::FetchError;

use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

/// HTTP fetcher that keeps every outbound request at least `min_delay`
/// apart, across all callers sharing the instance.
pub struct RateLimitedFetcher {
    client: Client,
    min_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimitedFetcher {
    pub fn new(user_agent: &str, timeout: Duration, min_delay: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            min_delay,
            last_request: Mutex::new(None),
        })
    }

    /// Waits until `min_delay` has passed since the previous request start,
    /// then claims and returns the current instant. The lock is held through
    /// the sleep so concurrent callers queue behind each other.
    async fn wait_turn(&self) -> Instant {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_delay {
                let remaining = self.min_delay - elapsed;
                debug!(wait_ms = remaining.as_millis() as u64, "Rate limiting request");
                sleep(remaining).await;
            }
        }
        let now = Instant::now();
        *last = Some(now);
        now
    }
}

#[async_trait::async_trait]
impl Fetcher for RateLimitedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.wait_turn().await;
        debug!(url, "GET");

        let response = self.client.get(url).send().await.map_err(|e| {
            let err = classify(url, e);
            warn!("Request failed for {}: {}", url, err);
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Request to {} returned {}", url, status);
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|e| classify(url, e))
    }
}

fn classify(url: &str, source: reqwest::Error) -> FetchError {
    if source.is_timeout() {
        FetchError::Timeout { url: url.to_string() }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn first_turn_does_not_wait() {
        let fetcher =
            RateLimitedFetcher::new("test-agent", Duration::from_secs(1), Duration::from_secs(5)).unwrap();
        let started = Instant::now();
        fetcher.wait_turn().await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn consecutive_turns_are_spaced() {
        let fetcher =
            RateLimitedFetcher::new("test-agent", Duration::from_secs(1), Duration::from_millis(100)).unwrap();
        let started = Instant::now();
        for _ in 0..3 {
            fetcher.wait_turn().await;
        }
        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn concurrent_turns_are_each_spaced() {
        let delay = Duration::from_millis(50);
        let fetcher = Arc::new(RateLimitedFetcher::new("test-agent", Duration::from_secs(1), delay).unwrap());

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let fetcher = Arc::clone(&fetcher);
                tokio::spawn(async move { fetcher.wait_turn().await })
            })
            .collect();
        let mut claimed = Vec::new();
        for handle in handles {
            claimed.push(handle.await.unwrap());
        }
        claimed.sort();

        for pair in claimed.windows(2) {
            assert!(pair[1] - pair[0] >= delay, "gap {:?} below {:?}", pair[1] - pair[0], delay);
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_a_fetch_error() {
        let fetcher =
            RateLimitedFetcher::new("test-agent", Duration::from_secs(2), Duration::ZERO).unwrap();
        let result = fetcher.fetch("http://127.0.0.1:9/nothing").await;
        assert!(matches!(
            result,
            Err(FetchError::Http { .. } | FetchError::Timeout { .. })
        ));
    }
}
