use crate::model::FetchError;

/// Single-attempt HTML fetch. Implementations never retry.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
