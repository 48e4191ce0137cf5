pub mod fetcher;
pub mod traits;

pub use fetcher::RateLimitedFetcher;
pub use traits::Fetcher;
