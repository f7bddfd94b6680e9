//! Exchange rate source abstractions

use super::rates::RateTable;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the rates of `symbols` relative to `base` in one request.
    async fn fetch_rates(&self, base: &str, symbols: &[String]) -> Result<RateTable>;
}
