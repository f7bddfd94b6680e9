use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use super::util::{RetryPolicy, with_retry};
use crate::core::currency::RateProvider;
use crate::core::rates::RateTable;

/// Client for the `latest` endpoint of exchangeratesapi.io (and fixer.io,
/// which shares the same wire format).
pub struct ExchangeRatesApiProvider {
    base_url: String,
    access_key: String,
    retry: RetryPolicy,
}

impl ExchangeRatesApiProvider {
    pub fn new(base_url: &str, access_key: &str) -> Self {
        ExchangeRatesApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn latest_url(&self, base: &str, symbols: &[String]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/v1/latest", self.base_url))
            .map_err(|e| anyhow!("Invalid rates API URL {}: {}", self.base_url, e))?;
        url.query_pairs_mut()
            .clear()
            .append_pair("access_key", &self.access_key)
            .append_pair("symbols", &symbols.join(","))
            .append_pair("base", base);
        Ok(url)
    }

    async fn fetch_once(&self, url: &Url, base: &str) -> Result<RateTable> {
        let client = reqwest::Client::builder()
            .user_agent("fxboard/1.0")
            .build()?;

        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for base: {}", e, base))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base: {}",
                response.status(),
                base
            ));
        }

        let text = response.text().await?;
        debug!(body = %text, "Received rates response");

        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", base, e))?;

        if let Some(error) = data.error {
            return Err(anyhow!(
                "Rates API error {}: {}",
                error.code,
                error.info.or(error.kind).unwrap_or_default()
            ));
        }
        if data.success == Some(false) {
            return Err(anyhow!("Rates API reported failure for base: {}", base));
        }

        let rates = data
            .rates
            .ok_or_else(|| anyhow!("No rate data found for base: {}", base))?;

        let date = data
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        Ok(RateTable::new(data.base.as_deref().unwrap_or(base), rates).with_date(date))
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    success: Option<bool>,
    base: Option<String>,
    date: Option<String>,
    rates: Option<HashMap<String, f64>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: serde_json::Value,
    #[serde(rename = "type")]
    kind: Option<String>,
    info: Option<String>,
}

#[async_trait]
impl RateProvider for ExchangeRatesApiProvider {
    #[instrument(
        name = "LatestRatesFetch",
        skip(self, symbols),
        fields(base = %base, symbols = symbols.len())
    )]
    async fn fetch_rates(&self, base: &str, symbols: &[String]) -> Result<RateTable> {
        let url = self.latest_url(base, symbols)?;
        debug!("Requesting rates from {}{}", self.base_url, url.path());

        let url = &url;
        with_retry(move || self.fetch_once(url, base), self.retry).await
    }
}
