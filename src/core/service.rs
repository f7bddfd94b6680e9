//! Fetch cycle and conversions over the shared rate store

use super::convert::{self, Conversion, ConversionError};
use super::currency::RateProvider;
use super::rates::{RateStore, RateTable};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct RateService {
    provider: Arc<dyn RateProvider>,
    store: RateStore,
    base: String,
    symbols: Vec<String>,
}

impl RateService {
    pub fn new(
        provider: Arc<dyn RateProvider>,
        store: RateStore,
        base: &str,
        symbols: &[String],
    ) -> Self {
        Self {
            provider,
            store,
            base: base.to_string(),
            symbols: symbols.to_vec(),
        }
    }

    pub fn store(&self) -> &RateStore {
        &self.store
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Fetches a fresh table and swaps it in. On failure the current table is
    /// kept as is.
    pub async fn refresh(&self) -> Result<RateTable> {
        debug!(base = %self.base, "Refreshing rates");
        let table = self
            .provider
            .fetch_rates(&self.base, &self.symbols)
            .await
            .context("Failed to fetch exchange rates")?;

        if table.is_empty() {
            warn!(base = %self.base, "Rates response carried no rates");
        }
        self.store.replace(table.clone()).await;
        info!(count = table.len(), "Rates updated");
        Ok(table)
    }

    pub async fn convert(
        &self,
        amount_text: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Conversion, ConversionError> {
        let table = self.store.snapshot().await;
        convert::convert(amount_text, from, to, &table)
    }
}
