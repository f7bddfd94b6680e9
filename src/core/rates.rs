//! Latest exchange rate snapshot and the cell that holds it

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Rates of several currencies relative to a single base currency.
///
/// A table is always replaced as a whole, never patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    base: String,
    date: Option<NaiveDate>,
    rates: BTreeMap<String, f64>,
}

impl RateTable {
    pub fn new(base: &str, rates: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            base: base.to_uppercase(),
            date: None,
            rates: rates
                .into_iter()
                .map(|(code, rate)| (code.to_uppercase(), rate))
                .collect(),
        }
    }

    pub fn with_date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(&code.to_uppercase()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(code, rate)| (code.as_str(), *rate))
    }
}

/// Shared holder of the current [`RateTable`].
///
/// Readers get a cloned snapshot; the fetch completion path is the only writer.
#[derive(Clone, Default)]
pub struct RateStore {
    inner: Arc<RwLock<RateTable>>,
}

impl RateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> RateTable {
        self.inner.read().await.clone()
    }

    pub async fn replace(&self, table: RateTable) {
        let mut current = self.inner.write().await;
        debug!(base = table.base(), count = table.len(), "Replacing rate table");
        *current = table;
    }
}
