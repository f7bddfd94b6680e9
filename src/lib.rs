pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::rates::RateStore;
use crate::core::service::RateService;
use crate::providers::exchangerates_api::ExchangeRatesApiProvider;
use crate::providers::util::RetryPolicy;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Watch,
    Rates,
    Convert {
        amount: String,
        from: Option<String>,
        to: Option<String>,
    },
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

pub fn build_service(config: &AppConfig) -> RateService {
    if config.provider.access_key.is_empty() {
        warn!("No access key configured, the rates API will likely reject requests");
    }

    let provider = ExchangeRatesApiProvider::new(
        &config.provider.base_url,
        &config.provider.access_key,
    )
    .with_retry_policy(RetryPolicy::new(
        config.provider.retries,
        config.provider.retry_delay_ms,
    ));

    RateService::new(
        Arc::new(provider),
        RateStore::new(),
        &config.base,
        &config.currencies,
    )
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxboard starting...");

    let config = load_config(config_path)?;
    let service = build_service(&config);

    match command {
        AppCommand::Watch => {
            let session = cli::watch::Session::new(service, config.highlight_delay());
            cli::watch::run(session, config.refresh_interval()).await
        }
        AppCommand::Rates => cli::rates::run(&service).await,
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(&service, &amount, from.as_deref(), to.as_deref()).await
        }
    }
}
