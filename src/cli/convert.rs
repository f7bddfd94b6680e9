use super::ui;
use crate::core::service::RateService;
use anyhow::Result;
use tracing::info;

/// Fetches rates once and converts a single amount.
pub async fn run(
    service: &RateService,
    amount: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let fetched = service.refresh().await;
    pb.finish_and_clear();
    fetched?;

    let conversion = service.convert(amount, from, to).await?;
    info!(result = conversion.result, "Converted amount");

    println!(
        "{}",
        ui::style_text(&conversion.to_string(), ui::StyleType::Result)
    );
    Ok(())
}
