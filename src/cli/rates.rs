use super::board::RateBoard;
use super::ui;
use crate::core::service::RateService;
use anyhow::Result;
use std::time::Duration;

/// Fetches rates once and prints the board.
pub async fn run(service: &RateService) -> Result<()> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let fetched = service.refresh().await;
    pb.finish_and_clear();
    let table = fetched?;

    // Printed once, so there is no updated cue to revert.
    let mut board = RateBoard::new(service.symbols(), Duration::ZERO);
    board.show(&table);

    let title = match table.date() {
        Some(date) => format!("Exchange rates for {date}"),
        None => "Exchange rates".to_string(),
    };
    println!("{}\n", ui::style_text(&title, ui::StyleType::Title));
    println!("{}", board.render());
    Ok(())
}
