//! Rate board: one label per tracked currency with a short "just updated" cue

use super::ui;
use crate::core::rates::RateTable;
use chrono::{DateTime, Local};
use comfy_table::{Attribute, Cell, CellAlignment, Color};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct RateLabel {
    pub code: String,
    pub text: String,
    pub highlighted: bool,
}

#[derive(Debug, Default)]
struct BoardState {
    labels: Vec<RateLabel>,
    base: String,
    updated_at: Option<DateTime<Local>>,
}

pub struct RateBoard {
    state: Arc<Mutex<BoardState>>,
    highlight: Duration,
    revert: Option<JoinHandle<()>>,
    reverted: Arc<Notify>,
}

impl RateBoard {
    pub fn new(codes: &[String], highlight: Duration) -> Self {
        let labels = codes
            .iter()
            .map(|code| RateLabel {
                code: code.clone(),
                text: "N/A".to_string(),
                highlighted: false,
            })
            .collect();
        Self {
            state: Arc::new(Mutex::new(BoardState {
                labels,
                ..Default::default()
            })),
            highlight,
            revert: None,
            reverted: Arc::new(Notify::new()),
        }
    }

    /// Signalled each time the updated cue is cleared, so the owner can
    /// redraw the board.
    pub fn revert_signal(&self) -> Arc<Notify> {
        Arc::clone(&self.reverted)
    }

    /// Renders `table` into the labels, marks them as updated and schedules
    /// the revert. A revert still pending from an earlier refresh is dropped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn refresh(&mut self, table: &RateTable) {
        if let Some(pending) = self.revert.take() {
            pending.abort();
        }

        self.update(table, true);
        debug!("Rate board refreshed");

        let state = Arc::clone(&self.state);
        let reverted = Arc::clone(&self.reverted);
        let delay = self.highlight;
        self.revert = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            for label in lock(&state).labels.iter_mut() {
                label.highlighted = false;
            }
            reverted.notify_one();
        }));
    }

    /// Renders `table` without the updated cue.
    pub fn show(&mut self, table: &RateTable) {
        if let Some(pending) = self.revert.take() {
            pending.abort();
        }
        self.update(table, false);
    }

    fn update(&self, table: &RateTable, highlighted: bool) {
        let mut state = lock(&self.state);
        state.base = table.base().to_string();
        state.updated_at = Some(Local::now());
        for label in state.labels.iter_mut() {
            label.text = table
                .rate(&label.code)
                .map_or_else(|| "N/A".to_string(), |rate| rate.to_string());
            label.highlighted = highlighted;
        }
    }

    pub fn labels(&self) -> Vec<RateLabel> {
        lock(&self.state).labels.clone()
    }

    pub fn render(&self) -> String {
        let state = lock(&self.state);

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell(&format!("Rate (1 {})", display_base(&state.base))),
        ]);

        for label in &state.labels {
            let rate = Cell::new(&label.text).set_alignment(CellAlignment::Right);
            let rate = if label.highlighted {
                rate.fg(Color::Red).add_attribute(Attribute::Bold)
            } else if label.text == "N/A" {
                rate.fg(Color::DarkGrey)
            } else {
                rate
            };
            table.add_row(vec![Cell::new(&label.code), rate]);
        }

        let updated = state.updated_at.map_or("never".to_string(), |t| {
            t.format("%Y-%m-%d %H:%M:%S").to_string()
        });

        format!(
            "{}\n{}",
            table,
            ui::style_text(&format!("Updated: {updated}"), ui::StyleType::Subtle)
        )
    }
}

impl Drop for RateBoard {
    fn drop(&mut self) {
        if let Some(pending) = self.revert.take() {
            pending.abort();
        }
    }
}

fn display_base(base: &str) -> &str {
    if base.is_empty() { "base" } else { base }
}

// Labels are plain data, so a poisoned lock is still usable.
fn lock(state: &Mutex<BoardState>) -> MutexGuard<'_, BoardState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
