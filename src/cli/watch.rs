//! Interactive session: scheduled refreshes plus conversion requests typed by
//! the user, all handled on one event loop.

use super::board::RateBoard;
use super::ui;
use crate::core::convert::{Conversion, ConversionError};
use crate::core::service::RateService;
use anyhow::Result;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

const HELP: &str = "\
Commands:
  <amount> <from> <to>   convert, e.g. `100 USD RUB`
  rates                  show the rate board
  refresh                fetch rates now
  help                   show this message
  quit                   exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Convert {
        amount: String,
        from: Option<String>,
        to: Option<String>,
    },
    Rates,
    Refresh,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `None`; anything that is not a
/// keyword is taken as a conversion request and validated later.
pub fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let first = words.next()?;
    let command = match first.to_lowercase().as_str() {
        "rates" => Command::Rates,
        "refresh" => Command::Refresh,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Convert {
            amount: first.to_string(),
            from: words.next().map(str::to_string),
            to: words.next().map(str::to_string),
        },
    };
    Some(command)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    service: RateService,
    board: RateBoard,
}

impl Session {
    pub fn new(service: RateService, highlight: Duration) -> Self {
        let board = RateBoard::new(service.symbols(), highlight);
        Self { service, board }
    }

    pub fn board(&self) -> &RateBoard {
        &self.board
    }

    /// Runs one fetch cycle. Failures are reported and the board keeps the
    /// previous rates until the next attempt.
    pub async fn refresh(&mut self) {
        match self.service.refresh().await {
            Ok(table) => {
                self.board.refresh(&table);
                println!("{}", self.board.render());
            }
            Err(e) => {
                let message = format!("{e:#}");
                warn!(error = %message, "Rate refresh failed, keeping previous rates");
                ui::error_user(&message);
            }
        }
    }

    pub async fn convert(
        &self,
        amount: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Conversion, ConversionError> {
        self.service.convert(amount, from, to).await
    }

    pub async fn dispatch(&mut self, command: Command) -> Flow {
        debug!(?command, "Handling command");
        match command {
            Command::Convert { amount, from, to } => {
                match self.convert(&amount, from.as_deref(), to.as_deref()).await {
                    Ok(conversion) => println!(
                        "{}",
                        ui::style_text(&conversion.to_string(), ui::StyleType::Result)
                    ),
                    Err(e) => ui::warn_user(&e.to_string()),
                }
            }
            Command::Rates => println!("{}", self.board.render()),
            Command::Refresh => {
                self.refresh().await;
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }
}

/// Runs the session on stdin until `quit`, end of input or Ctrl-C.
pub async fn run(session: Session, interval: Duration) -> Result<()> {
    println!(
        "{}",
        ui::style_text("Exchange rates (type `help` for commands)", ui::StyleType::Title)
    );
    run_with_input(session, interval, BufReader::new(tokio::io::stdin())).await
}

/// Event loop over the refresh timer and `input`. The first tick fires
/// immediately, so rates are fetched once at startup. The board is redrawn
/// once its updated cue clears.
pub async fn run_with_input<R>(mut session: Session, interval: Duration, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut lines = input.lines();
    let reverted = session.board().revert_signal();

    loop {
        tokio::select! {
            biased;

            _ = ticker.tick() => {
                session.refresh().await;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    break;
                };
                if let Some(command) = parse_command(&line) {
                    if session.dispatch(command).await == Flow::Quit {
                        break;
                    }
                }
            }
            _ = reverted.notified() => {
                println!("{}", session.board().render());
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    info!("Session finished");
    Ok(())
}
