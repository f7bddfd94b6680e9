//! Terminal front-end: rate board, interactive session and one-shot commands

pub mod board;
pub mod convert;
pub mod rates;
pub mod setup;
pub mod ui;
pub mod watch;
