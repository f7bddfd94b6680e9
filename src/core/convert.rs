//! Amount conversion between two currencies of a rate table

use super::rates::RateTable;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Please enter a valid numeric amount (got '{0}')")]
    InvalidAmount(String),
    #[error("Please select both currencies to convert")]
    MissingSelection,
    #[error("Select valid currencies: no usable rate for {0}")]
    UnknownCurrency(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub result: f64,
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} = {:.2} {}",
            self.amount, self.from, self.result, self.to
        )
    }
}

/// Converts `amount_text` of `from` into `to` using the rates in `table`.
///
/// Both rates are relative to the table's base, so the result is
/// `amount * rate(to) / rate(from)`.
pub fn convert(
    amount_text: &str,
    from: Option<&str>,
    to: Option<&str>,
    table: &RateTable,
) -> Result<Conversion, ConversionError> {
    let amount = amount_text
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite())
        .ok_or_else(|| ConversionError::InvalidAmount(amount_text.to_string()))?;

    let (from, to) = match (selection(from), selection(to)) {
        (Some(from), Some(to)) => (from, to),
        _ => return Err(ConversionError::MissingSelection),
    };

    let from_rate = usable_rate(table, &from)?;
    let to_rate = usable_rate(table, &to)?;

    // A finite amount can still overflow once scaled by the rate ratio.
    let result = amount * (to_rate / from_rate);
    if !result.is_finite() {
        return Err(ConversionError::InvalidAmount(amount_text.to_string()));
    }

    Ok(Conversion {
        amount,
        result,
        from,
        to,
    })
}

fn selection(code: Option<&str>) -> Option<String> {
    code.map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_uppercase)
}

// A zero rate would divide by zero; treat it like a missing one.
fn usable_rate(table: &RateTable, code: &str) -> Result<f64, ConversionError> {
    table
        .rate(code)
        .filter(|r| r.is_finite() && *r > 0.0)
        .ok_or_else(|| ConversionError::UnknownCurrency(code.to_string()))
}
