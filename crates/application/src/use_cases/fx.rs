use crate::ports::ToyHandler;
use crate::services::{FxQuery, RateTableStore};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use dnstoys_domain::toy_answer::FX_TTL;
use dnstoys_domain::{DomainError, ToyAnswer, ToyQuery};
use std::sync::Arc;
use tracing::debug;

/// Converted amounts are rounded to this many decimals, ties to even.
pub const FX_DECIMALS: i32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct FxConversion {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub converted: f64,
    /// When the rates used were fetched; `None` for same-currency queries.
    pub rates_as_of: Option<DateTime<Utc>>,
}

/// Answers `<amount><FROM>-<TO>.fx` from the current rate snapshot.
///
/// Never writes to the store; the refresh job is its only writer.
pub struct FxHandler {
    rates: Arc<RateTableStore>,
}

impl FxHandler {
    pub fn new(rates: Arc<RateTableStore>) -> Self {
        Self { rates }
    }

    pub fn convert(&self, query: &FxQuery) -> Result<FxConversion, DomainError> {
        if query.from == query.to {
            return Ok(FxConversion {
                amount: query.amount,
                from: query.from.clone(),
                to: query.to.clone(),
                converted: query.amount,
                rates_as_of: None,
            });
        }

        let table = self.rates.snapshot().ok_or(DomainError::RatesUnavailable)?;

        let rate_of = |code: &str| {
            table
                .rate(code)
                .filter(|r| r.is_finite() && *r > 0.0)
                .ok_or_else(|| DomainError::UnknownCurrency(code.to_string()))
        };
        let from_rate = rate_of(&query.from)?;
        let to_rate = rate_of(&query.to)?;

        let converted = round_half_even(query.amount * to_rate / from_rate, FX_DECIMALS);
        debug!(
            amount = query.amount,
            from = %query.from,
            to = %query.to,
            converted,
            "FX conversion"
        );

        Ok(FxConversion {
            amount: query.amount,
            from: query.from.clone(),
            to: query.to.clone(),
            converted,
            rates_as_of: Some(table.refreshed_at),
        })
    }
}

#[async_trait]
impl ToyHandler for FxHandler {
    async fn handle(&self, query: &ToyQuery) -> Result<ToyAnswer, DomainError> {
        let fx = FxQuery::parse(query)?;
        let conversion = self.convert(&fx)?;

        let mut strings = vec![format!(
            "{} {} = {} {}",
            format_amount(conversion.amount),
            conversion.from,
            format_amount(conversion.converted),
            conversion.to
        )];
        if let Some(as_of) = conversion.rates_as_of {
            strings.push(as_of.to_rfc3339_opts(SecondsFormat::Secs, true));
        }

        Ok(ToyAnswer::txt(strings, FX_TTL))
    }
}

pub fn round_half_even(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Two decimals, unless that would hide digits the client actually sent.
pub fn format_amount(value: f64) -> String {
    if (round_half_even(value, FX_DECIMALS) - value).abs() < 1e-9 {
        format!("{:.2}", value)
    } else {
        value.to_string()
    }
}
