//! Per-service grammars over the labels that precede a zone.
//!
//! Parsers only validate shape. Whether a currency or place actually exists
//! is decided later by the handler that owns the data.

use dnstoys_domain::{DomainError, ToyQuery};

/// A place name as typed by the client, with `-`/`_` turned into spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceQuery {
    pub name: String,
    /// Trailing two-letter token, e.g. `london-ca` gives `london` + `CA`.
    pub country_hint: Option<PlaceHint>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceHint {
    pub name: String,
    pub country_code: String,
}

impl PlaceQuery {
    pub fn parse(query: &ToyQuery) -> Result<Self, DomainError> {
        let label = query.single_label()?;
        Self::parse_label(label)
    }

    pub fn parse_label(label: &str) -> Result<Self, DomainError> {
        let replaced: String = label
            .chars()
            .map(|c| if c == '-' || c == '_' { ' ' } else { c })
            .collect();
        let tokens: Vec<&str> = replaced.split_whitespace().collect();

        if tokens.is_empty() {
            return Err(DomainError::InvalidQuery(format!(
                "empty place name: {:?}",
                label
            )));
        }

        if let Some(bad) = replaced
            .chars()
            .find(|c| !(c.is_alphanumeric() || c.is_whitespace() || *c == '\''))
        {
            return Err(DomainError::InvalidQuery(format!(
                "unexpected character {:?} in place name {:?}",
                bad, label
            )));
        }

        let name = tokens.join(" ").to_lowercase();

        let country_hint = match tokens.split_last() {
            Some((last, rest)) if !rest.is_empty() && is_country_code(last) => Some(PlaceHint {
                name: rest.join(" ").to_lowercase(),
                country_code: last.to_ascii_uppercase(),
            }),
            _ => None,
        };

        Ok(Self { name, country_hint })
    }

    /// The whole label is a bare two-letter code, e.g. `in.time`.
    pub fn as_country_code(&self) -> Option<String> {
        if is_country_code(&self.name) {
            Some(self.name.to_ascii_uppercase())
        } else {
            None
        }
    }
}

pub fn is_country_code(token: &str) -> bool {
    token.len() == 2 && token.chars().all(|c| c.is_ascii_alphabetic())
}

pub const DEFAULT_FX_AMOUNT: f64 = 1.0;

/// `<amount><FROM>-<TO>`, e.g. `25USD-EUR` or `usd-inr`.
#[derive(Debug, Clone, PartialEq)]
pub struct FxQuery {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

impl FxQuery {
    /// The amount may contain a decimal point, which DNS splits into its own
    /// label (`99.5JPY-INR.fx`), so all labels before the zone are rejoined.
    pub fn parse(query: &ToyQuery) -> Result<Self, DomainError> {
        if query.labels.is_empty() {
            return Err(DomainError::InvalidQuery(format!(
                "{} expects <amount><FROM>-<TO>",
                query.name
            )));
        }
        let joined = query
            .labels
            .iter()
            .map(|l| l.as_ref())
            .collect::<Vec<_>>()
            .join(".");
        Self::parse_label(&joined)
    }

    pub fn parse_label(label: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidQuery(format!("malformed fx query: {:?}", label));

        let (lhs, to) = label.split_once('-').ok_or_else(invalid)?;
        if lhs.len() < 3 || !lhs.is_char_boundary(lhs.len() - 3) {
            return Err(invalid());
        }
        let (amount_str, from) = lhs.split_at(lhs.len() - 3);

        if !is_currency_code(from) || !is_currency_code(to) {
            return Err(invalid());
        }

        let amount = if amount_str.is_empty() {
            DEFAULT_FX_AMOUNT
        } else {
            parse_amount(amount_str).ok_or_else(invalid)?
        };

        Ok(Self {
            amount,
            from: from.to_ascii_uppercase(),
            to: to.to_ascii_uppercase(),
        })
    }
}

fn is_currency_code(token: &str) -> bool {
    token.len() == 3 && token.chars().all(|c| c.is_ascii_alphabetic())
}

/// Plain decimal only: digits with at most one interior point. Rejects
/// signs, exponents and `inf`/`nan`, which `f64::from_str` would accept.
fn parse_amount(s: &str) -> Option<f64> {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };
    let digits = |p: &str| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit());
    if !digits(int_part) || !frac_part.map_or(true, digits) {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
