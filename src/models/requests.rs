//! Path parameter types for the market data API
//!
//! Raw path segments are validated here before any upstream call is made.

use std::fmt;
use std::str::FromStr;

/// Day windows the market chart endpoints accept, besides `max`.
pub const ACCEPTED_DAYS: [u16; 7] = [1, 7, 14, 30, 90, 180, 365];

const MAX_COIN_ID_LENGTH: usize = 100;

// == Days ==
/// Chart history window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Days {
    Count(u16),
    Max,
}

impl Days {
    /// Human label used in chart titles.
    pub fn title_label(&self) -> String {
        match self {
            Days::Count(n) => format!("{} Days", n),
            Days::Max => "All Time".to_string(),
        }
    }
}

impl FromStr for Days {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "max" => Ok(Days::Max),
            "1" | "7" | "14" | "30" | "90" | "180" | "365" => raw
                .parse::<u16>()
                .map(Days::Count)
                .map_err(|e| e.to_string()),
            _ => Err(format!(
                "Invalid number of days '{}'. Must be one of 1, 7, 14, 30, 90, 180, 365 or 'max'.",
                raw
            )),
        }
    }
}

impl fmt::Display for Days {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Days::Count(n) => write!(f, "{}", n),
            Days::Max => f.write_str("max"),
        }
    }
}

// == Coin Id ==
/// Upstream coin identifier such as `bitcoin` or `usd-coin`.
///
/// Lowercase ascii letters, digits and `-` only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoinId(String);

impl CoinId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `bitcoin` -> `Bitcoin`
    pub fn display_name(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl FromStr for CoinId {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let valid_chars = raw
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

        if raw.is_empty() || raw.len() > MAX_COIN_ID_LENGTH || !valid_chars {
            return Err(format!("Invalid coin id '{}'", raw));
        }
        Ok(CoinId(raw.to_string()))
    }
}

impl fmt::Display for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
