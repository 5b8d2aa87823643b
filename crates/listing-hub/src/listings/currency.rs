//! Display-time projection of canonical (AED) prices.

use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    Aed,
    Usd,
    Eur,
    Gbp,
    Sar,
    Inr,
}

impl CurrencyCode {
    pub const CANONICAL: CurrencyCode = CurrencyCode::Aed;

    pub const ALL: [CurrencyCode; 6] = [
        CurrencyCode::Aed,
        CurrencyCode::Usd,
        CurrencyCode::Eur,
        CurrencyCode::Gbp,
        CurrencyCode::Sar,
        CurrencyCode::Inr,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            CurrencyCode::Aed => "AED",
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Gbp => "GBP",
            CurrencyCode::Sar => "SAR",
            CurrencyCode::Inr => "INR",
        }
    }

    /// Units of this currency per canonical unit.
    pub const fn rate(self) -> f64 {
        match self {
            CurrencyCode::Aed => 1.0,
            CurrencyCode::Usd => 0.27,
            CurrencyCode::Eur => 0.25,
            CurrencyCode::Gbp => 0.21,
            CurrencyCode::Sar => 1.02,
            CurrencyCode::Inr => 22.6,
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        CurrencyCode::ALL
            .into_iter()
            .find(|code| code.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigurationError::UnsupportedCurrency(value.to_string()))
    }
}

/// Convert a canonical price and render it as `"{CODE} 1,234"`, rounded to whole units.
pub fn format_price(price: f64, currency: CurrencyCode) -> String {
    let converted = (price * currency.rate()).round();
    let sign = if converted < 0.0 { "-" } else { "" };
    // `converted` is already integral, so `{:.0}` prints its exact digits at any magnitude.
    let digits = format!("{:.0}", converted.abs());
    format!("{} {sign}{}", currency.code(), group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Where the session's display currency lives, so it can be swapped in tests.
pub trait CurrencyPreferenceStore: Send + Sync {
    fn display_currency(&self) -> CurrencyCode;
    fn set_display_currency(&self, currency: CurrencyCode);
}

#[derive(Debug)]
pub struct InMemoryCurrencyPreferences {
    current: RwLock<CurrencyCode>,
}

impl InMemoryCurrencyPreferences {
    pub fn new(initial: CurrencyCode) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }
}

impl Default for InMemoryCurrencyPreferences {
    fn default() -> Self {
        Self::new(CurrencyCode::CANONICAL)
    }
}

impl CurrencyPreferenceStore for InMemoryCurrencyPreferences {
    fn display_currency(&self) -> CurrencyCode {
        // A poisoned lock still holds a valid `Copy` value.
        *self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_display_currency(&self, currency: CurrencyCode) {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = currency;
    }
}
