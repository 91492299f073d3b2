use super::normalizer::{normalize_unit, round_cents};
use crate::config::StatementConfig;
use crate::render::format_rate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// How a party's base pay is derived from the loads on its statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum CompensationModel {
    FlatRate { per_mile: Decimal },
    GrossShare { percent: Decimal },
}

impl CompensationModel {
    pub fn base_pay(&self, gross: Decimal, miles: Decimal) -> Decimal {
        match self {
            CompensationModel::FlatRate { per_mile } => round_cents(miles * per_mile),
            CompensationModel::GrossShare { percent } => {
                round_cents(gross * percent / Decimal::ONE_HUNDRED)
            }
        }
    }

    /// Roster wording, e.g. `$0.65 per mile` or `88% of gross`.
    pub fn terms(&self) -> String {
        match self {
            CompensationModel::FlatRate { per_mile } => format!("${} per mile", format_rate(*per_mile)),
            CompensationModel::GrossShare { percent } => format!("{}% of gross", percent.normalize()),
        }
    }

    /// Interprets a bare owner share number: `88` and `0.88` both mean 88 percent.
    pub fn share_from_value(value: Decimal) -> Option<Self> {
        if value <= Decimal::ZERO {
            return None;
        }
        let percent = if value <= Decimal::ONE {
            value * Decimal::ONE_HUNDRED
        } else {
            value
        };
        Self::share_from_percent(percent)
    }

    /// A share already written as a percent, e.g. the `1` of `"1%"`.
    pub fn share_from_percent(percent: Decimal) -> Option<Self> {
        (percent > Decimal::ZERO && percent <= Decimal::ONE_HUNDRED)
            .then_some(CompensationModel::GrossShare { percent })
    }

    pub fn rate_from_value(value: Decimal) -> Option<Self> {
        (value > Decimal::ZERO).then_some(CompensationModel::FlatRate { per_mile: value })
    }
}

/// Persisted driver pay configuration for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRate {
    pub unit_number: String,
    pub driver_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub rate_per_mile: Decimal,
}

#[derive(Debug, thiserror::Error)]
pub enum RateBookError {
    #[error("rate book unavailable: {0}")]
    Unavailable(String),
    #[error("unit number `{0}` is blank or unreadable")]
    InvalidUnit(String),
}

/// Lookup of persisted driver configuration by normalized unit number.
pub trait RateBook: Send + Sync {
    fn rate_for(&self, unit: &str) -> Result<Option<DriverRate>, RateBookError>;
}

impl RateBook for HashMap<String, DriverRate> {
    fn rate_for(&self, unit: &str) -> Result<Option<DriverRate>, RateBookError> {
        Ok(self.get(unit).cloned())
    }
}

impl RateBook for BTreeMap<String, DriverRate> {
    fn rate_for(&self, unit: &str) -> Result<Option<DriverRate>, RateBookError> {
        Ok(self.get(unit).cloned())
    }
}

/// Rate book with no entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyRateBook;

impl RateBook for EmptyRateBook {
    fn rate_for(&self, _unit: &str) -> Result<Option<DriverRate>, RateBookError> {
        Ok(None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDefaults {
    pub driver: CompensationModel,
    pub owner: CompensationModel,
}

impl RateDefaults {
    pub fn from_config(config: &StatementConfig) -> Self {
        Self {
            driver: CompensationModel::FlatRate {
                per_mile: config.default_driver_rate,
            },
            owner: CompensationModel::GrossShare {
                percent: config.owner_share_percent,
            },
        }
    }
}

impl Default for RateDefaults {
    fn default() -> Self {
        Self::from_config(&StatementConfig::default())
    }
}

/// Combines the persisted rate book with configured defaults.
pub struct RateResolution<'a> {
    book: &'a dyn RateBook,
    defaults: RateDefaults,
}

impl<'a> RateResolution<'a> {
    pub fn new(book: &'a dyn RateBook, defaults: RateDefaults) -> Self {
        Self { book, defaults }
    }

    pub fn defaults(&self) -> RateDefaults {
        self.defaults
    }

    /// Persisted record for a unit. Lookup failures are logged and treated as absent.
    pub fn persisted(&self, unit: &str) -> Option<DriverRate> {
        let unit = normalize_unit(unit)?;
        match self.book.rate_for(&unit) {
            Ok(found) => found,
            Err(error) => {
                warn!(unit = %unit, error = %error, "rate book lookup failed; using sheet or default rate");
                None
            }
        }
    }

    /// Driver pay: persisted rate, then the sheet rate, then the default.
    pub fn driver(&self, unit: Option<&str>, sheet: Option<CompensationModel>) -> CompensationModel {
        unit.and_then(|unit| self.persisted(unit))
            .and_then(|rate| CompensationModel::rate_from_value(rate.rate_per_mile))
            .or(sheet)
            .unwrap_or(self.defaults.driver)
    }

    /// Owner pay: sheet share, then the default share.
    pub fn owner(&self, sheet: Option<CompensationModel>) -> CompensationModel {
        sheet.unwrap_or(self.defaults.owner)
    }
}
