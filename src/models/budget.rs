//! Budget entries for events and tasks
//!
//! A budget is either unset, a valid non-negative amount, or an invalid raw
//! entry kept verbatim (for example a hand-edited `"bad"` in the events
//! file). Invalid entries survive a save/load round trip and are skipped by
//! budget aggregation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::money::Money;
use crate::error::{PlannerError, PlannerResult};

/// A budget value as stored on an event or task
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Budget {
    #[default]
    Unset,
    Amount(Money),
    Invalid(String),
}

impl Budget {
    /// Interpret raw text leniently: blank is unset, anything that is not a
    /// non-negative amount is kept as an invalid entry.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::Unset;
        }
        match Money::parse(raw) {
            Ok(amount) if !amount.is_negative() => Self::Amount(amount),
            _ => Self::Invalid(raw.to_string()),
        }
    }

    /// Interpret user input strictly, rejecting invalid amounts
    pub fn from_input(raw: &str) -> PlannerResult<Self> {
        match Self::parse(raw) {
            Self::Invalid(raw) => Err(PlannerError::Validation(format!(
                "Budget must be a non-negative amount, got '{}'",
                raw
            ))),
            budget => Ok(budget),
        }
    }

    /// The amount, when this entry holds a valid one
    pub fn amount(&self) -> Option<Money> {
        match self {
            Self::Amount(amount) => Some(*amount),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

impl From<Money> for Budget {
    fn from(amount: Money) -> Self {
        Self::Amount(amount)
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "-"),
            Self::Amount(amount) => write!(f, "{}", amount),
            Self::Invalid(raw) => write!(f, "invalid ({})", raw),
        }
    }
}

impl Serialize for Budget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unset => serializer.serialize_none(),
            Self::Amount(amount) => serializer.serialize_str(&amount.to_string()),
            Self::Invalid(raw) => serializer.serialize_str(raw),
        }
    }
}

/// Shapes a budget may take in a persisted record
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBudget {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Budget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<RawBudget>::deserialize(deserializer)?;
        Ok(match raw {
            None => Self::Unset,
            Some(RawBudget::Number(value)) => match Money::from_f64(value) {
                Some(amount) if !amount.is_negative() => Self::Amount(amount),
                _ => Self::Invalid(value.to_string()),
            },
            Some(RawBudget::Text(text)) => Self::parse(&text),
        })
    }
}
