//! Recurrence rules
//!
//! A rule is attached to an event and computes the event's occurrence dates
//! from its anchor date. Occurrences are always computed from the anchor
//! (`anchor + n * interval`), so month-end clamping never drifts: a rule
//! anchored on Jan 31 gives Feb 28/29, then Mar 31.
//!
//! Rules never create events on their own; callers decide when to
//! materialize the next occurrence.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PlannerError, PlannerResult};

/// How often an event repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Parse frequency from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" | "d" => Some(Self::Daily),
            "weekly" | "week" | "w" => Some(Self::Weekly),
            "monthly" | "month" | "m" => Some(Self::Monthly),
            "yearly" | "year" | "annually" | "y" => Some(Self::Yearly),
            _ => None,
        }
    }

    fn unit(&self) -> &'static str {
        match self {
            Self::Daily => "day",
            Self::Weekly => "week",
            Self::Monthly => "month",
            Self::Yearly => "year",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

/// A repeat policy: every `interval` units of `frequency`, optionally until a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRecurrenceRule")]
pub struct RecurrenceRule {
    pub frequency: Frequency,

    /// Number of frequency units between occurrences (at least 1)
    pub interval: u32,

    /// Last date an occurrence may fall on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<NaiveDate>,
}

/// Persisted form, checked before it becomes a rule
#[derive(Deserialize)]
struct RawRecurrenceRule {
    frequency: Frequency,
    interval: u32,
    #[serde(default)]
    until: Option<NaiveDate>,
}

impl TryFrom<RawRecurrenceRule> for RecurrenceRule {
    type Error = PlannerError;

    fn try_from(raw: RawRecurrenceRule) -> Result<Self, Self::Error> {
        let rule = Self::new(raw.frequency, raw.interval)?;
        Ok(Self {
            until: raw.until,
            ..rule
        })
    }
}

impl RecurrenceRule {
    /// Create a rule with no end date
    pub fn new(frequency: Frequency, interval: u32) -> PlannerResult<Self> {
        if interval == 0 {
            return Err(PlannerError::Validation(
                "Recurrence interval must be at least 1".into(),
            ));
        }
        Ok(Self {
            frequency,
            interval,
            until: None,
        })
    }

    /// Set the end date
    pub fn until(mut self, until: NaiveDate) -> Self {
        self.until = Some(until);
        self
    }

    /// The `n`th occurrence of a series anchored at `anchor` (n = 0 is the anchor)
    ///
    /// Returns `None` past the end date or when the date would overflow.
    pub fn nth_occurrence(&self, anchor: NaiveDate, n: u32) -> Option<NaiveDate> {
        let steps = self.interval.checked_mul(n)?;
        let date = match self.frequency {
            Frequency::Daily => anchor.checked_add_days(Days::new(u64::from(steps))),
            Frequency::Weekly => anchor.checked_add_days(Days::new(u64::from(steps) * 7)),
            Frequency::Monthly => anchor.checked_add_months(Months::new(steps)),
            Frequency::Yearly => anchor.checked_add_months(Months::new(steps.checked_mul(12)?)),
        }?;

        match self.until {
            Some(until) if date > until => None,
            _ => Some(date),
        }
    }

    /// First occurrence on or after `day`
    pub fn next_on_or_after(&self, anchor: NaiveDate, day: NaiveDate) -> Option<NaiveDate> {
        let mut n = self.steps_lower_bound(anchor, day);
        loop {
            let date = self.nth_occurrence(anchor, n)?;
            if date >= day {
                return Some(date);
            }
            n = n.checked_add(1)?;
        }
    }

    /// The occurrence that follows `current`: the first one strictly after it
    pub fn advance(&self, anchor: NaiveDate, current: NaiveDate) -> Option<NaiveDate> {
        let day_after = current.checked_add_days(Days::new(1))?;
        self.next_on_or_after(anchor, day_after)
    }

    /// A step count whose occurrence is guaranteed not to be after `day`
    fn steps_lower_bound(&self, anchor: NaiveDate, day: NaiveDate) -> u32 {
        if day <= anchor {
            return 0;
        }
        let interval = i64::from(self.interval);
        let steps = match self.frequency {
            Frequency::Daily => (day - anchor).num_days() / interval,
            Frequency::Weekly => (day - anchor).num_days() / (7 * interval),
            Frequency::Monthly => months_between(anchor, day) / interval - 1,
            Frequency::Yearly => months_between(anchor, day) / (12 * interval) - 1,
        };
        u32::try_from(steps.max(0)).unwrap_or(u32::MAX)
    }
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month())
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.interval == 1 {
            write!(f, "{}", self.frequency)?;
        } else {
            write!(f, "every {} {}s", self.interval, self.frequency.unit())?;
        }
        match self.until {
            Some(until) => write!(f, " until {}", until),
            None => write!(f, " (no end)"),
        }
    }
}
