use crate::date::{add_months, days_between, parse_date};
use crate::shared::entity::ID;
use chrono::{prelude::*, Duration};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// How a `Reminder` moves to its next occurrence once the current one has passed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Once,
    Monthly,
    Yearly,
}

impl Default for Frequency {
    fn default() -> Self {
        Self::Once
    }
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Human readable label used in notification emails
    pub fn label(&self) -> &'static str {
        match self {
            Self::Once => "One time",
            Self::Monthly => "Every month",
            Self::Yearly => "Every year",
        }
    }
}

impl FromStr for Frequency {
    type Err = ReminderValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "once" => Ok(Self::Once),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(ReminderValidationError::UnknownFrequency(s.to_string())),
        }
    }
}

/// A `Reminder` is a date the owner of `email` wants to be notified about
/// `advance_days` days ahead of time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: ID,
    pub title: String,
    /// Destination address of the notification email
    pub email: String,
    /// The next occurrence. Repeating reminders move this date forward
    /// once it has passed.
    pub date: NaiveDate,
    #[serde(default)]
    pub advance_days: u32,
    #[serde(default)]
    pub frequency: Frequency,
    /// When the last notification for the current `date` was delivered.
    /// Guards against sending twice on the same calendar day.
    #[serde(default)]
    pub last_sent: Option<DateTime<Utc>>,
    /// The day the next notification is expected to go out
    #[serde(default)]
    pub next_check: Option<NaiveDate>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

impl Reminder {
    /// Whole days from `today` until the occurrence, negative once it has passed
    pub fn days_until(&self, today: NaiveDate) -> i64 {
        days_between(today, self.date)
    }

    /// A notification is due when the occurrence is exactly `advance_days`
    /// away and nothing has been delivered yet on `today`.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.days_until(today) == i64::from(self.advance_days) && !self.was_sent_on(today)
    }

    pub fn was_sent_on(&self, day: NaiveDate) -> bool {
        match self.last_sent {
            Some(last_sent) => last_sent.date_naive() == day,
            None => false,
        }
    }

    /// A one-off reminder is expired once its date is more than one day old
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.frequency == Frequency::Once && self.days_until(today) < -1
    }

    /// The occurrence following the current `date`, `None` for one-off reminders
    pub fn next_occurrence(&self) -> Option<NaiveDate> {
        match self.frequency {
            Frequency::Once => None,
            Frequency::Monthly => add_months(self.date, 1),
            Frequency::Yearly => add_months(self.date, 12),
        }
    }

    /// Moves the reminder to a new occurrence which has not been notified yet
    pub fn advance_to(&mut self, date: NaiveDate) {
        self.date = date;
        self.last_sent = None;
        self.next_check = compute_next_check(date, self.advance_days);
    }
}

fn compute_next_check(date: NaiveDate, advance_days: u32) -> Option<NaiveDate> {
    date.checked_sub_signed(Duration::days(i64::from(advance_days)))
}

#[derive(Error, Debug, PartialEq)]
pub enum ReminderValidationError {
    #[error("Missing required field: `{0}`")]
    MissingField(&'static str),
    #[error("The date `{0}` is not a valid YYYY-MM-DD calendar date")]
    InvalidDate(String),
    #[error("advanceDays must be zero or positive, got: `{0}`")]
    InvalidAdvanceDays(i64),
    #[error("Unknown frequency: `{0}`. Expected one of: once, monthly, yearly")]
    UnknownFrequency(String),
}

/// Unvalidated input for creating a `Reminder`
#[derive(Debug, Clone, Default)]
pub struct ReminderDraft {
    pub id: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub date: Option<String>,
    pub advance_days: Option<i64>,
    pub frequency: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ReminderValidationError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ReminderValidationError::MissingField(field)),
    }
}

impl ReminderDraft {
    pub fn validate(self, now: DateTime<Utc>) -> Result<Reminder, ReminderValidationError> {
        let title = required(self.title, "title")?;
        let email = required(self.email, "email")?;
        let datestr = required(self.date, "date")?;
        let date =
            parse_date(&datestr).map_err(|_| ReminderValidationError::InvalidDate(datestr))?;

        let advance_days = match self.advance_days {
            None => 0,
            Some(days) if days < 0 || days > i64::from(u32::MAX) => {
                return Err(ReminderValidationError::InvalidAdvanceDays(days))
            }
            Some(days) => days as u32,
        };
        let frequency = match self.frequency {
            Some(frequency) if !frequency.trim().is_empty() => frequency.parse()?,
            _ => Frequency::default(),
        };
        let id = self
            .id
            .and_then(|id| id.parse::<ID>().ok())
            .unwrap_or_default();

        Ok(Reminder {
            id,
            title,
            email,
            date,
            advance_days,
            frequency,
            last_sent: None,
            next_check: compute_next_check(date, advance_days),
            created: Some(self.created.unwrap_or(now)),
        })
    }
}
