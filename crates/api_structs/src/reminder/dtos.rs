use chrono::{DateTime, NaiveDate, Utc};
use remindly_domain::{Frequency, Reminder, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub title: String,
    pub email: String,
    pub date: NaiveDate,
    pub advance_days: u32,
    pub frequency: Frequency,
    pub last_sent: Option<DateTime<Utc>>,
    pub next_check: Option<NaiveDate>,
    pub created: Option<DateTime<Utc>>,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            title: reminder.title,
            email: reminder.email,
            date: reminder.date,
            advance_days: reminder.advance_days,
            frequency: reminder.frequency,
            last_sent: reminder.last_sent,
            next_check: reminder.next_check,
            created: reminder.created,
        }
    }
}
