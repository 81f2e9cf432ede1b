use crate::dtos::ReminderDTO;
use remindly_domain::{Reminder, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
        }
    }
}

pub mod get_reminders {
    use super::*;

    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminders: Vec<ReminderDTO>,
    }

    impl APIResponse {
        pub fn new(reminders: Vec<Reminder>) -> Self {
            Self {
                reminders: reminders.into_iter().map(ReminderDTO::new).collect(),
            }
        }
    }
}

pub mod create_reminder {
    use super::*;
    use chrono::{DateTime, Utc};

    /// Every field is optional on the wire so that missing values are
    /// reported as validation errors instead of malformed json.
    #[derive(Serialize, Deserialize, Debug, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub id: Option<String>,
        #[serde(default)]
        pub title: Option<String>,
        #[serde(default)]
        pub email: Option<String>,
        #[serde(default)]
        pub date: Option<String>,
        #[serde(default)]
        pub advance_days: Option<i64>,
        #[serde(default)]
        pub frequency: Option<String>,
        #[serde(default)]
        pub created: Option<DateTime<Utc>>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod delete_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod check_reminders {
    use super::*;

    #[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// Reminders evaluated during this check
        pub evaluated: usize,
        pub emails_sent: usize,
        /// Due reminders whose notification could not be delivered
        pub failed_dispatches: usize,
        /// Repeating reminders moved to their next occurrence
        pub advanced: usize,
        /// Expired one-off reminders that were dropped
        pub removed: usize,
        /// Reminders left untouched because the check ran out of time
        pub skipped: usize,
        pub active_reminders: usize,
        pub message: String,
    }
}
