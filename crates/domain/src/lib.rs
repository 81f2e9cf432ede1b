mod date;
mod notification;
mod reminder;
mod shared;
mod tick;

pub use date::{add_months, days_between, format_date, parse_date};
pub use notification::NotificationRequest;
pub use reminder::{Frequency, Reminder, ReminderDraft, ReminderValidationError};
pub use shared::entity::{InvalidIDError, ID};
pub use tick::{plan_tick, ReminderAction, ReminderDecision};
