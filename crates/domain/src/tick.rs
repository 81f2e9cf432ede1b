use crate::{notification::NotificationRequest, reminder::Reminder};
use chrono::prelude::*;

/// What happens to a `Reminder` after its notification (if any) was attempted
#[derive(Debug, Clone, PartialEq)]
pub enum ReminderAction {
    /// Stays in the set as is
    Keep,
    /// The occurrence has passed and the reminder repeats, move it to this date
    Advance(NaiveDate),
    /// One-off reminder that is past its grace day, drop it from the set
    Expire,
}

/// The outcome of evaluating one `Reminder` against a given day.
///
/// Evaluation is pure. The notification is only a request, whether it was
/// delivered is fed back through `resolve`.
#[derive(Debug, Clone)]
pub struct ReminderDecision {
    pub reminder: Reminder,
    pub days_until: i64,
    pub notification: Option<NotificationRequest>,
    pub action: ReminderAction,
}

impl ReminderDecision {
    pub fn evaluate(reminder: Reminder, today: NaiveDate) -> Self {
        let days_until = reminder.days_until(today);

        let notification = if reminder.is_due(today) {
            Some(NotificationRequest::for_reminder(&reminder))
        } else {
            None
        };

        let action = if days_until < 0 {
            match reminder.next_occurrence() {
                Some(next) => ReminderAction::Advance(next),
                None if reminder.is_expired(today) => ReminderAction::Expire,
                None => ReminderAction::Keep,
            }
        } else {
            ReminderAction::Keep
        };

        Self {
            reminder,
            days_until,
            notification,
            action,
        }
    }

    /// Applies the dispatch outcome and the planned action.
    ///
    /// `sent_at` is the time the notification was delivered, `None` when there
    /// was nothing to send or the dispatch failed. Returns `None` when the
    /// reminder should no longer be stored.
    pub fn resolve(self, sent_at: Option<DateTime<Utc>>) -> Option<Reminder> {
        let mut reminder = self.reminder;
        if self.notification.is_some() {
            if let Some(sent_at) = sent_at {
                reminder.last_sent = Some(sent_at);
            }
        }

        match self.action {
            ReminderAction::Keep => Some(reminder),
            ReminderAction::Advance(date) => {
                reminder.advance_to(date);
                Some(reminder)
            }
            ReminderAction::Expire => None,
        }
    }
}

/// Evaluates every reminder against `today`, keeping the input order
pub fn plan_tick(reminders: Vec<Reminder>, today: NaiveDate) -> Vec<ReminderDecision> {
    reminders
        .into_iter()
        .map(|reminder| ReminderDecision::evaluate(reminder, today))
        .collect()
}
