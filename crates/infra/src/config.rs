use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Postgres connection string. The reminders are kept in memory
    /// when this is not set.
    pub database_url: Option<String>,
    /// Api key for the email provider. Notifications are skipped
    /// when this is not set.
    pub resend_api_key: Option<String>,
    /// Sender of the notification emails, e.g. `Reminder System <noreply@example.com>`
    pub email_from: String,
    /// Upper bound for delivering a single notification
    pub notification_timeout: Duration,
    /// How often the background job checks the reminders. `None` disables the job.
    pub check_reminders_interval: Option<Duration>,
    /// A single check stops evaluating reminders after this long.
    /// Reminders it did not get to are stored unchanged.
    pub check_reminders_deadline: Option<Duration>,
}

fn env_var(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(val) if !val.trim().is_empty() => Some(val),
        _ => None,
    }
}

fn env_number(name: &str, default: u64) -> u64 {
    match env_var(name) {
        None => default,
        Some(val) => match val.trim().parse::<u64>() {
            Ok(val) => val,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    name, val, default
                );
                default
            }
        },
    }
}

fn optional_secs(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}

impl Config {
    pub fn new() -> Self {
        let port = env_number("PORT", 5000) as usize;

        let database_url = env_var("DATABASE_URL");
        let resend_api_key = env_var("RESEND_API_KEY");
        if resend_api_key.is_none() {
            info!("Did not find RESEND_API_KEY environment variable. Notification emails will not be sent.");
        }

        let from_address =
            env_var("REMINDER_EMAIL_FROM").unwrap_or_else(|| "noreply@remindly.local".into());
        let from_name =
            env_var("REMINDER_EMAIL_FROM_NAME").unwrap_or_else(|| "Reminder System".into());

        Self {
            port,
            database_url,
            resend_api_key,
            email_from: format!("{} <{}>", from_name, from_address),
            notification_timeout: Duration::from_secs(env_number("NOTIFICATION_TIMEOUT_SECS", 10)),
            check_reminders_interval: optional_secs(env_number(
                "CHECK_REMINDERS_INTERVAL_SECS",
                60 * 60,
            )),
            check_reminders_deadline: optional_secs(env_number(
                "CHECK_REMINDERS_DEADLINE_SECS",
                5 * 60,
            )),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_secs_disables() {
        assert_eq!(optional_secs(0), None);
        assert_eq!(optional_secs(30), Some(Duration::from_secs(30)));
    }

    #[test]
    fn malformed_numbers_fall_back_to_default() {
        std::env::set_var("REMINDLY_TEST_NUMBER", "ten");
        assert_eq!(env_number("REMINDLY_TEST_NUMBER", 10), 10);
        std::env::set_var("REMINDLY_TEST_NUMBER", " 42 ");
        assert_eq!(env_number("REMINDLY_TEST_NUMBER", 10), 42);
        std::env::remove_var("REMINDLY_TEST_NUMBER");
        assert_eq!(env_number("REMINDLY_TEST_NUMBER", 10), 10);
    }
}
