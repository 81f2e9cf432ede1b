mod inmemory;
mod resend;

pub use inmemory::{InMemoryNotifier, SentNotification};
pub use resend::ResendNotifier;

/// Delivers a rendered notification to a single destination
#[async_trait::async_trait]
pub trait INotifier: Send + Sync {
    /// `Ok(true)` when the message was accepted for delivery and `Ok(false)`
    /// when the notifier decided not to send it. Transport and provider
    /// failures are errors.
    async fn send(&self, destination: &str, subject: &str, body: &str) -> anyhow::Result<bool>;
}
