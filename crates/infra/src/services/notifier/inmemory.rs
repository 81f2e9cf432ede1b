use super::INotifier;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SentNotification {
    pub destination: String,
    pub subject: String,
    pub body: String,
}

/// Keeps delivered notifications in memory so that tests can inspect them
pub struct InMemoryNotifier {
    sent: Mutex<Vec<SentNotification>>,
    failing: AtomicBool,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// While failing every `send` returns an error and nothing is recorded
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(_) => Vec::new(),
        }
    }
}

impl Default for InMemoryNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INotifier for InMemoryNotifier {
    async fn send(&self, destination: &str, subject: &str, body: &str) -> anyhow::Result<bool> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow::Error::msg("Notifier is set to fail"));
        }
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| anyhow::Error::msg("Notification log lock is poisoned"))?;
        sent.push(SentNotification {
            destination: destination.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(true)
    }
}
