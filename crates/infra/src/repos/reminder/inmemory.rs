use super::IReminderRepo;
use remindly_domain::Reminder;
use std::sync::Mutex;

pub struct InMemoryReminderRepo {
    reminders: Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn load_all(&self) -> anyhow::Result<Vec<Reminder>> {
        let reminders = self
            .reminders
            .lock()
            .map_err(|_| anyhow::Error::msg("Reminder collection lock is poisoned"))?;
        Ok(reminders.clone())
    }

    async fn save_all(&self, reminders: &[Reminder]) -> anyhow::Result<()> {
        let mut stored = self
            .reminders
            .lock()
            .map_err(|_| anyhow::Error::msg("Reminder collection lock is poisoned"))?;
        *stored = reminders.to_vec();
        Ok(())
    }
}
