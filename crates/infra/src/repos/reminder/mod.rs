mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;

use remindly_domain::Reminder;

/// Storage of the complete reminder set.
///
/// The set is always read and written as a whole. `save_all` either replaces
/// every stored reminder or leaves the stored set untouched.
#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// All stored reminders in insertion order, empty when nothing was stored yet
    async fn load_all(&self) -> anyhow::Result<Vec<Reminder>>;
    async fn save_all(&self, reminders: &[Reminder]) -> anyhow::Result<()>;
}
