mod notifier;

pub use notifier::{INotifier, InMemoryNotifier, ResendNotifier, SentNotification};
