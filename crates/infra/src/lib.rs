mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{IReminderRepo, Repos};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys};
use tokio::sync::Mutex;
use tracing::warn;

#[derive(Clone)]
pub struct RemindlyContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notifier: Arc<dyn INotifier>,
    /// Held for the whole read-modify-write cycle on the reminder set so that
    /// a check and a create or delete never interleave.
    pub reminders_lock: Arc<Mutex<()>>,
}

impl RemindlyContext {
    fn create(repos: Repos, config: Config) -> Self {
        let notifier = Arc::new(ResendNotifier::new(&config));
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            notifier,
            reminders_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn create_inmemory() -> Self {
        Self::create(Repos::create_inmemory(), Config::new())
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<RemindlyContext> {
    let config = Config::new();
    let repos = match &config.database_url {
        Some(connection_string) => Repos::create_postgres(connection_string).await?,
        None => {
            warn!("Did not find DATABASE_URL environment variable. Reminders are only kept in memory.");
            Repos::create_inmemory()
        }
    };
    Ok(RemindlyContext::create(repos, config))
}
