use remindly_api::Application;
use remindly_infra::{ISys, InMemoryNotifier, RemindlyContext};
use remindly_sdk::RemindlySDK;
use std::sync::Arc;

/// Mon May 27 2024 08:00:00 UTC
pub const NOW_MILLIS: i64 = 1716796800000;

pub struct StaticTimeSys;
impl ISys for StaticTimeSys {
    fn get_timestamp_millis(&self) -> i64 {
        NOW_MILLIS
    }
}

pub struct TestApp {
    pub notifier: Arc<InMemoryNotifier>,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, RemindlySDK, String) {
    let mut ctx = RemindlyContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx.config.check_reminders_interval = None;
    ctx.sys = Arc::new(StaticTimeSys);
    let notifier = Arc::new(InMemoryNotifier::new());
    ctx.notifier = notifier.clone();

    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp {
        notifier,
    };
    let sdk = RemindlySDK::new(address.clone());
    (app, sdk, address)
}
