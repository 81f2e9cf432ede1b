use crate::{reminder::check_reminders::CheckRemindersUseCase, shared::usecase::execute};
use actix_web::rt::time::{interval_at, Instant};
use remindly_infra::RemindlyContext;
use std::time::Duration;
use tracing::info;

/// Seconds until the next multiple of `interval_secs` since the epoch
pub fn get_start_delay(now_ts: usize, interval_secs: usize) -> usize {
    if interval_secs == 0 {
        return 0;
    }
    let now_secs = now_ts / 1000;
    interval_secs - now_secs % interval_secs
}

/// Periodically runs the reminder check. Does nothing when no interval
/// is configured, the check can then only be triggered over http.
pub fn start_check_reminders_job(ctx: RemindlyContext) {
    let period = match ctx.config.check_reminders_interval {
        Some(period) => period,
        None => {
            info!("Scheduled reminder checks are disabled");
            return;
        }
    };

    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize, period.as_secs() as usize);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);
        info!(
            "Checking reminders every {} seconds, first run in {} seconds",
            period.as_secs(),
            secs_to_next_run
        );

        let mut check_interval = interval_at(start, period);
        loop {
            check_interval.tick().await;
            let usecase = CheckRemindersUseCase::with_timeout(ctx.config.check_reminders_deadline);
            // Failures are logged by `execute`, the next run retries
            let _ = execute(usecase, &ctx).await;
        }
    });
}
