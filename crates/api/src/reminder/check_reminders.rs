use crate::{
    error::RemindlyError,
    shared::usecase::{execute, UseCase},
};
use actix_web::rt::time::{timeout, Instant};
use actix_web::{web, HttpResponse};
use remindly_api_structs::check_reminders::*;
use remindly_domain::{plan_tick, NotificationRequest, ReminderAction};
use remindly_infra::RemindlyContext;
use std::time::Duration;
use tracing::{error, info, warn};

pub async fn check_reminders_controller(
    ctx: web::Data<RemindlyContext>,
) -> Result<HttpResponse, RemindlyError> {
    let usecase = CheckRemindersUseCase::with_timeout(ctx.config.check_reminders_deadline);

    execute(usecase, &ctx)
        .await
        .map(|report| HttpResponse::Ok().json(report.into_response()))
        .map_err(RemindlyError::from)
}

/// Runs one check over every stored reminder: sends the notifications that
/// are due today, moves repeating reminders past their date to the next
/// occurrence and drops expired one-off reminders.
#[derive(Debug, Default)]
pub struct CheckRemindersUseCase {
    /// Reminders not evaluated before this instant are stored unchanged
    pub deadline: Option<Instant>,
}

impl CheckRemindersUseCase {
    pub fn with_timeout(max_duration: Option<Duration>) -> Self {
        Self {
            deadline: max_duration.map(|d| Instant::now() + d),
        }
    }

    fn deadline_passed(&self) -> bool {
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckRemindersReport {
    pub evaluated: usize,
    pub emails_sent: usize,
    pub failed_dispatches: usize,
    pub advanced: usize,
    pub removed: usize,
    pub skipped: usize,
    pub active_reminders: usize,
}

impl CheckRemindersReport {
    pub fn into_response(self) -> APIResponse {
        APIResponse {
            message: format!(
                "Reminders checked. Emails sent: {}, Active reminders: {}",
                self.emails_sent, self.active_reminders
            ),
            evaluated: self.evaluated,
            emails_sent: self.emails_sent,
            failed_dispatches: self.failed_dispatches,
            advanced: self.advanced,
            removed: self.removed,
            skipped: self.skipped,
            active_reminders: self.active_reminders,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for RemindlyError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

/// Delivery failures never escape this function, they only mean that the
/// notification was not sent during this check.
async fn dispatch(notification: &NotificationRequest, ctx: &RemindlyContext) -> bool {
    let send = ctx.notifier.send(
        &notification.destination,
        &notification.subject,
        &notification.body,
    );
    match timeout(ctx.config.notification_timeout, send).await {
        Ok(Ok(true)) => true,
        Ok(Ok(false)) => {
            warn!(
                "Notification for reminder {} was not sent",
                notification.reminder_id
            );
            false
        }
        Ok(Err(e)) => {
            error!(
                "Error sending notification for reminder {}: {:?}",
                notification.reminder_id, e
            );
            false
        }
        Err(_) => {
            error!(
                "Sending notification for reminder {} timed out",
                notification.reminder_id
            );
            false
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CheckRemindersUseCase {
    type Response = CheckRemindersReport;

    type Error = UseCaseError;

    const NAME: &'static str = "CheckReminders";

    async fn execute(&mut self, ctx: &RemindlyContext) -> Result<Self::Response, Self::Error> {
        let _guard = ctx.reminders_lock.lock().await;
        let reminders = ctx
            .repos
            .reminders
            .load_all()
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let today = ctx.sys.now().date_naive();
        info!("Checking {} reminders for {}", reminders.len(), today);

        let mut report = CheckRemindersReport::default();
        let mut survivors = Vec::with_capacity(reminders.len());
        let mut decisions = plan_tick(reminders, today).into_iter();

        while let Some(decision) = decisions.next() {
            if self.deadline_passed() {
                let unevaluated = std::iter::once(decision)
                    .chain(decisions.by_ref())
                    .map(|d| d.reminder)
                    .collect::<Vec<_>>();
                warn!(
                    "Deadline passed, {} reminders are left for the next check",
                    unevaluated.len()
                );
                report.skipped = unevaluated.len();
                survivors.extend(unevaluated);
                break;
            }
            report.evaluated += 1;

            let sent_at = match &decision.notification {
                Some(notification) => {
                    if dispatch(notification, ctx).await {
                        report.emails_sent += 1;
                        Some(ctx.sys.now())
                    } else {
                        report.failed_dispatches += 1;
                        None
                    }
                }
                None => None,
            };

            match &decision.action {
                ReminderAction::Advance(date) => {
                    info!("Reminder {} moves to {}", decision.reminder.id, date);
                    report.advanced += 1;
                }
                ReminderAction::Expire => {
                    info!("Reminder {} has expired", decision.reminder.id);
                    report.removed += 1;
                }
                ReminderAction::Keep => (),
            }

            if let Some(reminder) = decision.resolve(sent_at) {
                survivors.push(reminder);
            }
        }

        ctx.repos
            .reminders
            .save_all(&survivors)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        report.active_reminders = survivors.len();

        info!(
            "Reminders checked. Emails sent: {}, Active reminders: {}",
            report.emails_sent, report.active_reminders
        );
        Ok(report)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::prelude::*;
    use remindly_domain::{Frequency, Reminder};
    use remindly_infra::{INotifier, IReminderRepo, ISys, InMemoryNotifier, Repos};
    use std::sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    };

    /// Clock that can be moved around by the tests
    struct TestSys {
        millis: AtomicI64,
    }

    impl TestSys {
        fn at(date: NaiveDate) -> Arc<Self> {
            let sys = Arc::new(Self {
                millis: AtomicI64::new(0),
            });
            sys.set(date);
            sys
        }

        fn set(&self, date: NaiveDate) {
            let ts = Utc.from_utc_datetime(&date.and_hms_opt(9, 0, 0).unwrap());
            self.millis.store(ts.timestamp_millis(), Ordering::SeqCst);
        }
    }

    impl ISys for TestSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.millis.load(Ordering::SeqCst)
        }
    }

    /// Delivers every notification after `delay`
    struct SlowNotifier {
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl INotifier for SlowNotifier {
        async fn send(&self, _: &str, _: &str, _: &str) -> anyhow::Result<bool> {
            actix_web::rt::time::sleep(self.delay).await;
            Ok(true)
        }
    }

    /// Loads fine but never manages to store anything
    struct ReadOnlyRepo {
        reminders: Vec<Reminder>,
    }

    #[async_trait::async_trait]
    impl IReminderRepo for ReadOnlyRepo {
        async fn load_all(&self) -> anyhow::Result<Vec<Reminder>> {
            Ok(self.reminders.clone())
        }

        async fn save_all(&self, _: &[Reminder]) -> anyhow::Result<()> {
            Err(anyhow::Error::msg("Disk is full"))
        }
    }

    struct BrokenRepo;

    #[async_trait::async_trait]
    impl IReminderRepo for BrokenRepo {
        async fn load_all(&self) -> anyhow::Result<Vec<Reminder>> {
            Err(anyhow::Error::msg("Connection refused"))
        }

        async fn save_all(&self, _: &[Reminder]) -> anyhow::Result<()> {
            Err(anyhow::Error::msg("Connection refused"))
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reminder(id: &str, date: NaiveDate, advance_days: u32, frequency: Frequency) -> Reminder {
        Reminder {
            id: id.parse().unwrap(),
            title: format!("Reminder {}", id),
            email: format!("{}@example.com", id),
            date,
            advance_days,
            frequency,
            last_sent: None,
            next_check: None,
            created: None,
        }
    }

    struct TestContext {
        ctx: RemindlyContext,
        sys: Arc<TestSys>,
        notifier: Arc<InMemoryNotifier>,
    }

    async fn setup(today: NaiveDate, reminders: Vec<Reminder>) -> TestContext {
        let mut ctx = RemindlyContext::create_inmemory();
        let sys = TestSys::at(today);
        let notifier = Arc::new(InMemoryNotifier::new());
        ctx.sys = sys.clone();
        ctx.notifier = notifier.clone();
        ctx.repos.reminders.save_all(&reminders).await.unwrap();
        TestContext { ctx, sys, notifier }
    }

    async fn check(ctx: &RemindlyContext) -> Result<CheckRemindersReport, UseCaseError> {
        execute(CheckRemindersUseCase::default(), ctx).await
    }

    async fn stored(ctx: &RemindlyContext) -> Vec<Reminder> {
        ctx.repos.reminders.load_all().await.unwrap()
    }

    #[actix_web::test]
    async fn sends_due_reminder_once_per_day() {
        let t = setup(
            ymd(2024, 5, 27),
            vec![reminder("1", ymd(2024, 6, 1), 5, Frequency::Once)],
        )
        .await;

        let report = check(&t.ctx).await.expect("Check to succeed");
        assert_eq!(report.emails_sent, 1);
        assert_eq!(report.active_reminders, 1);

        let sent = t.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].destination, "1@example.com");
        assert_eq!(sent[0].subject, "🔔 Reminder: Reminder 1");

        let reminders = stored(&t.ctx).await;
        let last_sent = reminders[0].last_sent.expect("lastSent to be stored");
        assert_eq!(last_sent.date_naive(), ymd(2024, 5, 27));

        let report = check(&t.ctx).await.expect("Check to succeed");
        assert_eq!(report.emails_sent, 0);
        assert_eq!(t.notifier.sent().len(), 1);
    }

    #[actix_web::test]
    async fn failed_dispatch_is_retried_on_next_check() {
        let t = setup(
            ymd(2024, 5, 27),
            vec![
                reminder("1", ymd(2024, 6, 1), 5, Frequency::Once),
                reminder("2", ymd(2024, 5, 27), 0, Frequency::Monthly),
            ],
        )
        .await;

        t.notifier.set_failing(true);
        let report = check(&t.ctx).await.expect("Dispatch errors to not fail the check");
        assert_eq!(report.emails_sent, 0);
        assert_eq!(report.failed_dispatches, 2);
        assert_eq!(report.active_reminders, 2);
        assert!(stored(&t.ctx).await.iter().all(|r| r.last_sent.is_none()));

        t.notifier.set_failing(false);
        let report = check(&t.ctx).await.unwrap();
        assert_eq!(report.emails_sent, 2);
        assert_eq!(t.notifier.sent().len(), 2);
    }

    #[actix_web::test]
    async fn slow_notifier_times_out() {
        let mut t = setup(
            ymd(2024, 5, 27),
            vec![reminder("1", ymd(2024, 5, 27), 0, Frequency::Once)],
        )
        .await;
        t.ctx.notifier = Arc::new(SlowNotifier {
            delay: Duration::from_secs(5),
        });
        t.ctx.config.notification_timeout = Duration::from_millis(20);

        let report = check(&t.ctx).await.unwrap();
        assert_eq!(report.failed_dispatches, 1);
        assert_eq!(stored(&t.ctx).await[0].last_sent, None);
    }

    #[actix_web::test]
    async fn advances_and_expires_over_days() {
        let t = setup(
            ymd(2024, 3, 10),
            vec![
                reminder("yearly", ymd(2024, 3, 10), 0, Frequency::Yearly),
                reminder("once", ymd(2024, 3, 10), 0, Frequency::Once),
            ],
        )
        .await;

        let report = check(&t.ctx).await.unwrap();
        assert_eq!(report.emails_sent, 2);

        t.sys.set(ymd(2024, 3, 11));
        let report = check(&t.ctx).await.unwrap();
        assert_eq!(report.advanced, 1);
        assert_eq!(report.removed, 0);
        let reminders = stored(&t.ctx).await;
        assert_eq!(reminders[0].date, ymd(2025, 3, 10));
        assert_eq!(reminders[0].last_sent, None);
        assert_eq!(reminders[1].date, ymd(2024, 3, 10));

        t.sys.set(ymd(2024, 3, 12));
        let report = check(&t.ctx).await.unwrap();
        assert_eq!(report.removed, 1);
        let reminders = stored(&t.ctx).await;
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].id.as_str(), "yearly");
        assert_eq!(t.notifier.sent().len(), 2);
    }

    #[actix_web::test]
    async fn passed_deadline_keeps_reminders_unchanged() {
        let reminders = vec![
            reminder("1", ymd(2024, 5, 27), 0, Frequency::Once),
            reminder("2", ymd(2023, 1, 1), 0, Frequency::Once),
        ];
        let t = setup(ymd(2024, 5, 27), reminders.clone()).await;

        let usecase = CheckRemindersUseCase {
            deadline: Some(Instant::now()),
        };
        let report = execute(usecase, &t.ctx).await.unwrap();
        assert_eq!(report.evaluated, 0);
        assert_eq!(report.skipped, 2);
        assert!(t.notifier.sent().is_empty());
        assert_eq!(stored(&t.ctx).await, reminders);
    }

    #[actix_web::test]
    async fn deadline_passing_mid_check_saves_progress_and_untouched_rest() {
        let reminders = vec![
            reminder("1", ymd(2024, 5, 27), 0, Frequency::Once),
            reminder("2", ymd(2024, 5, 27), 0, Frequency::Monthly),
            reminder("3", ymd(2023, 1, 1), 0, Frequency::Once),
        ];
        let mut t = setup(ymd(2024, 5, 27), reminders.clone()).await;
        t.ctx.notifier = Arc::new(SlowNotifier {
            delay: Duration::from_millis(50),
        });
        t.ctx.config.notification_timeout = Duration::from_secs(5);

        let usecase = CheckRemindersUseCase {
            deadline: Some(Instant::now() + Duration::from_millis(20)),
        };
        let report = execute(usecase, &t.ctx).await.unwrap();
        assert_eq!(report.evaluated, 1);
        assert_eq!(report.emails_sent, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.removed, 0);
        assert_eq!(report.active_reminders, 3);

        let stored = stored(&t.ctx).await;
        assert_eq!(stored.len(), 3);
        let last_sent = stored[0].last_sent.expect("Sent reminder to be stamped");
        assert_eq!(last_sent.date_naive(), ymd(2024, 5, 27));
        assert_eq!(stored[1..], reminders[1..]);
    }

    #[actix_web::test]
    async fn deadline_passing_during_slow_dispatch_keeps_set_unchanged() {
        let reminders = vec![
            reminder("1", ymd(2024, 5, 27), 0, Frequency::Once),
            reminder("2", ymd(2024, 5, 27), 0, Frequency::Monthly),
            reminder("3", ymd(2023, 1, 1), 0, Frequency::Once),
        ];
        let mut t = setup(ymd(2024, 5, 27), reminders.clone()).await;
        t.ctx.notifier = Arc::new(SlowNotifier {
            delay: Duration::from_secs(5),
        });
        t.ctx.config.notification_timeout = Duration::from_millis(50);

        let usecase = CheckRemindersUseCase {
            deadline: Some(Instant::now() + Duration::from_millis(20)),
        };
        let report = execute(usecase, &t.ctx).await.unwrap();
        assert_eq!(report.evaluated, 1);
        assert_eq!(report.failed_dispatches, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.active_reminders, 3);
        assert_eq!(stored(&t.ctx).await, reminders);
    }

    #[actix_web::test]
    async fn load_failure_aborts_the_check() {
        let mut t = setup(ymd(2024, 5, 27), vec![]).await;
        t.ctx.repos = Repos {
            reminders: Arc::new(BrokenRepo),
        };
        assert_eq!(check(&t.ctx).await, Err(UseCaseError::StorageError));
        assert!(t.notifier.sent().is_empty());
    }

    #[actix_web::test]
    async fn save_failure_is_reported() {
        let reminders = vec![reminder("1", ymd(2024, 5, 20), 0, Frequency::Once)];
        let mut t = setup(ymd(2024, 5, 27), vec![]).await;
        let repo = Arc::new(ReadOnlyRepo {
            reminders: reminders.clone(),
        });
        t.ctx.repos = Repos {
            reminders: repo.clone(),
        };

        assert_eq!(check(&t.ctx).await, Err(UseCaseError::StorageError));
        assert_eq!(repo.load_all().await.unwrap(), reminders);
    }

    #[actix_web::test]
    async fn empty_store_is_fine() {
        let t = setup(ymd(2024, 5, 27), vec![]).await;
        let report = check(&t.ctx).await.unwrap();
        assert_eq!(report, CheckRemindersReport::default());
    }

    #[test]
    fn report_message_matches_counts() {
        let report = CheckRemindersReport {
            emails_sent: 2,
            active_reminders: 5,
            ..Default::default()
        };
        let res = report.into_response();
        assert_eq!(
            res.message,
            "Reminders checked. Emails sent: 2, Active reminders: 5"
        );
        assert_eq!(res.active_reminders, 5);
    }

    #[test]
    fn timeout_sets_deadline_in_the_future() {
        let usecase = CheckRemindersUseCase::with_timeout(Some(Duration::from_secs(60)));
        assert!(!usecase.deadline_passed());
        assert!(!CheckRemindersUseCase::with_timeout(None).deadline_passed());
    }
}
