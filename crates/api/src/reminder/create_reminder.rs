use crate::{
    error::RemindlyError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use remindly_api_structs::create_reminder::*;
use remindly_domain::{Reminder, ReminderDraft, ReminderValidationError, ID};
use remindly_infra::RemindlyContext;
use tracing::info;

pub async fn create_reminder_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<RemindlyContext>,
) -> Result<HttpResponse, RemindlyError> {
    let body = body.0;
    let usecase = CreateReminderUseCase {
        draft: ReminderDraft {
            id: body.id,
            title: body.title,
            email: body.email,
            date: body.date,
            advance_days: body.advance_days,
            frequency: body.frequency,
            created: body.created,
        },
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(RemindlyError::from)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub draft: ReminderDraft,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidReminder(ReminderValidationError),
    IDTaken(ID),
    StorageError,
}

impl From<UseCaseError> for RemindlyError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidReminder(e) => Self::BadClientData(e.to_string()),
            UseCaseError::IDTaken(id) => Self::Conflict(format!(
                "A reminder with id: {}, already exists.",
                id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &RemindlyContext) -> Result<Self::Response, Self::Error> {
        let draft = std::mem::take(&mut self.draft);
        let reminder = draft
            .validate(ctx.sys.now())
            .map_err(UseCaseError::InvalidReminder)?;

        let _guard = ctx.reminders_lock.lock().await;
        let mut reminders = ctx
            .repos
            .reminders
            .load_all()
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        if reminders.iter().any(|r| r.id == reminder.id) {
            return Err(UseCaseError::IDTaken(reminder.id));
        }

        reminders.push(reminder.clone());
        ctx.repos
            .reminders
            .save_all(&reminders)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        info!(
            "Created reminder {}, now storing {} reminders",
            reminder.id,
            reminders.len()
        );
        Ok(reminder)
    }
}
