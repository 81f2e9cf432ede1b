use crate::{
    error::RemindlyError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use remindly_api_structs::delete_reminder::*;
use remindly_domain::{Reminder, ID};
use remindly_infra::RemindlyContext;

pub async fn delete_reminder_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<RemindlyContext>,
) -> Result<HttpResponse, RemindlyError> {
    let usecase = DeleteReminderUseCase {
        reminder_id: path_params.into_inner().reminder_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(RemindlyError::from)
}

#[derive(Debug)]
pub struct DeleteReminderUseCase {
    pub reminder_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for RemindlyError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteReminder";

    async fn execute(&mut self, ctx: &RemindlyContext) -> Result<Self::Response, Self::Error> {
        let _guard = ctx.reminders_lock.lock().await;
        let mut reminders = ctx
            .repos
            .reminders
            .load_all()
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let pos = match reminders.iter().position(|r| r.id == self.reminder_id) {
            Some(pos) => pos,
            None => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        };
        let deleted = reminders.remove(pos);

        ctx.repos
            .reminders
            .save_all(&reminders)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(deleted)
    }
}
