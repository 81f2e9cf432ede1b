use crate::{APIResponse, BaseClient};
use remindly_api_structs::*;
use remindly_domain::{Frequency, ID};
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateReminderInput {
    /// Generated by the server when not given
    pub id: Option<String>,
    pub title: String,
    pub email: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub advance_days: i64,
    pub frequency: Frequency,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(
        &self,
        input: CreateReminderInput,
    ) -> APIResponse<create_reminder::APIResponse> {
        let body = create_reminder::RequestBody {
            id: input.id,
            title: Some(input.title),
            email: Some(input.email),
            date: Some(input.date),
            advance_days: Some(input.advance_days),
            frequency: Some(input.frequency.as_str().to_string()),
            created: None,
        };
        self.base
            .post(body, "reminders".into(), StatusCode::CREATED)
            .await
    }

    /// Sends the body as is, also when fields are missing
    pub async fn create_raw(
        &self,
        body: create_reminder::RequestBody,
    ) -> APIResponse<create_reminder::APIResponse> {
        self.base
            .post(body, "reminders".into(), StatusCode::CREATED)
            .await
    }

    pub async fn list(&self) -> APIResponse<get_reminders::APIResponse> {
        self.base.get("reminders".into(), StatusCode::OK).await
    }

    pub async fn delete(&self, reminder_id: ID) -> APIResponse<delete_reminder::APIResponse> {
        self.base
            .delete(format!("reminders/{}", reminder_id), StatusCode::OK)
            .await
    }

    /// Runs a reminder check right away
    pub async fn check(&self) -> APIResponse<check_reminders::APIResponse> {
        self.base
            .get("cron/check-reminders".into(), StatusCode::OK)
            .await
    }
}
