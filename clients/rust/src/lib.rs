mod base;
mod reminder;
mod status;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIResponse};
pub use reminder::{CreateReminderInput, ReminderClient};
pub use remindly_api_structs::create_reminder::RequestBody as CreateReminderBody;
pub use remindly_api_structs::dtos::ReminderDTO as Reminder;
pub use remindly_domain::{Frequency, ID};
use status::StatusClient;
use std::sync::Arc;

/// Remindly Server SDK
///
/// The SDK contains methods for interacting with the Remindly server
/// API.
#[derive(Clone)]
pub struct RemindlySDK {
    pub reminder: ReminderClient,
    pub status: StatusClient,
}

impl RemindlySDK {
    /// `address` is the base url of the api, e.g. `http://localhost:5000/api/v1`
    pub fn new<T: Into<String>>(address: T) -> Self {
        let base = Arc::new(BaseClient::new(address.into()));
        let reminder = ReminderClient::new(base.clone());
        let status = StatusClient::new(base);

        Self { reminder, status }
    }
}
