use super::INotifier;
use crate::Config;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

const RESEND_EMAILS_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
}

/// Sends notification emails through the Resend http api
pub struct ResendNotifier {
    client: Client,
    api_key: Option<String>,
    from: String,
    url: String,
}

impl ResendNotifier {
    pub fn new(config: &Config) -> Self {
        Self::with_url(config, RESEND_EMAILS_URL)
    }

    pub fn with_url(config: &Config, url: &str) -> Self {
        let client = match Client::builder().timeout(config.notification_timeout).build() {
            Ok(client) => client,
            Err(e) => {
                error!("Unable to build http client with timeout: {:?}", e);
                Client::new()
            }
        };
        Self {
            client,
            api_key: config.resend_api_key.clone(),
            from: config.email_from.clone(),
            url: url.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl INotifier for ResendNotifier {
    async fn send(&self, destination: &str, subject: &str, body: &str) -> anyhow::Result<bool> {
        let api_key = match &self.api_key {
            Some(key) => key,
            None => {
                info!("No email api key configured, skipping email to {}", destination);
                return Ok(false);
            }
        };

        let res = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&SendEmailRequest {
                from: &self.from,
                to: vec![destination],
                subject,
                html: body,
            })
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(anyhow::Error::msg(format!(
                "Email api responded with {}: {}",
                status, text
            )));
        }

        info!("Email sent successfully: {}", text);
        Ok(true)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    fn config(api_key: Option<&str>) -> Config {
        Config {
            port: 0,
            database_url: None,
            resend_api_key: api_key.map(String::from),
            email_from: "Reminder System <noreply@remindly.local>".into(),
            notification_timeout: Duration::from_secs(2),
            check_reminders_interval: None,
            check_reminders_deadline: None,
        }
    }

    #[tokio::test]
    async fn it_skips_without_api_key() {
        let notifier = ResendNotifier::with_url(&config(None), "http://127.0.0.1:9/emails");
        let res = notifier.send("me@example.com", "Hi", "<p>Hi</p>").await;
        assert_eq!(res.ok(), Some(false));
    }

    #[tokio::test]
    async fn it_reports_transport_failures() {
        let notifier = ResendNotifier::with_url(&config(Some("key")), "http://127.0.0.1:9/emails");
        let res = notifier.send("me@example.com", "Hi", "<p>Hi</p>").await;
        assert!(res.is_err());
    }

    #[test]
    fn it_serializes_the_email_payload() {
        let req = SendEmailRequest {
            from: "A <a@b.io>",
            to: vec!["me@example.com"],
            subject: "Hi",
            html: "<p>Hi</p>",
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["to"][0], "me@example.com");
        assert_eq!(json["html"], "<p>Hi</p>");
    }
}
