use crate::{date::format_date, reminder::Reminder, shared::entity::ID};

/// A rendered email for a single due `Reminder`
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRequest {
    pub reminder_id: ID,
    pub destination: String,
    pub subject: String,
    /// HTML body
    pub body: String,
}

impl NotificationRequest {
    pub fn for_reminder(reminder: &Reminder) -> Self {
        let title = escape_html(&reminder.title);
        let days = if reminder.advance_days == 1 {
            "day"
        } else {
            "days"
        };
        let body = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
    <h2 style="color: #333;">📅 You have an upcoming reminder</h2>
    <div style="background: #f9f9f9; padding: 20px; border-radius: 8px; margin: 20px 0;">
        <p><strong>What:</strong> {title}</p>
        <p><strong>Date:</strong> {date}</p>
        <p><strong>Notify:</strong> {advance} {days} before</p>
        <p><strong>Repeats:</strong> {frequency}</p>
    </div>
    <hr style="border: none; border-top: 1px solid #eee;">
    <p style="color: #666; font-size: 12px;">This email was sent automatically by the reminder system</p>
</div>"#,
            title = title,
            date = format_date(&reminder.date),
            advance = reminder.advance_days,
            days = days,
            frequency = reminder.frequency.label(),
        );

        Self {
            reminder_id: reminder.id.clone(),
            destination: reminder.email.clone(),
            subject: format!("🔔 Reminder: {}", reminder.title),
            body,
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
