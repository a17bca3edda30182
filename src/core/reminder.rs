//! Reminder message rendering and WhatsApp deep-link generation.

use crate::{
    config::ReminderConfig,
    core::{
        ledger::{CustomerRow, PERIOD_COUNT},
        phone,
    },
};

/// Base URL of the messaging deep link.
pub const WHATSAPP_BASE: &str = "https://wa.me";

/// A generated reminder link for one customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    /// Customer the reminder is for
    pub customer_id: String,
    /// Display name
    pub name: String,
    /// Normalized phone number
    pub phone: String,
    /// Deep link with the pre-filled message
    pub link: String,
}

/// Result of generating reminders for many rows at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReminders {
    /// Rows with a usable phone number
    pub reminders: Vec<Reminder>,
    /// Customer ids skipped because their phone number did not normalize
    pub skipped: Vec<String>,
}

/// Fills the message template for one row.
///
/// Placeholders: `{name}`, `{customer_id}`, `{area}`, `{due}`, `{months}`, `{count}`.
#[must_use]
pub fn render_message(
    template: &str,
    row: &CustomerRow,
    periods: &[String; PERIOD_COUNT],
) -> String {
    let months = row.unpaid_periods(periods).join(", ");
    let count = row.unpaid_count.to_string();

    // Single pass so substituted values are never scanned for placeholders.
    let mut message = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        message.push_str(&rest[..open]);
        let tail = &rest[open..];
        let value = tail.find('}').and_then(|close| {
            let value = match &tail[1..close] {
                "name" => row.name.as_str(),
                "customer_id" => row.customer_id.as_str(),
                "area" => row.area.as_str(),
                "due" => row.due_display.as_str(),
                "months" => months.as_str(),
                "count" => count.as_str(),
                _ => return None,
            };
            Some((value, close))
        });
        match value {
            Some((value, close)) => {
                message.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                message.push('{');
                rest = &tail[1..];
            }
        }
    }
    message.push_str(rest);
    message
}

/// Builds a deep link for an already-normalized phone number.
#[must_use]
pub fn deep_link(normalized_phone: &str, message: &str) -> String {
    format!(
        "{WHATSAPP_BASE}/{normalized_phone}?text={}",
        urlencoding::encode(message)
    )
}

/// Builds a reminder link for a raw phone number.
///
/// Returns `None` when the phone number cannot be normalized.
#[must_use]
pub fn reminder_link(raw_phone: &str, message: &str, config: &ReminderConfig) -> Option<String> {
    phone::normalize(raw_phone, &config.country_code, config.local_digits)
        .map(|normalized| deep_link(&normalized, message))
}

/// Builds the reminder for one row using the configured template.
#[must_use]
pub fn reminder_for(
    row: &CustomerRow,
    periods: &[String; PERIOD_COUNT],
    config: &ReminderConfig,
) -> Option<Reminder> {
    let phone = phone::normalize(&row.phone, &config.country_code, config.local_digits)?;
    let message = render_message(&config.template, row, periods);
    Some(Reminder {
        customer_id: row.customer_id.clone(),
        name: row.name.clone(),
        link: deep_link(&phone, &message),
        phone,
    })
}

/// Builds reminders for every row, collecting the rows that were skipped.
#[must_use]
pub fn bulk_reminders<'a, I>(
    rows: I,
    periods: &[String; PERIOD_COUNT],
    config: &ReminderConfig,
) -> BulkReminders
where
    I: IntoIterator<Item = &'a CustomerRow>,
{
    let mut bulk = BulkReminders::default();
    for row in rows {
        match reminder_for(row, periods, config) {
            Some(reminder) => bulk.reminders.push(reminder),
            None => bulk.skipped.push(row.customer_id.clone()),
        }
    }
    tracing::debug!(
        generated = bulk.reminders.len(),
        skipped = bulk.skipped.len(),
        "Bulk reminders generated"
    );
    bulk
}
