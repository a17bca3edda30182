//! Rendering of dashboard views into message text and embeds.
//!
//! Pure functions over core types so the formatting can be tested without a
//! Discord connection.

use crate::{
    config::ReminderConfig,
    core::{
        auth::Theme,
        ledger::{CustomerRow, PERIOD_COUNT, PaymentStatus},
        phone,
        reminder::BulkReminders,
        view::{Page, Summary, ViewFilter},
    },
    errors::Result,
};
use poise::serenity_prelude as serenity;
use std::fmt::Write;

/// Discord's hard limit on message content length.
pub const MESSAGE_LIMIT: usize = 2000;

/// Embed colour for a theme.
#[must_use]
pub const fn theme_colour(theme: Theme) -> u32 {
    match theme {
        Theme::Light => 0x0019_76D2,
        Theme::Dark => 0x0090_CAF9,
    }
}

/// Short status marker used in table cells.
#[must_use]
pub const fn status_mark(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Payment => "✅",
        PaymentStatus::NoPayment => "❌",
    }
}

/// Table header line.
#[must_use]
pub fn table_header(periods: &[String; PERIOD_COUNT]) -> String {
    format!(
        "#   | Client_ID | PPPoE_Name | Area | Mobile_No | {} | Count | Total_Due",
        periods.join(" | ")
    )
}

/// One table line for a row.
#[must_use]
pub fn table_line(row: &CustomerRow) -> String {
    let marks: Vec<&str> = row.statuses.iter().map(|s| status_mark(*s)).collect();
    format!(
        "{:<3} | {} | {} | {} | {} | {} | {} | {}",
        row.serial,
        row.customer_id,
        row.name,
        row.area,
        if row.phone.is_empty() { "-" } else { row.phone.as_str() },
        marks.join(" | "),
        row.unpaid_count,
        row.due_display
    )
}

/// Splits lines into chunks whose joined length stays within `limit`.
///
/// A single line longer than `limit` is truncated on a character boundary.
#[must_use]
pub fn chunk_lines<I, S>(lines: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in lines {
        let line = truncate(line.as_ref(), limit);
        let needed = if current.is_empty() {
            line.len()
        } else {
            current.len() + 1 + line.len()
        };
        if needed > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn truncate(line: &str, limit: usize) -> &str {
    if line.len() <= limit {
        return line;
    }
    let mut end = limit;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    &line[..end]
}

/// Renders a table page as code-block messages within the message limit.
#[must_use]
pub fn table_messages(page: &Page<'_>, periods: &[String; PERIOD_COUNT]) -> Vec<String> {
    // Room for the ``` fences and newlines around each chunk
    let body_limit = MESSAGE_LIMIT - 8;
    let lines = std::iter::once(table_header(periods))
        .chain(page.rows.iter().map(|row| table_line(row)));

    let mut messages: Vec<String> = chunk_lines(lines, body_limit)
        .into_iter()
        .map(|chunk| format!("```\n{chunk}\n```"))
        .collect();
    messages.push(format!("{} · {} rows", page.label(), page.total));
    messages
}

/// Summary text, e.g. per-period unpaid counts.
pub fn summary_text(
    summary: &Summary,
    periods: &[String; PERIOD_COUNT],
    currency: &str,
) -> Result<String> {
    let mut text = String::new();
    for (label, count) in periods.iter().zip(summary.unpaid.iter()) {
        writeln!(text, "**{label} No Payment:** {count}")?;
    }
    writeln!(text, "**Customers:** {}", summary.total)?;
    write!(text, "**Total Due:** {} {currency}", summary.total_due)?;
    Ok(text)
}

/// Describes the active filter in one line.
#[must_use]
pub fn filter_text(filter: &ViewFilter, periods: &[String; PERIOD_COUNT]) -> String {
    if filter.is_empty() {
        return "No filters (showing all customers)".to_string();
    }

    let mut parts: Vec<String> = periods
        .iter()
        .zip(filter.statuses.iter())
        .filter_map(|(label, status)| status.map(|s| format!("{label}: {s}")))
        .collect();
    if let Some(area) = &filter.area {
        parts.push(format!("Area: {area}"));
    }
    if let Some(due) = filter.due {
        parts.push(format!("Due: {due}"));
    }
    if !filter.search.trim().is_empty() {
        parts.push(format!("Search: \"{}\"", filter.search.trim()));
    }
    parts.join(" · ")
}

/// Phone cell for the details dialog: a `tel:` link when the number normalizes.
#[must_use]
pub fn phone_markdown(raw: &str, reminder: &ReminderConfig) -> String {
    if raw.is_empty() {
        return "-".to_string();
    }
    match phone::normalize(raw, &reminder.country_code, reminder.local_digits) {
        Some(normalized) => format!("[{raw}](tel:+{normalized})"),
        None => raw.to_string(),
    }
}

/// Detail fields for the client details dialog.
#[must_use]
pub fn detail_fields(
    row: &CustomerRow,
    periods: &[String; PERIOD_COUNT],
    reminder: &ReminderConfig,
) -> Vec<(String, String)> {
    let mut fields = vec![
        ("Customer ID".to_string(), row.customer_id.clone()),
        ("PPPoE Name".to_string(), row.name.clone()),
        ("Area".to_string(), row.area.clone()),
        ("Mobile No".to_string(), phone_markdown(&row.phone, reminder)),
    ];
    for (label, status) in periods.iter().zip(row.statuses.iter()) {
        fields.push((label.clone(), status.to_string()));
    }
    fields.push(("Count".to_string(), row.unpaid_count.to_string()));
    fields.push(("Total Due".to_string(), row.due_display.clone()));
    fields
}

/// Embed for the client details dialog.
#[must_use]
pub fn detail_embed(
    row: &CustomerRow,
    periods: &[String; PERIOD_COUNT],
    reminder: &ReminderConfig,
    theme: Theme,
) -> serenity::CreateEmbed {
    detail_fields(row, periods, reminder).into_iter().fold(
        serenity::CreateEmbed::new()
            .title("Client Details")
            .colour(theme_colour(theme)),
        |embed, (name, value)| embed.field(name, value, true),
    )
}

/// Lines listing bulk reminder links and skipped customers.
#[must_use]
pub fn bulk_lines(bulk: &BulkReminders) -> Vec<String> {
    let mut lines: Vec<String> = bulk
        .reminders
        .iter()
        .map(|r| format!("**{}** {}: <{}>", r.customer_id, r.name, r.link))
        .collect();
    if !bulk.skipped.is_empty() {
        lines.push(format!(
            "Skipped (no valid phone): {}",
            bulk.skipped.join(", ")
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::view::paginate;
    use crate::test_utils::*;

    #[test]
    fn test_table_line() {
        let rows = sample_rows();
        assert_eq!(
            table_line(&rows[2]),
            "3   | C-003 | - | Mirpur | - | ✅ | ✅ | ✅ | 0 | 0 TK"
        );
    }

    #[test]
    fn test_chunk_lines_respects_limit() {
        let lines = vec!["aaaa", "bbbb", "cccc"];
        let chunks = chunk_lines(lines, 9);
        assert_eq!(chunks, vec!["aaaa\nbbbb", "cccc"]);
        assert!(chunks.iter().all(|c| c.len() <= 9));
    }

    #[test]
    fn test_chunk_lines_truncates_long_line() {
        let chunks = chunk_lines(["abcdefghij"], 4);
        assert_eq!(chunks, vec!["abcd"]);
    }

    #[test]
    fn test_chunk_lines_empty() {
        let chunks = chunk_lines(Vec::<String>::new(), 10);
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_table_messages_within_limit() {
        let rows = sample_rows();
        let view: Vec<&CustomerRow> = rows.iter().collect();
        let page = paginate(&view, 0, 100);
        let messages = table_messages(&page, &sample_periods());

        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("```\n#   | Client_ID"));
        assert!(messages[0].contains("C-004"));
        assert_eq!(messages[1], "Page 1 of 1 · 4 rows");
        assert!(messages.iter().all(|m| m.len() <= MESSAGE_LIMIT));
    }

    #[test]
    fn test_summary_text() -> Result<()> {
        let summary = crate::core::view::summarize(&sample_rows());
        let text = summary_text(&summary, &sample_periods(), "TK")?;
        assert!(text.contains("**July No Payment:** 3"));
        assert!(text.contains("**June No Payment:** 2"));
        assert!(text.contains("**May No Payment:** 1"));
        assert!(text.ends_with("**Total Due:** 2100 TK"));
        Ok(())
    }

    #[test]
    fn test_filter_text() {
        let periods = sample_periods();
        assert_eq!(
            filter_text(&ViewFilter::default(), &periods),
            "No filters (showing all customers)"
        );

        let filter = ViewFilter {
            statuses: [None, Some(PaymentStatus::NoPayment), None],
            area: Some("Mirpur".to_string()),
            due: None,
            search: " rah ".to_string(),
        };
        assert_eq!(
            filter_text(&filter, &periods),
            "June: No Payment · Area: Mirpur · Search: \"rah\""
        );
    }

    #[test]
    fn test_detail_fields() {
        let rows = sample_rows();
        let fields = detail_fields(&rows[1], &sample_periods(), &ReminderConfig::default());
        assert_eq!(fields.len(), 9);
        assert_eq!(fields[0], ("Customer ID".to_string(), "C-002".to_string()));
        assert_eq!(
            fields[3],
            (
                "Mobile No".to_string(),
                "[1711000000](tel:+8801711000000)".to_string()
            )
        );
        assert_eq!(fields[5], ("June".to_string(), "No Payment".to_string()));
        assert_eq!(fields[6], ("May".to_string(), "Payment".to_string()));
        assert_eq!(fields[8], ("Total Due".to_string(), "300 TK".to_string()));
    }

    #[test]
    fn test_phone_markdown() {
        let reminder = ReminderConfig::default();
        assert_eq!(
            phone_markdown("01815-128906", &reminder),
            "[01815-128906](tel:+8801815128906)"
        );
        assert_eq!(phone_markdown("12345", &reminder), "12345");
        assert_eq!(phone_markdown("", &reminder), "-");
    }

    #[test]
    fn test_bulk_lines_lists_skipped() {
        let bulk = BulkReminders {
            reminders: Vec::new(),
            skipped: vec!["C-003".to_string(), "C-004".to_string()],
        };
        assert_eq!(
            bulk_lines(&bulk),
            vec!["Skipped (no valid phone): C-003, C-004".to_string()]
        );
    }
}
