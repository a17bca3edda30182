//! Reminder Discord commands - per-customer and bulk WhatsApp reminder links.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, handlers::autocomplete, render, require_session},
        core::{compose, phone, reminder, view},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use tracing::info;

    /// Generates a WhatsApp reminder link for one customer.
    #[poise::command(slash_command)]
    pub async fn remind(
        ctx: Context<'_>,
        #[description = "Customer ID"]
        #[autocomplete = "autocomplete::autocomplete_customer"]
        customer: String,
    ) -> Result<()> {
        let session = require_session(ctx).await?;
        let data = ctx.data();
        let dataset = data.dashboard.require().await?;
        let config = &data.config.reminder;

        let row = view::find_row(&dataset.rows, &customer).ok_or_else(|| {
            Error::CustomerNotFound {
                customer_id: customer.clone(),
            }
        })?;

        let Some(phone) = phone::normalize(&row.phone, &config.country_code, config.local_digits)
        else {
            ctx.say(format!(
                "📵 Cannot generate a link for **{}**: phone number `{}` is not valid.",
                row.customer_id,
                if row.phone.is_empty() { "-" } else { row.phone.as_str() }
            ))
            .await?;
            return Ok(());
        };

        if data.generator.is_some() {
            ctx.defer().await?;
        }
        let message =
            compose::compose_message(data.generator.as_ref(), row, &dataset.periods, config).await;
        let link = reminder::deep_link(&phone, &message);

        let embed = serenity::CreateEmbed::new()
            .title(format!("Reminder for {}", row.name))
            .url(link.as_str())
            .description(message)
            .field("Customer ID", row.customer_id.as_str(), true)
            .field("Total Due", row.due_display.as_str(), true)
            .colour(render::theme_colour(session.theme));
        let button = serenity::CreateButton::new_link(link).label("Open WhatsApp");

        ctx.send(
            poise::CreateReply::default()
                .embed(embed)
                .components(vec![serenity::CreateActionRow::Buttons(vec![button])]),
        )
        .await?;
        Ok(())
    }

    /// Generates reminder links for every customer on the current page of the filtered table.
    #[poise::command(slash_command)]
    pub async fn remind_all(ctx: Context<'_>) -> Result<()> {
        let session = require_session(ctx).await?;
        let data = ctx.data();
        let dataset = data.dashboard.require().await?;

        let filtered = session.filter.apply(&dataset.rows);
        let page = view::paginate(&filtered, session.page, data.config.view.page_size);
        if page.rows.is_empty() {
            ctx.say("No customers on this page.").await?;
            return Ok(());
        }

        let bulk = reminder::bulk_reminders(
            page.rows.iter().copied(),
            &dataset.periods,
            &data.config.reminder,
        );
        info!(
            generated = bulk.reminders.len(),
            skipped = bulk.skipped.len(),
            page = page.index + 1,
            "Bulk reminders requested"
        );

        ctx.say(format!(
            "📨 {} reminder links for {} ({} skipped)",
            bulk.reminders.len(),
            page.label(),
            bulk.skipped.len()
        ))
        .await?;
        for chunk in render::chunk_lines(render::bulk_lines(&bulk), render::MESSAGE_LIMIT) {
            ctx.say(chunk).await?;
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
