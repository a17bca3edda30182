//! Table Discord commands - load, summary, paging, filters, search and details.
//!
//! Every view is recomputed from the loaded dataset and the caller's session
//! filter; changing the filter or search resets the page to the first one.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, handlers::autocomplete, render, require_session, session_key},
        core::{
            ledger::PaymentStatus,
            view::{self, ViewFilter},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Status choice offered in the filter dropdowns.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum StatusChoice {
        #[name = "Payment"]
        Payment,
        #[name = "No Payment"]
        NoPayment,
    }

    impl From<StatusChoice> for PaymentStatus {
        fn from(choice: StatusChoice) -> Self {
            match choice {
                StatusChoice::Payment => Self::Payment,
                StatusChoice::NoPayment => Self::NoPayment,
            }
        }
    }

    /// Sends the caller's current page of the filtered table.
    async fn send_table(ctx: Context<'_>) -> Result<()> {
        let data = ctx.data();
        let session = require_session(ctx).await?;
        let dataset = data.dashboard.require().await?;

        let filtered = session.filter.apply(&dataset.rows);
        let page = view::paginate(&filtered, session.page, data.config.view.page_size);

        if page.total == 0 {
            ctx.say(format!(
                "No customers match: {}",
                render::filter_text(&session.filter, &dataset.periods)
            ))
            .await?;
            return Ok(());
        }

        for message in render::table_messages(&page, &dataset.periods) {
            ctx.say(message).await?;
        }
        Ok(())
    }

    /// Re-fetches all three sheets and rebuilds the table.
    #[poise::command(slash_command)]
    pub async fn load(ctx: Context<'_>) -> Result<()> {
        require_session(ctx).await?;
        ctx.defer().await?;

        let data = ctx.data();
        let dataset = data.dashboard.load(&data.source, &data.config).await?;
        ctx.say(format!(
            "🔄 Loaded {} customers at {}.",
            dataset.rows.len(),
            dataset.loaded_at.format("%Y-%m-%d %H:%M UTC")
        ))
        .await?;
        Ok(())
    }

    /// Shows the no-payment counts per month.
    #[poise::command(slash_command)]
    pub async fn summary(ctx: Context<'_>) -> Result<()> {
        let session = require_session(ctx).await?;
        let data = ctx.data();
        let dataset = data.dashboard.require().await?;

        let currency = &data.config.billing.currency;
        let mut description =
            render::summary_text(&dataset.summary(), &dataset.periods, currency)?;

        if !session.filter.is_empty() {
            let filtered = view::summarize(session.filter.apply(&dataset.rows));
            write!(
                description,
                "\n\n**Filtered** ({})\n{}",
                render::filter_text(&session.filter, &dataset.periods),
                render::summary_text(&filtered, &dataset.periods, currency)?
            )?;
        }

        let embed = serenity::CreateEmbed::new()
            .title("No Payment Summary")
            .description(description)
            .colour(render::theme_colour(session.theme))
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Loaded {}",
                dataset.loaded_at.format("%Y-%m-%d %H:%M UTC")
            )));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows the current page of the filtered table.
    #[poise::command(slash_command)]
    pub async fn table(ctx: Context<'_>) -> Result<()> {
        send_table(ctx).await
    }

    /// Jumps to a page of the filtered table.
    #[poise::command(slash_command)]
    pub async fn page(
        ctx: Context<'_>,
        #[description = "Page number (starting at 1)"]
        #[min = 1]
        number: u32,
    ) -> Result<()> {
        let index = usize::try_from(number.saturating_sub(1)).unwrap_or(0);
        ctx.data()
            .sessions
            .update(&session_key(ctx), |s| s.page = index)
            .await?;
        send_table(ctx).await
    }

    /// Sets the table filters. Omitted options mean "All".
    #[poise::command(slash_command)]
    pub async fn filter(
        ctx: Context<'_>,
        #[description = "Current month status"] current: Option<StatusChoice>,
        #[description = "Previous month status"] previous: Option<StatusChoice>,
        #[description = "Earlier month status"] earlier: Option<StatusChoice>,
        #[description = "Area"]
        #[autocomplete = "autocomplete::autocomplete_area"]
        area: Option<String>,
        #[description = "Total due amount"]
        #[autocomplete = "autocomplete::autocomplete_due"]
        due: Option<String>,
    ) -> Result<()> {
        let due = match due.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let digits = raw.trim_end_matches(|c: char| !c.is_ascii_digit());
                Some(digits.parse::<i64>().map_err(|_| Error::InvalidInput {
                    message: format!("'{raw}' is not a due amount"),
                })?)
            }
        };

        let statuses = [current, previous, earlier].map(|s| s.map(PaymentStatus::from));
        let area = area.filter(|a| !a.trim().is_empty());

        ctx.data()
            .sessions
            .update(&session_key(ctx), |s| {
                s.filter = ViewFilter {
                    statuses,
                    area,
                    due,
                    search: std::mem::take(&mut s.filter.search),
                };
                s.page = 0;
            })
            .await?;
        send_table(ctx).await
    }

    /// Searches id, name, phone and area. Leave empty to clear.
    #[poise::command(slash_command)]
    pub async fn search(
        ctx: Context<'_>,
        #[description = "Text to search for"] text: Option<String>,
    ) -> Result<()> {
        ctx.data()
            .sessions
            .update(&session_key(ctx), |s| {
                s.filter.search = text.unwrap_or_default().trim().to_string();
                s.page = 0;
            })
            .await?;
        send_table(ctx).await
    }

    /// Shows the details of one customer.
    #[poise::command(slash_command)]
    pub async fn details(
        ctx: Context<'_>,
        #[description = "Customer ID"]
        #[autocomplete = "autocomplete::autocomplete_customer"]
        customer: String,
    ) -> Result<()> {
        let session = require_session(ctx).await?;
        let dataset = ctx.data().dashboard.require().await?;

        let row = view::find_row(&dataset.rows, &customer).ok_or_else(|| {
            Error::CustomerNotFound {
                customer_id: customer.clone(),
            }
        })?;

        let embed = render::detail_embed(
            row,
            &dataset.periods,
            &ctx.data().config.reminder,
            session.theme,
        );
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
