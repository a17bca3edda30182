//! Autocomplete handlers for Discord slash command parameters.
//!
//! This module provides autocomplete functionality for the area and due-amount
//! filters and for customer ids, suggesting values from the loaded dataset.
//! Users without a session get no suggestions.

use crate::{
    bot::{Context, session_key},
    core::{dashboard::Dataset, ledger::CustomerRow, view},
};
use std::sync::Arc;

/// Discord autocomplete limit.
const MAX_SUGGESTIONS: usize = 25;

/// Dataset visible to the caller, or nothing when logged out or before a load.
async fn visible_dataset(ctx: Context<'_>) -> Option<Arc<Dataset>> {
    let data = ctx.data();
    if !data.sessions.is_logged_in(&session_key(ctx)).await {
        return None;
    }
    data.dashboard.snapshot().await
}

/// Suggests area labels containing the partial input.
pub async fn autocomplete_area(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let Some(dataset) = visible_dataset(ctx).await else {
        return Vec::new();
    };
    match_options(view::distinct_areas(&dataset.rows), partial)
}

/// Suggests due amounts containing the partial input.
pub async fn autocomplete_due(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let Some(dataset) = visible_dataset(ctx).await else {
        return Vec::new();
    };
    let dues = view::distinct_dues(&dataset.rows)
        .into_iter()
        .map(|due| due.to_string())
        .collect();
    match_options(dues, partial)
}

/// Suggests customer ids whose id or name contains the partial input.
pub async fn autocomplete_customer(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let Some(dataset) = visible_dataset(ctx).await else {
        return Vec::new();
    };
    match_customers(&dataset.rows, partial)
}

/// Case-insensitive substring match over options, capped at the Discord limit.
#[must_use]
pub fn match_options(options: Vec<String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.trim().to_lowercase();
    options
        .into_iter()
        .filter(|option| !option.is_empty() && option.to_lowercase().contains(&partial_lower))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Customer ids whose id or name matches, in table order.
#[must_use]
pub fn match_customers(rows: &[CustomerRow], partial: &str) -> Vec<String> {
    let partial_lower = partial.trim().to_lowercase();
    rows.iter()
        .filter(|row| {
            row.customer_id.to_lowercase().contains(&partial_lower)
                || row.name.to_lowercase().contains(&partial_lower)
        })
        .map(|row| row.customer_id.clone())
        .take(MAX_SUGGESTIONS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_match_options_case_insensitive() {
        let options = vec!["Mirpur".to_string(), "Uttara".to_string(), String::new()];
        assert_eq!(match_options(options.clone(), "mir"), vec!["Mirpur"]);
        assert_eq!(match_options(options, ""), vec!["Mirpur", "Uttara"]);
    }

    #[test]
    fn test_match_options_capped() {
        let options: Vec<String> = (0..40).map(|i| format!("area-{i}")).collect();
        assert_eq!(match_options(options, "area").len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_match_customers_by_id_or_name() {
        let rows = sample_rows();
        assert_eq!(match_customers(&rows, "KARIM"), vec!["C-002"]);
        assert_eq!(match_customers(&rows, "c-00").len(), 4);
        assert!(match_customers(&rows, "zzz").is_empty());
    }
}
