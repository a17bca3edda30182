//! Optional reminder wording via a generative-text endpoint.
//!
//! The endpoint takes a generate-content request and answers with
//! `candidates[0].content.parts[0].text`. Calls are retried with exponential
//! backoff; when generation is disabled or fails, the configured template is used.

use crate::{
    config::{ComposeConfig, ReminderConfig},
    core::{
        ledger::{CustomerRow, PERIOD_COUNT},
        reminder,
    },
    errors::{Error, Result},
};
use backon::{ExponentialBuilder, Retryable};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Maximum number of retries after the first attempt.
pub const MAX_RETRIES: usize = 3;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Extracts the generated text from a response body.
fn extract_text(response: GenerateResponse) -> Result<String> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .map(|part| part.text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| Error::Generation {
            message: "response contained no text".to_string(),
        })
}

/// Builds the structured prompt for one customer.
#[must_use]
pub fn build_prompt(row: &CustomerRow, periods: &[String; PERIOD_COUNT]) -> String {
    let months = row.unpaid_periods(periods).join(", ");
    format!(
        "Write a short, polite payment reminder for an internet service customer.\n\
         Customer name: {}\n\
         Customer ID: {}\n\
         Area: {}\n\
         Unpaid months: {}\n\
         Amount due: {}\n\
         Keep it under 60 words, friendly but clear, and reply with the message text only.",
        row.name,
        row.customer_id,
        row.area,
        if months.is_empty() { "none" } else { months.as_str() },
        row.due_display,
    )
}

/// Retry schedule for generation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the first retry
    pub min_delay: Duration,
    /// Upper bound on any single delay
    pub max_delay: Duration,
    /// Number of retries after the first attempt
    pub max_retries: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
            max_retries: MAX_RETRIES,
        }
    }
}

impl RetryPolicy {
    /// Backoff configuration for retries.
    fn backoff(self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries)
    }
}

/// Client for the generative-text endpoint.
#[derive(Debug, Clone)]
pub struct TextGenerator {
    client: Client,
    endpoint: String,
    api_key: String,
    retry: RetryPolicy,
}

impl TextGenerator {
    /// Creates a generator for an endpoint and API key.
    pub fn new(endpoint: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            retry: RetryPolicy::default(),
        })
    }

    /// Creates a generator from configuration, or `None` when generation is not enabled.
    ///
    /// Requires `compose.endpoint` and the API key environment variable.
    pub fn from_config(config: &ComposeConfig) -> Result<Option<Self>> {
        let Some(endpoint) = config.endpoint.as_deref().filter(|e| !e.trim().is_empty()) else {
            return Ok(None);
        };
        let Ok(api_key) = std::env::var(&config.api_key_env) else {
            warn!(
                env = %config.api_key_env,
                "Compose endpoint configured but API key is missing; using template messages"
            );
            return Ok(None);
        };
        Self::new(endpoint, &api_key, Duration::from_secs(config.timeout_secs)).map(Some)
    }

    /// Overrides the retry schedule.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sends one generation request.
    async fn request(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Generation {
                message: format!(
                    "HTTP {status} - {}",
                    text.chars().take(200).collect::<String>()
                ),
            });
        }

        extract_text(response.json::<GenerateResponse>().await?)
    }

    /// Generates text for a prompt, retrying with exponential backoff.
    ///
    /// # Errors
    /// Returns `Error::Generation` once all retries are exhausted.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        (|| async { self.request(prompt).await })
            .retry(self.retry.backoff())
            .notify(|err: &Error, dur: Duration| {
                warn!(error = %err, delay = ?dur, "Message generation failed, retrying");
            })
            .await
            .map_err(|e| match e {
                Error::Generation { .. } => e,
                other => Error::Generation {
                    message: other.to_string(),
                },
            })
    }
}

/// Words a reminder for one row, using the generator when available.
///
/// Falls back to the configured template when no generator is given or
/// generation fails.
pub async fn compose_message(
    generator: Option<&TextGenerator>,
    row: &CustomerRow,
    periods: &[String; PERIOD_COUNT],
    config: &ReminderConfig,
) -> String {
    if let Some(generator) = generator {
        match generator.generate(&build_prompt(row, periods)).await {
            Ok(text) => {
                debug!(customer_id = %row.customer_id, "Generated reminder text");
                return text;
            }
            Err(e) => {
                warn!(customer_id = %row.customer_id, error = %e, "Falling back to template message");
            }
        }
    }
    reminder::render_message(&config.template, row, periods)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_extract_text_nested_shape() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"  Hello rahim, please pay.  "}],"role":"model"}}]}"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(extract_text(response).unwrap(), "Hello rahim, please pay.");
    }

    #[test]
    fn test_extract_text_missing_candidates() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            extract_text(response),
            Err(Error::Generation { message: _ })
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hi" }],
            }],
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"contents":[{"parts":[{"text":"hi"}]}]}"#
        );
    }

    #[test]
    fn test_build_prompt_mentions_row() {
        let rows = sample_rows();
        let prompt = build_prompt(&rows[0], &sample_periods());
        assert!(prompt.contains("rahim"));
        assert!(prompt.contains("C-001"));
        assert!(prompt.contains("July, June, May"));
        assert!(prompt.contains("1300 TK"));
    }

    #[test]
    fn test_from_config_disabled_without_endpoint() {
        let generator = TextGenerator::from_config(&ComposeConfig::default()).unwrap();
        assert!(generator.is_none());
    }

    #[tokio::test]
    async fn test_compose_message_without_generator_uses_template() {
        let rows = sample_rows();
        let config = ReminderConfig {
            template: "{name} owes {due}".to_string(),
            ..Default::default()
        };
        let message = compose_message(None, &rows[0], &sample_periods(), &config).await;
        assert_eq!(message, "rahim owes 1300 TK");
    }

    #[tokio::test]
    async fn test_compose_message_falls_back_when_endpoint_unreachable() {
        let rows = sample_rows();
        let generator = TextGenerator::new(
            "http://127.0.0.1:9/generate",
            "test-key",
            Duration::from_millis(200),
        )
        .unwrap()
        .with_retry(RetryPolicy {
            min_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            max_retries: 1,
        });
        let config = ReminderConfig {
            template: "{customer_id}: {due}".to_string(),
            ..Default::default()
        };
        let message = compose_message(Some(&generator), &rows[0], &sample_periods(), &config).await;
        assert_eq!(message, "C-001: 1300 TK");
    }
}
