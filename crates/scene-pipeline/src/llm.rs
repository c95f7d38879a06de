//! Optional LLM interpretation of a finished run.
//!
//! A single blocking chat-completion call over the run summary. The call is
//! strictly best-effort: no retries, and any failure is logged and swallowed
//! so the pipeline result never depends on the remote service.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::report::format_summary_table;
use crate::summary::RunSummary;

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the summary call.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl LlmConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Resolve the API key: explicit flag first, then `OPENAI_API_KEY`, then
/// `LST_TOOL_OPENAI_KEY`.
pub fn api_key_from_env(flag: Option<&str>) -> Option<String> {
    if let Some(key) = flag {
        if !key.is_empty() {
            return Some(key.to_string());
        }
    }
    std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .or_else(|| {
            std::env::var("LST_TOOL_OPENAI_KEY")
                .ok()
                .filter(|k| !k.is_empty())
        })
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

/// Ask the model for a short interpretation of the run. Returns `None` on
/// any failure.
pub fn summarize(config: &LlmConfig, summary: &RunSummary) -> Option<String> {
    let prompt = build_prompt(summary);
    debug!(model = %config.model, "Requesting LLM run interpretation");

    let client = match reqwest::blocking::Client::builder()
        .timeout(config.timeout)
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to build HTTP client, skipping LLM summary");
            return None;
        }
    };

    let body = json!({
        "model": config.model,
        "messages": [
            {
                "role": "system",
                "content": "You are a remote sensing analyst. Interpret land \
                            surface temperature batch results briefly and \
                            factually for a field report."
            },
            { "role": "user", "content": prompt }
        ],
        "max_tokens": 400,
        "temperature": 0.2
    });

    let response = match client
        .post(&config.endpoint)
        .bearer_auth(&config.api_key)
        .json(&body)
        .send()
    {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "LLM request failed, report will omit interpretation");
            return None;
        }
    };

    if !response.status().is_success() {
        warn!(
            status = %response.status(),
            "LLM request rejected, report will omit interpretation"
        );
        return None;
    }

    match response.json::<ChatResponse>() {
        Ok(parsed) => parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .filter(|s| !s.is_empty()),
        Err(e) => {
            warn!(error = %e, "Unreadable LLM response, report will omit interpretation");
            None
        }
    }
}

fn build_prompt(summary: &RunSummary) -> String {
    let mut prompt = String::from(
        "Summarize this Landsat land surface temperature run in 3-5 \
         sentences. Mention the temperature range, anything unusual, and \
         which scenes failed and why.\n\n",
    );
    prompt.push_str(&format_summary_table(summary));
    if let Some(stats) = summary.aggregate_lst_stats() {
        prompt.push_str(&format!(
            "\nAggregate LST degC: min {:.2} max {:.2} mean {:.2} std {:.2}\n",
            stats.min, stats.max, stats.mean, stats.std
        ));
    }
    prompt
}
