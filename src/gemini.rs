use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::GeminiConfig;

/// Reply sent when the Gemini call fails for any reason.
pub const FALLBACK_REPLY: &str = "Sorry, Gemini couldn't respond right now.";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// One generateContent call. No retries, default timeouts.
    pub async fn generate(&self, question: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: question.to_string(),
                }],
            }],
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );

        debug!("Sending request to Gemini model {}", self.config.model);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Gemini")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({}): {}", status, error_body);
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        generated
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .context("No candidates in Gemini response")
    }

    /// Like [`Self::generate`], but never fails outward: any error is logged
    /// and replaced by [`FALLBACK_REPLY`].
    pub async fn answer(&self, question: &str) -> String {
        match self.generate(question).await {
            Ok(text) => text,
            Err(e) => {
                error!("Gemini error: {:#}", e);
                FALLBACK_REPLY.to_string()
            }
        }
    }
}
