use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use crate::content::{FormInput, GeneratedContent, Platform, Tone};

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    tone: Tone,
    platform: Platform,
}

/// HTTP client for the content generation service.
#[derive(Clone)]
pub struct GeneratorClient {
    client: Client,
    base_url: String,
}

impl GeneratorClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one `POST /generate` and parse the content bundle.
    ///
    /// Transport errors, non-2xx responses and malformed bodies all come
    /// back as `Err`; callers don't distinguish between them.
    #[tracing::instrument(skip_all, fields(tone = %input.tone, platform = %input.platform))]
    pub async fn generate(&self, input: &FormInput) -> Result<GeneratedContent> {
        let url = format!("{}/generate", self.base_url);

        let request = GenerateRequest {
            prompt: &input.prompt,
            tone: input.tone,
            platform: input.platform,
        };

        debug!(%url, "sending generation request");
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Could not reach generation service at {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Generation service error {}: {}", status, text));
        }

        let content: GeneratedContent = response
            .json()
            .await
            .context("Generation service returned a malformed body")?;

        info!(
            text_len = content.text.len(),
            sources = content.sources.len(),
            "received generated content"
        );
        Ok(content)
    }
}
