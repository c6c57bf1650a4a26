//! Multi-provider completion client.
//!
//! OpenAI, xAI, Anthropic and Google all expose an OpenAI-compatible
//! `POST {base}/chat/completions`, so one request shape serves every model in the catalog;
//! only the base URL and bearer key change per provider.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use super::{ChatCompletionRequest, ChatCompletionResponse, CompletionService};
use crate::config::{CompletionConfig, ProvidersConfig};
use crate::error::{ensure_success, Service, ServiceError};
use crate::message::Message;
use crate::models::ModelId;

/// [`CompletionService`] that routes each model to its provider's endpoint.
#[derive(Clone)]
pub struct ProviderRouter {
    client: Client,
    providers: ProvidersConfig,
}

impl ProviderRouter {
    pub fn new(completion: &CompletionConfig, providers: &ProvidersConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(completion.timeout_secs))
            .build()
            .context("failed to build completion HTTP client")?;
        Ok(Self {
            client,
            providers: providers.clone(),
        })
    }

    fn endpoint(base_url: &str) -> String {
        format!("{}/chat/completions", base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionService for ProviderRouter {
    async fn complete(
        &self,
        model: ModelId,
        messages: &[Message],
        temperature: f32,
    ) -> Result<String, ServiceError> {
        let provider = model.provider();
        let settings = self.providers.get(provider);
        let api_key = settings
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ServiceError::MissingCredentials {
                provider: provider.to_string(),
            })?;

        tracing::debug!(
            model = %model,
            provider = %provider,
            messages = messages.len(),
            temperature,
            "completion request"
        );

        let body = ChatCompletionRequest {
            model: model.as_str(),
            messages,
            temperature,
        };

        let response = self
            .client
            .post(Self::endpoint(self.providers.base_url(provider)))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::from_transport(Service::Completion, e))?;
        let response = ensure_success(Service::Completion, response).await?;

        let parsed: ChatCompletionResponse =
            response
                .json()
                .await
                .map_err(|e| ServiceError::Malformed {
                    service: Service::Completion,
                    message: format!("failed to parse completion response: {e}"),
                })?;

        parsed.into_text().ok_or_else(|| ServiceError::Malformed {
            service: Service::Completion,
            message: format!("{provider} returned no content"),
        })
    }
}
