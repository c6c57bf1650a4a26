//! HTTP client for the hosted memory REST API.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};

use super::types::{AddRequest, MemoryListing, MemoryRecord, RecordsResponse, SearchRequest};
use super::MemoryStore;
use crate::config::MemoryConfig;
use crate::error::{ensure_success, Service, ServiceError};
use crate::message::Message;

/// [`MemoryStore`] backed by the hosted memory platform.
#[derive(Clone)]
pub struct HostedMemoryClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    page_size: usize,
}

impl HostedMemoryClient {
    pub fn new(config: &MemoryConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("invalid memory base_url: {}", config.base_url))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build memory HTTP client")?;

        if config.api_key.is_none() {
            tracing::warn!(base_url = %base_url, "no memory API key configured (set MEM0_API_KEY)");
        }

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            page_size: config.page_size.max(1),
        })
    }

    /// `base_url` with `path` appended to whatever path the base already carries.
    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!("{}{}", self.base_url.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        url
    }

    fn auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Token {key}")),
            None => request,
        }
    }

    async fn send_for_records(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<RecordsResponse, ServiceError> {
        let response = self
            .auth(request)
            .send()
            .await
            .map_err(|e| ServiceError::from_transport(Service::Memory, e))?;
        let response = ensure_success(Service::Memory, response).await?;
        response
            .json::<RecordsResponse>()
            .await
            .map_err(|e| ServiceError::Malformed {
                service: Service::Memory,
                message: format!("failed to parse memory records: {e}"),
            })
    }
}

#[async_trait]
impl MemoryStore for HostedMemoryClient {
    async fn search(
        &self,
        query: &str,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>, ServiceError> {
        tracing::debug!(user_id, limit, "memory search");
        let body = SearchRequest {
            query,
            user_id,
            limit,
        };
        let request = self
            .client
            .post(self.endpoint("/v1/memories/search/"))
            .json(&body);
        let (mut records, _) = self.send_for_records(request).await?.into_parts();
        records.truncate(limit);
        Ok(records)
    }

    async fn list_all(&self, user_id: &str, cap: usize) -> Result<MemoryListing, ServiceError> {
        let page_size = self.page_size.min(cap.max(1));
        let mut records = Vec::new();
        let mut truncated = false;
        let mut page = 1usize;

        loop {
            let mut url = self.endpoint("/v1/memories/");
            url.query_pairs_mut()
                .append_pair("user_id", user_id)
                .append_pair("page", &page.to_string())
                .append_pair("page_size", &page_size.to_string());

            let (batch, more) = self
                .send_for_records(self.client.get(url))
                .await?
                .into_parts();
            let batch_len = batch.len();
            records.extend(batch);

            if records.len() > cap {
                records.truncate(cap);
                truncated = true;
                break;
            }
            if !more || batch_len == 0 {
                break;
            }
            if records.len() == cap {
                truncated = true;
                break;
            }
            page += 1;
        }

        tracing::debug!(user_id, count = records.len(), truncated, pages = page, "memory bulk read");
        Ok(MemoryListing { records, truncated })
    }

    async fn add(&self, messages: &[Message], user_id: &str) -> Result<(), ServiceError> {
        tracing::debug!(user_id, count = messages.len(), "memory add");
        let body = AddRequest { messages, user_id };
        let response = self
            .auth(self.client.post(self.endpoint("/v1/memories/")).json(&body))
            .send()
            .await
            .map_err(|e| ServiceError::from_transport(Service::Memory, e))?;
        ensure_success(Service::Memory, response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> HostedMemoryClient {
        HostedMemoryClient::new(&MemoryConfig {
            base_url: base_url.into(),
            ..MemoryConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let c = client("http://localhost:8000/mem0/");
        assert_eq!(
            c.endpoint("/v1/memories/").as_str(),
            "http://localhost:8000/mem0/v1/memories/"
        );
        let c = client("https://api.mem0.ai");
        assert_eq!(
            c.endpoint("/v1/memories/search/").as_str(),
            "https://api.mem0.ai/v1/memories/search/"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = HostedMemoryClient::new(&MemoryConfig {
            base_url: "not a url".into(),
            ..MemoryConfig::default()
        });
        assert!(result.is_err());
    }
}
