use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// External knowledge lookup. The core constructs and holds this role; the
/// reasoning service is the consumer.
#[async_trait]
pub trait KnowledgeLookup: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<String>;
}

#[derive(Serialize)]
struct LookupRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct LookupResponse {
    answer: String,
}

/// Keyed HTTP adapter for the knowledge service.
pub struct HttpKnowledgeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpKnowledgeClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Result<Self> {
        let api_key = api_key.ok_or_else(|| anyhow!("knowledge API key not configured"))?;
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(20))
                .build()
                .unwrap_or_default(),
            base_url,
            api_key,
        })
    }
}

#[async_trait]
impl KnowledgeLookup for HttpKnowledgeClient {
    async fn lookup(&self, query: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&LookupRequest { query })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("knowledge server error: {}", response.status()));
        }

        let body: LookupResponse = response.json().await?;
        Ok(body.answer)
    }
}
