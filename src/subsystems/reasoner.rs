use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Reply from the reasoning service. The response text is optional; the
/// pipeline substitutes a placeholder when it is missing.
#[derive(Debug, Clone, Deserialize)]
pub struct ThinkResult {
    pub response: Option<String>,
}

/// The language-understanding collaborator. May be absent, slow, or failing;
/// every caller must tolerate all three.
#[async_trait]
pub trait Reasoner: Send + Sync {
    async fn think(&self, text: &str) -> Result<ThinkResult>;
}

#[derive(Serialize)]
struct ThinkRequest<'a> {
    message: &'a str,
}

/// HTTP adapter for a local reasoning server.
pub struct HttpReasoner {
    client: Client,
    base_url: String,
}

impl HttpReasoner {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            base_url,
        }
    }
}

#[async_trait]
impl Reasoner for HttpReasoner {
    async fn think(&self, text: &str) -> Result<ThinkResult> {
        let response = self
            .client
            .post(format!("{}/think", self.base_url))
            .json(&ThinkRequest { message: text })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("reasoner server error: {}", response.status()));
        }

        Ok(response.json().await?)
    }
}
