use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::config::InferenceConfig;
use crate::inference::client::{
    DecisionPrompt, DecisionReply, DialoguePrompt, DialogueReply, InferenceClient, InferenceError,
};

/// JSON-over-HTTP inference client. Both request kinds are POSTed to the same
/// endpoint and told apart by their `responseType` field.
#[derive(Clone)]
pub struct HttpInferenceClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpInferenceClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, InferenceError> {
        Self::with_request_timeout(endpoint, Duration::from_secs(30))
    }

    pub fn with_request_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| InferenceError::NotConfigured(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: None,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn from_config(config: &InferenceConfig) -> Result<Self, InferenceError> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| InferenceError::NotConfigured("inference.endpoint is not set".to_string()))?;

        let client = Self::with_request_timeout(endpoint, config.timeout())?;

        match config.api_key_env.as_deref() {
            Some(var) => {
                let api_key = std::env::var(var)
                    .map_err(|_| InferenceError::NotConfigured(format!("Environment variable {} is not set", var)))?;
                Ok(client.with_api_key(api_key))
            }
            None => Ok(client),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_headers(&self) -> Result<HeaderMap, InferenceError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(api_key) = &self.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| InferenceError::NotConfigured(format!("Invalid API key: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    async fn post_json<Req, Resp>(&self, body: &Req) -> Result<Resp, InferenceError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.build_headers()?)
            .json(body)
            .send()
            .await
            .map_err(|e| InferenceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(InferenceError::Api { status, message });
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| InferenceError::Parse(e.to_string()))
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn decide(&self, prompt: &DecisionPrompt) -> Result<DecisionReply, InferenceError> {
        self.post_json(prompt).await
    }

    async fn speak(&self, prompt: &DialoguePrompt) -> Result<DialogueReply, InferenceError> {
        let reply: DialogueReply = self.post_json(prompt).await?;
        if reply.generated_text.trim().is_empty() {
            return Err(InferenceError::Malformed("generated_text is empty".to_string()));
        }
        Ok(reply)
    }
}
