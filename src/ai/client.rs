use futures::future::BoxFuture;
use reqwest::Client;
use thiserror::Error;
use url::Url;

use super::inference::{build_request, parse_response};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("chat completion request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("chat completion returned no choices")]
    NoChoices,
    #[error("chat completion returned an empty message")]
    EmptyContent,
    #[error("{0}")]
    Backend(String),
}

/// One prompt in, the model's raw reply text out.
pub trait ChatBackend: Send + Sync {
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, LlmError>>;
}

/// OpenAI-compatible `chat/completions` endpoint (DeepSeek, Zhipu).
#[derive(Clone)]
pub struct ChatCompletionClient {
    http: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl ChatCompletionClient {
    pub fn new(
        http: Client,
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, url::ParseError> {
        let base = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{base_url}/"))?
        };
        Ok(Self {
            http,
            endpoint: base.join("chat/completions")?,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = build_request(self.model.clone(), prompt);
        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        parse_response(response).await
    }
}

impl ChatBackend for ChatCompletionClient {
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, LlmError>> {
        Box::pin(ChatCompletionClient::complete(self, prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_chat_completions_to_base_path() {
        let client =
            ChatCompletionClient::new(Client::new(), "https://api.deepseek.com/v1", "k", "m")
                .unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://api.deepseek.com/v1/chat/completions"
        );

        let client = ChatCompletionClient::new(
            Client::new(),
            "https://open.bigmodel.cn/api/paas/v4/",
            "k",
            "m",
        )
        .unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://open.bigmodel.cn/api/paas/v4/chat/completions"
        );
    }

    #[test]
    fn malformed_base_url_is_rejected() {
        assert!(ChatCompletionClient::new(Client::new(), "not a url", "k", "m").is_err());
    }
}
