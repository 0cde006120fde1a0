use async_trait::async_trait;
use chatgpt::prelude::*;
use chatgpt::types::CompletionResponse;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("no API key configured, set CHATGPT_API_KEY")]
    MissingCredentials,
    #[error("{0}")]
    Backend(#[from] chatgpt::err::Error),
    #[error("the model returned an empty answer")]
    EmptyResponse,
}

/// Anything that turns a prompt into generated text.
///
/// Implementations own retry and rate-limit policy; callers make exactly one
/// call per user request.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError>;
}

pub struct ChatGptGateway {
    chat_gpt: Option<ChatGPT>,
}

impl ChatGptGateway {
    pub fn new(chat_gpt: ChatGPT) -> Self {
        Self {
            chat_gpt: Some(chat_gpt),
        }
    }

    /// Gateway used when no key is configured. Every call fails, but the bot stays up.
    pub fn without_credentials() -> Self {
        Self { chat_gpt: None }
    }
}

#[async_trait]
impl Generator for ChatGptGateway {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError> {
        let chat_gpt = self
            .chat_gpt
            .as_ref()
            .ok_or(GenerationError::MissingCredentials)?;

        log::debug!("Sending prompt: {:?}", prompt);
        let response: CompletionResponse = chat_gpt.send_message(prompt).await?;
        let content = response.message().clone().content;
        log::debug!("Completion: {:?}", content);

        if content.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let gateway = ChatGptGateway::without_credentials();
        let err = gateway.generate("Explain rain. Be brief.").await.unwrap_err();
        assert!(matches!(err, GenerationError::MissingCredentials));
        assert!(err.to_string().contains("CHATGPT_API_KEY"));
    }
}
