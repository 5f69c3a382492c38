//! Deterministic offline gateway
//!
//! Answers every request from its own text, without network access, so the
//! whole pipeline can run in demos and CI. The same request always yields the
//! same reply. It never asks for tools.

use async_trait::async_trait;
use parliament_application::{CompletionRequest, LlmGateway, ProviderError};
use parliament_domain::{LlmResponse, Role};

const PREVIEW_CHARS: usize = 120;

/// [`LlmGateway`] that fabricates short replies locally
#[derive(Debug, Clone, Default)]
pub struct OfflineGateway;

impl OfflineGateway {
    pub fn new() -> Self {
        Self
    }

    fn reply(request: &CompletionRequest) -> String {
        let speaker = request
            .messages
            .iter()
            .find(|m| m.role == Role::System)
            .and_then(|m| speaker_from_prompt(&m.content))
            .unwrap_or("moderator");

        let prompt = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| preview(&m.content))
            .unwrap_or_default();

        format!(
            "[offline {speaker}] This is a placeholder contribution generated without a language model. \
             It responds to: \"{prompt}\""
        )
    }
}

/// "You are a highly-trained economist, specializing in ..." -> "economist"
fn speaker_from_prompt(system_prompt: &str) -> Option<&str> {
    let rest = system_prompt
        .strip_prefix("You are a highly-trained ")
        .or_else(|| system_prompt.strip_prefix("You are "))?;
    let end = rest.find([',', '.', '\n']).unwrap_or(rest.len());
    let speaker = rest[..end].trim();
    (!speaker.is_empty()).then_some(speaker)
}

fn preview(text: &str) -> String {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    match line.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &line[..idx]),
        None => line.to_string(),
    }
}

#[async_trait]
impl LlmGateway for OfflineGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<LlmResponse, ProviderError> {
        Ok(LlmResponse::from_text(Self::reply(request)))
    }

    fn name(&self) -> &str {
        "offline"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parliament_domain::{Message, ToolDefinition};

    fn request(system: Option<&str>, user: &str) -> CompletionRequest {
        let mut messages = Vec::new();
        if let Some(system) = system {
            messages.push(Message::system(system));
        }
        messages.push(Message::user(user));
        CompletionRequest::new(messages)
    }

    #[tokio::test]
    async fn test_reply_names_speaker_and_prompt() {
        let gateway = OfflineGateway::new();
        let response = gateway
            .complete(&request(
                Some("You are a highly-trained economist, specializing in trade."),
                "\nShould we tax carbon?\nMore context",
            ))
            .await
            .unwrap();

        let text = response.text_content();
        assert!(text.starts_with("[offline economist]"));
        assert!(text.contains("\"Should we tax carbon?\""));
    }

    #[tokio::test]
    async fn test_moderator_without_system_prompt() {
        let response = OfflineGateway
            .complete(&request(None, "Summarize."))
            .await
            .unwrap();
        assert!(response.text_content().starts_with("[offline moderator]"));
    }

    #[tokio::test]
    async fn test_deterministic_and_tool_free() {
        let req = request(Some("You are The Skeptic."), "Topic")
            .with_tools(vec![ToolDefinition::web_search()]);
        let a = OfflineGateway.complete(&req).await.unwrap();
        let b = OfflineGateway.complete(&req).await.unwrap();
        assert_eq!(a.text_content(), b.text_content());
        assert!(a.tool_calls().is_empty());
        assert!(a.text_content().starts_with("[offline The Skeptic]"));
    }

    #[test]
    fn test_preview_truncates_long_lines() {
        let long = "word ".repeat(100);
        let p = preview(&long);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
    }
}
