use async_trait::async_trait;

/// Text completion service behind the assistant chat account.
///
/// Implementations never fail outward: every internal error is mapped to a fixed
/// fallback reply. Calls are stateless; only the latest prompt and the persona
/// instruction are sent.
#[async_trait]
pub trait AssistantGateway: Send + Sync {
    async fn complete(&self, prompt: &str, persona_instruction: &str) -> String;
}
