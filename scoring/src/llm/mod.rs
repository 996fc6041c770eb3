pub mod anthropic;
pub mod prompt;

pub use anthropic::AnthropicClient;
pub use prompt::build_prompt;

use async_trait::async_trait;

use crate::error::LlmError;

/// A text-completion provider. Only the raw text of the answer is returned;
/// interpreting it is the normalizer's job.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}
