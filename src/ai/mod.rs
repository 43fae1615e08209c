mod classifier;
mod client;
mod inference;
mod retry;

pub use classifier::LlmClassifier;
pub use client::{ChatBackend, ChatCompletionClient, LlmError};
pub use inference::{build_prompt, parse_reply};
pub use retry::{exponential_backoff, retry_or_degrade, RetryPolicy};
