//! LLM integration crate.
//!
//! Provider-agnostic chat completion behind the [`LlmClient`] trait.
//!
//! # Providers
//! - **OpenAI-compatible**: hosted inference services exposing `/chat/completions`
//! - **Ollama**: local LLM runtime
//!
//! # Example
//! ```no_run
//! use yellow_llm::{ChatMessage, ChatRequest, LlmClient, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = ChatRequest::new("llama3.2", vec![ChatMessage::user("Hello, world!")])
//!     .with_max_tokens(64);
//! let response = client.chat(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{ChatMessage, ChatRequest, ChatResponse, LlmClient, LlmUsage};
pub use factory::create_client;
pub use providers::{OllamaClient, OpenAiClient};
pub use types::{ProviderType, Role};
