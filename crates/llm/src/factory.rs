//! LLM provider factory.
//!
//! This module provides a factory for creating generation clients based on
//! application configuration.

use crate::client::LlmClient;
use crate::providers::OllamaClient;
use std::sync::Arc;

/// Create a generation client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama", "openai", "claude")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key (for providers that require it)
///
/// # Errors
/// Returns an error if the provider is unknown or required secrets are
/// missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> Result<Arc<dyn LlmClient>, String> {
    match provider.to_lowercase().as_str() {
        "ollama" => {
            let base_url = endpoint.unwrap_or("http://localhost:11434");
            let client = OllamaClient::with_base_url(base_url);
            Ok(Arc::new(client))
        }
        "openai" => {
            if api_key.is_none() {
                return Err("OpenAI provider requires API key".to_string());
            }
            Err("OpenAI provider not yet implemented".to_string())
        }
        "claude" | "anthropic" => {
            if api_key.is_none() {
                return Err("Claude provider requires API key".to_string());
            }
            Err("Claude provider not yet implemented".to_string())
        }
        _ => Err(format!("Unknown provider: {}", provider)),
    }
}
