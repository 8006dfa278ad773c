//! Generation provider factory.
//!
//! Resolves a provider name plus optional endpoint and secret into a
//! shareable client.

use crate::client::LlmClient;
use crate::providers::{GeminiClient, MockClient, OllamaClient};
use crate::types::ProviderType;
use std::sync::Arc;

/// Create a generation client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("gemini", "ollama", "mock")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key (for providers that require it)
///
/// # Errors
/// Returns a message if the provider is unknown or a required secret is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> Result<Arc<dyn LlmClient>, String> {
    let provider_type =
        ProviderType::parse(provider).ok_or_else(|| format!("Unknown provider: {}", provider))?;

    let api_key = api_key.filter(|key| !key.is_empty());
    if provider_type.requires_api_key() && api_key.is_none() {
        return Err(format!(
            "{} provider requires API key",
            provider_type.as_str()
        ));
    }

    match provider_type {
        ProviderType::Gemini => {
            let api_key = api_key.unwrap_or_default();
            let client = match endpoint {
                Some(base_url) => GeminiClient::with_base_url(base_url, api_key),
                None => GeminiClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        ProviderType::Ollama => {
            let base_url = endpoint.unwrap_or(crate::providers::ollama::DEFAULT_BASE_URL);
            Ok(Arc::new(OllamaClient::with_base_url(base_url)))
        }
        ProviderType::Mock => Ok(Arc::new(MockClient::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_gemini_client() {
        let client = create_client("gemini", None, Some("key")).unwrap();
        assert_eq!(client.provider_name(), "gemini");
    }

    #[test]
    fn test_gemini_requires_api_key() {
        match create_client("gemini", None, None) {
            Err(err) => assert!(err.contains("requires API key")),
            Ok(_) => panic!("Expected error for Gemini without API key"),
        }
        assert!(create_client("gemini", None, Some("")).is_err());
    }

    #[test]
    fn test_keyless_providers_ignore_missing_key() {
        for provider in ["ollama", "mock"] {
            assert!(!ProviderType::parse(provider).unwrap().requires_api_key());
            assert!(create_client(provider, None, None).is_ok());
        }
    }

    #[test]
    fn test_create_ollama_with_custom_endpoint() {
        let client = create_client("ollama", Some("http://localhost:8080"), None);
        assert!(client.is_ok());
    }

    #[test]
    fn test_create_mock_client() {
        let client = create_client("mock", None, None).unwrap();
        assert_eq!(client.provider_name(), "mock");
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None, None) {
            Err(err) => assert!(err.contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
