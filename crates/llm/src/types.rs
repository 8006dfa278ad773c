//! Provider identification.

/// Provider type enum for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    Gemini,
    Ollama,
    Mock,
}

impl ProviderType {
    /// Parse provider type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "ollama" => Some(Self::Ollama),
            "mock" => Some(Self::Mock),
            _ => None,
        }
    }

    /// Get the canonical provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
            Self::Mock => "mock",
        }
    }

    /// Whether this provider needs an API key before it can be used.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::Gemini)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_type_parsing() {
        assert_eq!(ProviderType::parse("gemini"), Some(ProviderType::Gemini));
        assert_eq!(ProviderType::parse("Google"), Some(ProviderType::Gemini));
        assert_eq!(ProviderType::parse("ollama"), Some(ProviderType::Ollama));
        assert_eq!(ProviderType::parse("mock"), Some(ProviderType::Mock));
        assert_eq!(ProviderType::parse("unknown"), None);
    }

    #[test]
    fn test_round_trip_names() {
        for provider in [ProviderType::Gemini, ProviderType::Ollama, ProviderType::Mock] {
            assert_eq!(ProviderType::parse(provider.as_str()), Some(provider));
        }
        assert!(ProviderType::Gemini.requires_api_key());
        assert!(!ProviderType::Ollama.requires_api_key());
    }
}
