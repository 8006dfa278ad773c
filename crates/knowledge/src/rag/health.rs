//! Health and service description reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// "healthy" when generation is available, "degraded" otherwise
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub generation: GenerationHealth,
    pub corpus: CorpusHealth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationHealth {
    pub initialized: bool,
    pub provider: Option<String>,
    pub request_count: u32,
    pub daily_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusHealth {
    pub course_sections: usize,
    pub forum_posts: usize,
}

impl HealthReport {
    pub fn new(generation: GenerationHealth, corpus: CorpusHealth) -> Self {
        let status = if generation.initialized {
            "healthy"
        } else {
            "degraded"
        };
        Self {
            status: status.to_string(),
            timestamp: Utc::now(),
            generation,
            corpus,
        }
    }
}

/// Static description of the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub usage: ServiceUsage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceUsage {
    pub request: String,
    pub response: String,
    pub limits: String,
}

impl ServiceInfo {
    pub fn current() -> Self {
        Self {
            name: "TDS Virtual TA".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Answers Tools in Data Science questions from course material and \
                          forum posts, with supporting links."
                .to_string(),
            usage: ServiceUsage {
                request: r#"{"question": "<text, at most 1000 characters>", "image": "<optional base64>"}"#
                    .to_string(),
                response: r#"{"answer": "<text>", "links": [{"url": "<url>", "text": "<label>"}]}"#
                    .to_string(),
                limits: "Answers are capped at 2000 characters; images at 10MB.".to_string(),
            },
        }
    }
}
