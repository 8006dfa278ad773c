//! Request intake: parsing and rejection of bad questions before the
//! pipeline runs.

use crate::rag::types::{AnswerPayload, AskResponse, Link};
use serde::{Deserialize, Serialize};

/// Longest accepted question, in characters.
pub const MAX_QUESTION_CHARS: usize = 1000;

const INVALID_JSON: &str = "Invalid JSON format in request. Please check your request structure.";
const EMPTY_QUESTION: &str = "Please provide a question for the TDS Virtual TA.";
const QUESTION_TOO_LONG: &str = "Question is too long. Please keep it under 1000 characters.";
const SERVICE_UNAVAILABLE: &str =
    "Unable to initialize TDS Virtual TA services. Please try again later.";

/// Inbound question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,

    /// Base64 image, optionally as a `data:` URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl AskRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Parse a raw request body.
    ///
    /// Anything that is not a JSON object with the expected field types is a
    /// client error carrying the fixed explanatory payload.
    pub fn from_json(body: &str) -> Result<Self, AskResponse> {
        serde_json::from_str(body).map_err(|e| {
            tracing::warn!("Rejected request body: {}", e);
            rejection(INVALID_JSON)
        })
    }

    /// Reject empty or oversized questions.
    ///
    /// Returns the trimmed question on success.
    pub fn validate(&self) -> Result<&str, AskResponse> {
        let question = self.question.trim();

        if question.is_empty() {
            return Err(rejection(EMPTY_QUESTION));
        }

        if question.chars().count() > MAX_QUESTION_CHARS {
            return Err(rejection(QUESTION_TOO_LONG));
        }

        Ok(question)
    }

    /// The image field, if it carries anything.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref().map(str::trim).filter(|img| !img.is_empty())
    }
}

fn rejection(message: &str) -> AskResponse {
    AskResponse::client_error(AnswerPayload::new(message, vec![Link::forum_home()]))
}

/// Response for a pipeline that could not be started.
pub fn service_unavailable() -> AskResponse {
    AskResponse::server_error(AnswerPayload::new(
        SERVICE_UNAVAILABLE,
        vec![Link::forum_home()],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::types::ResponseStatus;

    #[test]
    fn test_parse_request() {
        let request = AskRequest::from_json(r#"{"question": "What is GA1?", "image": "aGk="}"#)
            .unwrap();
        assert_eq!(request.question, "What is GA1?");
        assert_eq!(request.image(), Some("aGk="));
    }

    #[test]
    fn test_missing_question_defaults_to_empty() {
        let request = AskRequest::from_json("{}").unwrap();
        let rejected = request.validate().unwrap_err();
        assert_eq!(rejected.payload.answer, EMPTY_QUESTION);
    }

    #[test]
    fn test_invalid_json() {
        for body in ["{not json", "[1, 2]", r#"{"question": 5}"#] {
            let rejected = AskRequest::from_json(body).unwrap_err();
            assert_eq!(rejected.status, ResponseStatus::ClientError);
            assert_eq!(rejected.payload.answer, INVALID_JSON);
        }
    }

    #[test]
    fn test_blank_question_rejected() {
        let rejected = AskRequest::new("   \n").validate().unwrap_err();
        assert_eq!(rejected.status, ResponseStatus::ClientError);
        assert_eq!(rejected.payload.links, vec![Link::forum_home()]);
    }

    #[test]
    fn test_length_limit() {
        assert!(AskRequest::new("q".repeat(1000)).validate().is_ok());

        let rejected = AskRequest::new("q".repeat(1001)).validate().unwrap_err();
        assert_eq!(rejected.payload.answer, QUESTION_TOO_LONG);
    }

    #[test]
    fn test_question_trimmed() {
        let request = AskRequest::new("  What is pandas?  ");
        assert_eq!(request.validate().unwrap(), "What is pandas?");
    }

    #[test]
    fn test_blank_image_ignored() {
        assert_eq!(AskRequest::new("q").with_image("  ").image(), None);
    }

    #[test]
    fn test_service_unavailable() {
        let response = service_unavailable();
        assert_eq!(response.status.code(), 500);
    }
}
