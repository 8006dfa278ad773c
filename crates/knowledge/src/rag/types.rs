//! Answer pipeline types.

use serde::{Deserialize, Serialize};

/// Forum home page, used whenever no better link is available.
pub const FORUM_HOME_URL: &str = "https://discourse.onlinedegree.iitm.ac.in/";

/// Label of the forum home link.
pub const FORUM_HOME_TEXT: &str = "TDS Course Forum";

/// Upper bound on the answer text, in characters.
pub const MAX_ANSWER_CHARS: usize = 2000;

/// Context returned when no corpus item matched the question.
pub const NO_CONTENT_SENTINEL: &str = "No specific course content found for this question.";

/// A citation link attached to an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub text: String,
}

impl Link {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }

    /// Link to the forum home page.
    pub fn forum_home() -> Self {
        Self::new(FORUM_HOME_URL, FORUM_HOME_TEXT)
    }
}

/// The output contract: a bounded answer plus at least one link.
///
/// Values that went through the validator always satisfy the contract:
/// a non-empty answer of at most 2000 characters and a non-empty list of
/// links whose URLs start with "http".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerPayload {
    pub answer: String,
    pub links: Vec<Link>,
}

impl AnswerPayload {
    pub fn new(answer: impl Into<String>, links: Vec<Link>) -> Self {
        Self {
            answer: answer.into(),
            links,
        }
    }
}

/// A corpus item rendered for the context, with its relevance score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredItem {
    pub score: u32,
    pub text: String,
}

/// Ranked course context for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// Rendered blocks joined by blank lines, or the no-content sentinel
    pub text: String,

    /// Number of blocks in `text` (zero when the sentinel was returned)
    pub blocks: usize,
}

impl Context {
    /// Build from rendered blocks; no blocks yields the sentinel.
    pub fn from_blocks(blocks: Vec<String>) -> Self {
        if blocks.is_empty() {
            return Self::empty();
        }
        Self {
            blocks: blocks.len(),
            text: blocks.join("\n\n"),
        }
    }

    /// Context of caller-supplied text, treated as one block when non-blank.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            Self::empty()
        } else {
            Self { text, blocks: 1 }
        }
    }

    /// The "search ran but found nothing" context.
    pub fn empty() -> Self {
        Self {
            text: NO_CONTENT_SENTINEL.to_string(),
            blocks: 0,
        }
    }

    pub fn has_content(&self) -> bool {
        self.blocks > 0
    }
}

/// Status class of a response, left to the transport to map onto its codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Ok,
    ClientError,
    ServerError,
}

impl ResponseStatus {
    /// HTTP-style status code for this class.
    pub fn code(&self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::ClientError => 400,
            Self::ServerError => 500,
        }
    }
}

/// A payload together with its status class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub status: ResponseStatus,
    pub payload: AnswerPayload,
}

impl AskResponse {
    pub fn ok(payload: AnswerPayload) -> Self {
        Self {
            status: ResponseStatus::Ok,
            payload,
        }
    }

    pub fn client_error(payload: AnswerPayload) -> Self {
        Self {
            status: ResponseStatus::ClientError,
            payload,
        }
    }

    pub fn server_error(payload: AnswerPayload) -> Self {
        Self {
            status: ResponseStatus::ServerError,
            payload,
        }
    }
}

/// Which path produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    /// Generated by the provider
    Generated,

    /// Category fallback (no generator available)
    CategoryFallback,

    /// Context-aware fallback (quota spent, or generation failed)
    ContextFallback,
}

impl AnswerSource {
    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::Generated)
    }
}
