//! Course knowledge and the Virtual TA answer pipeline.
//!
//! The content store holds a fixed corpus of course sections and forum
//! posts. The `rag` module ranks it against a question, asks the generation
//! provider when the quota allows, falls back to rule-based answers
//! otherwise, and enforces the `{answer, links}` output contract.

pub mod rag;
pub mod seed;
pub mod store;
pub mod text;
pub mod types;

#[cfg(test)]
mod tests;

pub use rag::{AnswerPayload, AskRequest, AskResponse, Link, ResponseStatus, VirtualTa};
pub use store::ContentStore;
pub use types::{CorpusFile, CorpusSummary, Document, ForumPost};
