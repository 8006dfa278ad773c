//! Answer-synthesis pipeline.
//!
//! question → scorer → context → generation (optional) or fallback →
//! validator → payload.

pub mod ask;
pub mod fallback;
pub mod generate;
pub mod health;
pub mod image;
pub mod intake;
pub mod orchestrator;
pub mod quota;
pub mod search;
pub mod sources;
pub mod types;
pub mod validate;

pub use ask::VirtualTa;
pub use fallback::{category_fallback, context_fallback, Category};
pub use generate::{is_quota_error, GenerationClient, GenerationFailure, GenerationSettings};
pub use health::{HealthReport, ServiceInfo};
pub use image::{describe_image, ImageFormat};
pub use intake::{service_unavailable, AskRequest};
pub use orchestrator::{Orchestrator, Synthesis};
pub use quota::{QuotaDecision, QuotaSnapshot, SharedQuota};
pub use search::{KeywordRetriever, Retriever};
pub use sources::extract_links;
pub use types::{AnswerPayload, AnswerSource, AskResponse, Context, Link, ResponseStatus};
pub use validate::{safe_default, validate, validate_payload};
