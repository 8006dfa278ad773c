//! Output contract enforcement.
//!
//! Every function here is total: malformed input is replaced with defaults,
//! never reported as an error.

use crate::rag::types::{AnswerPayload, Link, MAX_ANSWER_CHARS};
use crate::text::collapse_whitespace;
use serde_json::Value;

const MISSING_ANSWER: &str = "Unable to generate a proper response.";
const NULL_ANSWER: &str = "No answer provided.";
const BLANK_ANSWER: &str = "Unable to provide a meaningful answer.";
const SAFE_DEFAULT_ANSWER: &str = "Response validation failed. Please try again.";
const UNCLEAN_ANSWER: &str = "I couldn't generate a proper response.";
const ELLIPSIS: &str = "...";

/// Generated answers longer than this are trimmed at sentence boundaries.
const CLEAN_TRIGGER_CHARS: usize = 1200;

/// Target length for trimmed generated answers.
const CLEAN_TARGET_CHARS: usize = 1000;

/// Payload returned when validation cannot produce anything better.
pub fn safe_default() -> AnswerPayload {
    AnswerPayload::new(SAFE_DEFAULT_ANSWER, vec![Link::forum_home()])
}

/// Normalize an arbitrary JSON value into a contract-compliant payload.
pub fn validate(raw: &Value) -> AnswerPayload {
    let Some(object) = raw.as_object() else {
        tracing::warn!("Response is not an object, returning safe default");
        return safe_default();
    };

    let answer = match object.get("answer") {
        None => MISSING_ANSWER.to_string(),
        Some(Value::Null) => NULL_ANSWER.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    };

    let links = match object.get("links") {
        Some(Value::Array(items)) => items.iter().filter_map(link_from_value).collect(),
        _ => Vec::new(),
    };

    finish(answer, links)
}

/// Normalize a typed payload.
pub fn validate_payload(payload: AnswerPayload) -> AnswerPayload {
    finish(payload.answer, payload.links)
}

fn link_from_value(value: &Value) -> Option<Link> {
    let object = value.as_object()?;
    let url = object.get("url")?.as_str()?;
    let text = object.get("text")?.as_str()?;
    Some(trimmed_link(url, text))
}

fn trimmed_link(url: &str, text: &str) -> Link {
    Link::new(url.trim(), text.trim())
}

fn is_well_formed(link: &Link) -> bool {
    link.url.starts_with("http") && !link.text.is_empty()
}

fn finish(answer: String, links: Vec<Link>) -> AnswerPayload {
    let trimmed = answer.trim();
    let answer = if trimmed.is_empty() {
        BLANK_ANSWER.to_string()
    } else {
        bound_length(trimmed)
    };

    let mut links: Vec<Link> = links
        .into_iter()
        .map(|link| trimmed_link(&link.url, &link.text))
        .filter(is_well_formed)
        .collect();
    if links.is_empty() {
        links.push(Link::forum_home());
    }

    let payload = AnswerPayload::new(answer, links);

    match serde_json::to_string(&payload) {
        Ok(_) => payload,
        Err(e) => {
            tracing::error!("Validated payload failed to serialize: {}", e);
            safe_default()
        }
    }
}

/// Cap at 2000 characters, marking the cut with an ellipsis.
fn bound_length(answer: &str) -> String {
    if answer.chars().count() <= MAX_ANSWER_CHARS {
        return answer.to_string();
    }
    let kept = MAX_ANSWER_CHARS - ELLIPSIS.len();
    let mut bounded: String = answer.chars().take(kept).collect();
    bounded.push_str(ELLIPSIS);
    bounded
}

/// Tidy raw generated text before it is wrapped in a payload.
///
/// Collapses whitespace; text over 1200 characters is cut back to whole
/// ". "-separated sentences within 1000 characters.
pub fn clean_answer_text(raw: &str) -> String {
    let cleaned = collapse_whitespace(raw);

    let cleaned = if cleaned.chars().count() > CLEAN_TRIGGER_CHARS {
        let mut kept = String::new();
        for sentence in cleaned.split(". ") {
            if kept.chars().count() + sentence.chars().count() > CLEAN_TARGET_CHARS {
                break;
            }
            kept.push_str(sentence);
            kept.push_str(". ");
        }
        kept.trim().to_string()
    } else {
        cleaned
    };

    if cleaned.is_empty() {
        UNCLEAN_ANSWER.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_contract(payload: &AnswerPayload) {
        let len = payload.answer.chars().count();
        assert!((1..=MAX_ANSWER_CHARS).contains(&len));
        assert!(!payload.links.is_empty());
        for link in &payload.links {
            assert!(link.url.starts_with("http"));
            assert!(!link.text.is_empty());
        }
    }

    #[test]
    fn test_long_answer_truncated_with_ellipsis() {
        let payload = validate(&json!({
            "answer": "x".repeat(2500),
            "links": [{"url": "https://example.com", "text": "Example"}]
        }));

        assert_eq!(payload.answer.chars().count(), 2000);
        assert!(payload.answer.ends_with("..."));
        assert_contract(&payload);
    }

    #[test]
    fn test_exactly_max_length_untouched() {
        let payload = validate(&json!({"answer": "y".repeat(2000), "links": []}));
        assert_eq!(payload.answer, "y".repeat(2000));
    }

    #[test]
    fn test_answer_defaults() {
        assert_eq!(validate(&json!({})).answer, MISSING_ANSWER);
        assert_eq!(validate(&json!({"answer": null})).answer, NULL_ANSWER);
        assert_eq!(validate(&json!({"answer": 42})).answer, "42");
        assert_eq!(validate(&json!({"answer": "   \n"})).answer, BLANK_ANSWER);
    }

    #[test]
    fn test_links_filtered() {
        let payload = validate(&json!({
            "answer": "ok",
            "links": [
                {"url": "ftp://files", "text": "FTP"},
                {"url": "https://good.example", "text": ""},
                {"url": "", "text": "Empty"},
                {"text": "No url"},
                "not an object",
                {"url": "http://kept.example", "text": "Kept"}
            ]
        }));

        assert_eq!(payload.links, vec![Link::new("http://kept.example", "Kept")]);
    }

    #[test]
    fn test_link_fields_trimmed() {
        let payload = validate(&json!({
            "answer": "ok",
            "links": [
                {"url": "  https://discourse.onlinedegree.iitm.ac.in/t/x/1 ", "text": "  Label "},
                {"url": "https://blank.example", "text": "   "}
            ]
        }));
        assert_eq!(
            payload.links,
            vec![Link::new("https://discourse.onlinedegree.iitm.ac.in/t/x/1", "Label")]
        );

        let typed = validate_payload(AnswerPayload::new(
            "ok",
            vec![Link::new(" http://typed.example", "Typed ")],
        ));
        assert_eq!(typed.links, vec![Link::new("http://typed.example", "Typed")]);
    }

    #[test]
    fn test_default_link_injected() {
        let payload = validate(&json!({"answer": "ok", "links": "nope"}));
        assert_eq!(payload.links, vec![Link::forum_home()]);
    }

    #[test]
    fn test_non_object_returns_safe_default() {
        assert_eq!(validate(&json!("just text")), safe_default());
        assert_eq!(validate(&json!([1, 2])), safe_default());
    }

    #[test]
    fn test_contract_holds_for_odd_inputs() {
        let inputs = vec![
            json!(null),
            json!({"answer": "é".repeat(3000)}),
            json!({"answer": ["a"], "links": [{"url": 1, "text": 2}]}),
            json!({"answer": "\u{0}"}),
        ];
        for input in inputs {
            assert_contract(&validate(&input));
        }
    }

    #[test]
    fn test_clean_collapses_whitespace() {
        assert_eq!(clean_answer_text("  Use\n\n venv   please "), "Use venv please");
        assert_eq!(clean_answer_text(" \n "), UNCLEAN_ANSWER);
    }

    #[test]
    fn test_clean_trims_long_answers_at_sentences() {
        let sentence = "This sentence is roughly fifty characters long ok";
        let raw = vec![sentence; 30].join(". ");
        let cleaned = clean_answer_text(&raw);

        assert!(cleaned.chars().count() <= 1000);
        assert!(cleaned.ends_with("ok."));
        assert!(cleaned.starts_with(sentence));
    }
}
