//! Citation links derived from the context.

use crate::rag::types::{Link, FORUM_HOME_TEXT, FORUM_HOME_URL};
use regex::Regex;
use std::sync::OnceLock;

/// Forum thread links kept per answer.
pub const MAX_LINKS: usize = 2;

/// Forum category page for assignment questions.
pub const ASSIGNMENT_HELP_URL: &str =
    "https://discourse.onlinedegree.iitm.ac.in/c/degree-program/tools-in-data-science/";

const ASSIGNMENT_WORDS: [&str; 3] = ["assignment", "homework", "submit"];

fn thread_url_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"https://discourse\.onlinedegree\.iitm\.ac\.in/t/[^/\s]+/\d+(?:/\d+)?")
                .ok()
        })
        .as_ref()
}

fn slug_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"/t/([^/]+)/").ok())
        .as_ref()
}

/// Extract up to two forum links from `context`.
///
/// Always returns at least one link: with no thread URL in the context, the
/// question picks between the assignment help page and the forum home.
pub fn extract_links(context: &str, question: &str) -> Vec<Link> {
    let mut urls: Vec<&str> = Vec::new();

    if let Some(pattern) = thread_url_pattern() {
        for found in pattern.find_iter(context) {
            let url = found.as_str();
            if !urls.contains(&url) {
                urls.push(url);
            }
            if urls.len() == MAX_LINKS {
                break;
            }
        }
    }

    let links: Vec<Link> = urls
        .iter()
        .enumerate()
        .map(|(i, url)| Link::new(*url, label_for(url, i + 1)))
        .collect();

    if !links.is_empty() {
        return links;
    }

    let lowered = question.to_lowercase();
    if ASSIGNMENT_WORDS.iter().any(|w| lowered.contains(w)) {
        vec![Link::new(ASSIGNMENT_HELP_URL, "TDS Assignment Help")]
    } else {
        vec![Link::new(FORUM_HOME_URL, FORUM_HOME_TEXT)]
    }
}

/// "ga5-question-8-clarification" becomes "Ga5 Question 8 Clarification Discussion".
fn label_for(url: &str, position: usize) -> String {
    let slug = slug_pattern()
        .and_then(|pattern| pattern.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|slug| slug.chars().any(char::is_alphabetic));

    match slug {
        Some(slug) => format!("{} Discussion", title_case(&slug.replace('-', " "))),
        None => format!("Related Discussion {}", position),
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
