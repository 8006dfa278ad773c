//! Text helpers shared by scoring, fallback and cleaning.

use std::collections::HashSet;

/// Lowercase words of `text`, split on whitespace, with punctuation trimmed
/// from both ends of each word.
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
}

/// Distinct words of `text`.
pub fn word_set(text: &str) -> HashSet<String> {
    words(text).collect()
}

/// Number of words in `question` that also occur in `other`.
pub fn overlap(question: &HashSet<String>, other: &HashSet<String>) -> usize {
    question.iter().filter(|w| other.contains(*w)).count()
}

/// Collapse every whitespace run to a single space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Split `text` into sentences.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace (or end of
/// text), or at a line break. Each sentence is whitespace-collapsed; empty
/// ones are dropped.
pub fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();

    for line in text.lines() {
        let mut current = String::new();
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            let ends = matches!(c, '.' | '!' | '?')
                && chars.peek().map_or(true, |next| next.is_whitespace());
            if ends {
                push_sentence(&mut out, &current);
                current.clear();
            } else {
                current.push(c);
            }
        }
        push_sentence(&mut out, &current);
    }

    out
}

fn push_sentence(out: &mut Vec<String>, raw: &str) {
    let sentence = collapse_whitespace(raw);
    if !sentence.is_empty() {
        out.push(sentence);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_trim_punctuation() {
        let words: Vec<String> = words("How do I use Git, (GitHub)?").collect();
        assert_eq!(words, vec!["how", "do", "i", "use", "git", "github"]);
    }

    #[test]
    fn test_words_keep_inner_punctuation() {
        let set = word_set("Use gpt-3.5-turbo-0125.");
        assert!(set.contains("gpt-3.5-turbo-0125"));
    }

    #[test]
    fn test_overlap() {
        let q = word_set("python setup help");
        let doc = word_set("Setting up Python: setup steps");
        assert_eq!(overlap(&q, &doc), 2);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b   c "), "a b c");
    }

    #[test]
    fn test_sentences() {
        let text = "Use Python 3.8 or higher. Create a  venv!\n\nForum Post: Setup\nURL: x";
        assert_eq!(
            sentences(text),
            vec!["Use Python 3.8 or higher", "Create a venv", "Forum Post: Setup", "URL: x"]
        );
    }
}
