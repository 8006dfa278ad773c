//! Keyword-overlap relevance scoring over the content store.
//!
//! Scoring is a pure function of the tokenized question and the corpus, so
//! the same question always produces the same context.

use crate::rag::types::{Context, ScoredItem};
use crate::store::ContentStore;
use crate::text::{overlap, word_set};
use crate::types::{Document, ForumPost};
use std::collections::HashSet;
use std::sync::Arc;

/// Documents kept after ranking.
pub const MAX_DOCUMENTS: usize = 3;

/// Forum posts kept after ranking.
pub const MAX_POSTS: usize = 3;

/// Blocks in the final context.
pub const MAX_CONTEXT_BLOCKS: usize = 5;

const DOCUMENT_TOPIC_WEIGHT: u32 = 2;
const POST_TAG_WEIGHT: u32 = 3;
const POST_TITLE_WEIGHT: u32 = 2;

/// Produces a ranked context for a question.
///
/// Implementations must be deterministic for an unchanged corpus.
pub trait Retriever: Send + Sync {
    fn score_and_select(&self, question: &str) -> Context;
}

/// Keyword-overlap retriever.
#[derive(Debug, Clone)]
pub struct KeywordRetriever {
    store: Arc<ContentStore>,
}

impl KeywordRetriever {
    pub fn new(store: Arc<ContentStore>) -> Self {
        Self { store }
    }
}

impl Retriever for KeywordRetriever {
    fn score_and_select(&self, question: &str) -> Context {
        let query = Query::new(question);

        let documents = top_items(
            self.store
                .documents()
                .iter()
                .map(|doc| ScoredItem {
                    score: score_document(&query, doc),
                    text: doc.render(),
                }),
            MAX_DOCUMENTS,
        );

        let posts = top_items(
            self.store.posts().iter().map(|post| ScoredItem {
                score: score_post(&query, post),
                text: post.render(),
            }),
            MAX_POSTS,
        );

        tracing::debug!(
            "Scored question: {} documents and {} posts matched",
            documents.len(),
            posts.len()
        );

        let blocks: Vec<String> = documents
            .into_iter()
            .chain(posts)
            .take(MAX_CONTEXT_BLOCKS)
            .map(|item| item.text)
            .collect();

        Context::from_blocks(blocks)
    }
}

/// Tokenized question.
struct Query {
    lowered: String,
    words: HashSet<String>,
}

impl Query {
    fn new(question: &str) -> Self {
        Self {
            lowered: question.to_lowercase(),
            words: word_set(question),
        }
    }

    /// A tag matches a question word exactly. Hyphenated tags such as
    /// "virtual-env" never appear as a single word, so those also match as
    /// a substring of the question.
    fn matches_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.words.contains(&tag) || (tag.contains('-') && self.lowered.contains(&tag))
    }

    fn matching_tags(&self, tags: &[String]) -> u32 {
        tags.iter().filter(|tag| self.matches_tag(tag)).count() as u32
    }
}

fn score_document(query: &Query, doc: &Document) -> u32 {
    DOCUMENT_TOPIC_WEIGHT * query.matching_tags(&doc.topics)
        + overlap(&query.words, &word_set(&doc.content)) as u32
}

fn score_post(query: &Query, post: &ForumPost) -> u32 {
    POST_TAG_WEIGHT * query.matching_tags(&post.tags)
        + POST_TITLE_WEIGHT * overlap(&query.words, &word_set(&post.title)) as u32
        + overlap(&query.words, &word_set(&post.content)) as u32
}

/// Drop zero scores, sort descending (stable, so ties keep corpus order),
/// keep the first `limit`.
fn top_items(items: impl Iterator<Item = ScoredItem>, limit: usize) -> Vec<ScoredItem> {
    let mut scored: Vec<ScoredItem> = items.filter(|item| item.score > 0).collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::types::NO_CONTENT_SENTINEL;
    use crate::types::CorpusFile;
    use chrono::NaiveDate;

    fn doc(id: &str, content: &str, topics: &[&str]) -> Document {
        Document {
            id: id.to_string(),
            title: id.to_string(),
            content: content.to_string(),
            topics: topics.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn post(id: &str, title: &str, content: &str, tags: &[&str]) -> ForumPost {
        ForumPost {
            id: id.to_string(),
            title: title.to_string(),
            url: format!("https://discourse.onlinedegree.iitm.ac.in/t/{}/1", id),
            content: content.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            category: String::new(),
            created_at: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            replies: 0,
        }
    }

    fn retriever(documents: Vec<Document>, posts: Vec<ForumPost>) -> KeywordRetriever {
        KeywordRetriever::new(Arc::new(ContentStore::from_corpus(CorpusFile {
            documents,
            posts,
        })))
    }

    #[test]
    fn test_document_score() {
        let query = Query::new("python setup on windows");
        let d = doc("w2", "Install python and finish setup", &["python", "setup", "jupyter"]);
        // 2 tags * 2 + 2 content words
        assert_eq!(score_document(&query, &d), 6);
    }

    #[test]
    fn test_post_score() {
        let query = Query::new("git branches");
        let p = post("git", "Git basics", "Create branches with git", &["git", "github"]);
        // 1 tag * 3 + 1 title word * 2 + 2 body words
        assert_eq!(score_post(&query, &p), 7);
    }

    #[test]
    fn test_hyphenated_tag_matches_substring() {
        let query = Query::new("what about rate-limiting for the api?");
        assert!(query.matches_tag("rate-limiting"));
        assert!(query.matches_tag("api"));
        assert!(!query.matches_tag("ai-proxy"));
    }

    #[test]
    fn test_no_match_returns_sentinel() {
        let r = retriever(vec![doc("a", "alpha", &["alpha"])], Vec::new());
        let context = r.score_and_select("zebra");
        assert_eq!(context.text, NO_CONTENT_SENTINEL);
        assert_eq!(context.blocks, 0);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let r = retriever(
            vec![
                doc("first", "topic", &[]),
                doc("second", "topic", &[]),
                doc("third", "topic topic", &["topic"]),
            ],
            Vec::new(),
        );
        let context = r.score_and_select("topic");
        let order: Vec<&str> = context
            .text
            .split("\n\n")
            .map(|block| block.lines().next().unwrap())
            .collect();
        assert_eq!(
            order,
            vec![
                "Course Material - third:",
                "Course Material - first:",
                "Course Material - second:"
            ]
        );
    }

    #[test]
    fn test_limits_documents_posts_and_blocks() {
        let documents = (0..5).map(|i| doc(&format!("d{}", i), "python", &[])).collect();
        let posts = (0..5)
            .map(|i| post(&format!("p{}", i), "python", "python", &[]))
            .collect();
        let context = retriever(documents, posts).score_and_select("python");

        assert_eq!(context.blocks, 5);
        assert_eq!(context.text.matches("Course Material - ").count(), 3);
        assert_eq!(context.text.matches("Forum Post: ").count(), 2);
    }

    #[test]
    fn test_builtin_ranking_deterministic() {
        let r = KeywordRetriever::new(Arc::new(ContentStore::builtin()));
        let question = "How do I set up my Python virtual environment?";
        let first = r.score_and_select(question);
        let second = r.score_and_select(question);

        assert_eq!(first, second);
        assert!(first.text.starts_with("Course Material - Python Environment Setup"));
        assert!(first.text.contains("python-setup-issues/156001"));
    }
}
