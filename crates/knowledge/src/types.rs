//! Content store type definitions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A section of course material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Section key (e.g., "week1")
    pub id: String,

    /// Section title
    pub title: String,

    /// Body text
    pub content: String,

    /// Topic tags, in curation order
    #[serde(default)]
    pub topics: Vec<String>,
}

impl Document {
    /// Render the section as a context block.
    pub fn render(&self) -> String {
        format!("Course Material - {}:\n{}", self.title, self.content.trim())
    }
}

/// A forum thread relevant to the course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumPost {
    /// Forum topic identifier
    pub id: String,

    /// Thread title
    pub title: String,

    /// Canonical thread URL
    pub url: String,

    /// Body text (accepted answer or summary)
    pub content: String,

    /// Tags attached to the thread
    #[serde(default)]
    pub tags: Vec<String>,

    /// Forum category slug
    #[serde(default)]
    pub category: String,

    /// Creation date
    pub created_at: NaiveDate,

    /// Number of replies in the thread
    #[serde(default)]
    pub replies: u32,
}

impl ForumPost {
    /// Render the post as a context block. The URL line is what the link
    /// extractor later picks up.
    pub fn render(&self) -> String {
        format!(
            "Forum Post: {}\nURL: {}\nContent: {}\nTags: {}",
            self.title,
            self.url,
            self.content.trim(),
            self.tags.join(", ")
        )
    }
}

/// On-disk corpus format (YAML).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusFile {
    #[serde(default)]
    pub documents: Vec<Document>,

    #[serde(default)]
    pub posts: Vec<ForumPost>,
}

/// Summary of the loaded corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusSummary {
    /// Number of course material sections
    pub course_sections: usize,

    /// Number of forum posts
    pub forum_posts: usize,

    /// When the store was loaded
    pub loaded_at: DateTime<Utc>,
}
