//! In-memory content store.
//!
//! Loaded once at startup and read-only afterwards; shared behind an `Arc`.

use crate::seed::builtin_corpus;
use crate::types::{CorpusFile, CorpusSummary, Document, ForumPost};
use chrono::{DateTime, Utc};
use std::path::Path;
use vta_core::{AppConfig, AppError, AppResult};

/// Fixed corpus of course documents and forum posts.
#[derive(Debug, Clone)]
pub struct ContentStore {
    documents: Vec<Document>,
    posts: Vec<ForumPost>,
    loaded_at: DateTime<Utc>,
}

impl ContentStore {
    /// Store holding the built-in course corpus.
    pub fn builtin() -> Self {
        Self::from_corpus(builtin_corpus())
    }

    pub fn from_corpus(corpus: CorpusFile) -> Self {
        Self {
            documents: corpus.documents,
            posts: corpus.posts,
            loaded_at: Utc::now(),
        }
    }

    /// Load a YAML corpus file.
    pub fn from_yaml_path(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Knowledge(format!("Failed to read corpus file {:?}: {}", path, e))
        })?;

        let corpus: CorpusFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Knowledge(format!("Failed to parse corpus file {:?}: {}", path, e))
        })?;

        if corpus.documents.is_empty() && corpus.posts.is_empty() {
            return Err(AppError::Knowledge(format!(
                "Corpus file {:?} contains no documents or posts",
                path
            )));
        }

        tracing::info!(
            "Loaded corpus from {:?}: {} documents, {} posts",
            path,
            corpus.documents.len(),
            corpus.posts.len()
        );

        Ok(Self::from_corpus(corpus))
    }

    /// Load the configured corpus, or the built-in one when none is set.
    pub fn load(config: &AppConfig) -> AppResult<Self> {
        match config.corpus_path() {
            Some(path) => Self::from_yaml_path(&path),
            None => {
                tracing::debug!("No corpus file configured, using built-in corpus");
                Ok(Self::builtin())
            }
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn posts(&self) -> &[ForumPost] {
        &self.posts
    }

    pub fn summary(&self) -> CorpusSummary {
        CorpusSummary {
            course_sections: self.documents.len(),
            forum_posts: self.posts.len(),
            loaded_at: self.loaded_at,
        }
    }
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::builtin()
    }
}
