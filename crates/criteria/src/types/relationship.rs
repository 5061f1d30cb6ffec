//! Parent/child relationship specifications for HAS_CHILD and HAS_PARENT.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::query::Query;

/// How scores of matched related or nested documents are folded into the
/// score of the outer document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScoreMode {
    /// Ignore the inner scores.
    #[default]
    None,
    /// Average of the inner scores.
    Avg,
    /// Highest inner score.
    Max,
    /// Lowest inner score.
    Min,
    /// Sum of the inner scores.
    Sum,
}

impl fmt::Display for ScoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreMode::None => write!(f, "none"),
            ScoreMode::Avg => write!(f, "avg"),
            ScoreMode::Max => write!(f, "max"),
            ScoreMode::Min => write!(f, "min"),
            ScoreMode::Sum => write!(f, "sum"),
        }
    }
}

/// Inner hits requested alongside a relationship query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InnerHits {
    /// Name under which the inner hits are returned.
    #[serde(default)]
    pub name: Option<String>,
    /// Offset of the first inner hit.
    #[serde(default)]
    pub from: Option<u32>,
    /// Maximum number of inner hits.
    #[serde(default)]
    pub size: Option<u32>,
}

impl InnerHits {
    /// Creates named inner hits.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Sets the page window.
    pub fn with_window(mut self, from: u32, size: u32) -> Self {
        self.from = Some(from);
        self.size = Some(size);
        self
    }
}

/// Match parents that have children matching `query`.
#[derive(Debug, Clone, PartialEq)]
pub struct HasChild {
    /// Join type of the children.
    pub child_type: String,
    /// Query the children must match.
    pub query: Box<Query>,
    /// Score mode; falls back to the compiler default when absent.
    pub score_mode: Option<ScoreMode>,
    /// Inner hits to return.
    pub inner_hits: Option<InnerHits>,
}

impl HasChild {
    /// Creates a has-child specification.
    pub fn new(child_type: impl Into<String>, query: Query) -> Self {
        Self {
            child_type: child_type.into(),
            query: Box::new(query),
            score_mode: None,
            inner_hits: None,
        }
    }

    /// Sets the score mode.
    pub fn with_score_mode(mut self, score_mode: ScoreMode) -> Self {
        self.score_mode = Some(score_mode);
        self
    }

    /// Requests inner hits.
    pub fn with_inner_hits(mut self, inner_hits: InnerHits) -> Self {
        self.inner_hits = Some(inner_hits);
        self
    }
}

/// Match children whose parent matches `query`.
#[derive(Debug, Clone, PartialEq)]
pub struct HasParent {
    /// Join type of the parent.
    pub parent_type: String,
    /// Query the parent must match.
    pub query: Box<Query>,
    /// Whether the parent's score is propagated to the child.
    pub score: bool,
    /// Inner hits to return.
    pub inner_hits: Option<InnerHits>,
}

impl HasParent {
    /// Creates a has-parent specification.
    pub fn new(parent_type: impl Into<String>, query: Query) -> Self {
        Self {
            parent_type: parent_type.into(),
            query: Box::new(query),
            score: false,
            inner_hits: None,
        }
    }

    /// Propagates the parent score.
    pub fn with_score(mut self, score: bool) -> Self {
        self.score = score;
        self
    }

    /// Requests inner hits.
    pub fn with_inner_hits(mut self, inner_hits: InnerHits) -> Self {
        self.inner_hits = Some(inner_hits);
        self
    }
}
