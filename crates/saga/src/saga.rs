//! Saga scripts: the ordered list of chapters a run follows.

use serde::{Deserialize, Serialize};

/// A single named stage of a saga.
///
/// The name is resolved against a [`ServiceDiscovery`](crate::ServiceDiscovery)
/// when the chapter is reached, not when the saga is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chapter {
    name: String,
}

impl Chapter {
    /// Creates a chapter with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the chapter name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Chapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// An immutable, ordered script of chapters.
///
/// Built with [`Saga::create`]. Names are not validated and duplicates are
/// kept: each occurrence is a distinct chapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Saga {
    chapters: Vec<Chapter>,
}

impl Saga {
    /// Starts a new saga builder.
    pub fn create() -> SagaBuilder {
        SagaBuilder::default()
    }

    /// Builds a saga directly from a sequence of chapter names.
    pub fn from_chapters<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chapters: names.into_iter().map(Chapter::new).collect(),
        }
    }

    /// Returns the chapters in execution order.
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Returns the chapter at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }

    /// Returns the number of chapters.
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    /// Returns true if the saga has no chapters.
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Returns the chapter names in execution order.
    pub fn chapter_names(&self) -> Vec<&str> {
        self.chapters.iter().map(Chapter::name).collect()
    }
}

/// Fluent builder for [`Saga`].
#[derive(Debug, Default)]
pub struct SagaBuilder {
    chapters: Vec<Chapter>,
}

impl SagaBuilder {
    /// Appends a chapter.
    pub fn chapter(mut self, name: impl Into<String>) -> Self {
        self.chapters.push(Chapter::new(name));
        self
    }

    /// Freezes the builder into a saga.
    pub fn build(self) -> Saga {
        Saga {
            chapters: self.chapters,
        }
    }
}

/// Terminal outcome of a saga run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SagaResult {
    /// Every chapter was processed successfully.
    Finished,

    /// A chapter failed and the completed chapters were compensated.
    Rollback,

    /// A chapter had no registered service, or a compensation failed under
    /// the escalating policy.
    Crashed,
}

impl SagaResult {
    /// Returns the result name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SagaResult::Finished => "FINISHED",
            SagaResult::Rollback => "ROLLBACK",
            SagaResult::Crashed => "CRASHED",
        }
    }
}

impl std::fmt::Display for SagaResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
