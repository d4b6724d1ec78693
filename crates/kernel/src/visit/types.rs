//! Visit record and sink types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single recorded page visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// Path that was visited.
    pub path: String,

    /// Referrer header, if any.
    #[serde(default)]
    pub referrer: Option<String>,

    /// User agent header, if any.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// When the visit occurred.
    pub visited_at: DateTime<Utc>,
}

impl Visit {
    /// Create a visit for the given path, stamped with the current time.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            path: path.into(),
            referrer: None,
            user_agent: None,
            visited_at: Utc::now(),
        }
    }

    /// Attach a referrer.
    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    /// Attach a user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// Destination for flushed visit batches.
///
/// The embedding application implements this over its own storage; the
/// worker only ever calls it with non-empty batches.
#[async_trait]
pub trait VisitSink: Send + Sync {
    /// Persist a batch of visits.
    async fn write_visits(&self, visits: &[Visit]) -> anyhow::Result<()>;
}

/// In-memory sink, used in tests and lightweight embeddings.
#[derive(Debug, Default)]
pub struct MemorySink {
    visits: Mutex<Vec<Visit>>,

    /// Number of flush calls received.
    flushes: Mutex<usize>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All visits written so far.
    pub fn recorded(&self) -> Vec<Visit> {
        self.visits.lock().clone()
    }

    /// Number of visits written so far.
    pub fn len(&self) -> usize {
        self.visits.lock().len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.visits.lock().is_empty()
    }

    /// Number of batches flushed so far.
    pub fn flush_count(&self) -> usize {
        *self.flushes.lock()
    }
}

#[async_trait]
impl VisitSink for MemorySink {
    async fn write_visits(&self, visits: &[Visit]) -> anyhow::Result<()> {
        self.visits.lock().extend_from_slice(visits);
        *self.flushes.lock() += 1;
        Ok(())
    }
}
