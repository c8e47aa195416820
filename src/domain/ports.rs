use crate::domain::model::{PulseDocument, RawResponse};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The three pipeline stages as one port, driven by the engine. `extract`
/// and `load` own all I/O; `transform` is pure apart from the clock read.
#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawResponse>;
    fn transform(&self, payload: &RawResponse) -> Result<Vec<PulseDocument>>;
    async fn load(&self, batch: &[PulseDocument]) -> Result<usize>;
}

/// Document store port. The production adapter wraps the MongoDB driver;
/// tests substitute an in-memory implementation.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Liveness handshake, run once before any write is attempted.
    async fn ping(&self) -> Result<()>;
    /// Bulk-insert the whole batch into the named collection as one client
    /// call. Returns the number of inserted documents.
    async fn insert_batch(&self, collection: &str, batch: &[PulseDocument]) -> Result<usize>;
    /// Release the connection. Safe to call when no write ever happened.
    async fn close(&self);
}
