use crate::domain::model::PulseDocument;
use crate::domain::ports::DocumentStore;
use crate::utils::error::{EtlError, Result};

/// Scoped handle over an open store connection: `open` verifies liveness,
/// `close` consumes the guard. Callers run open → load → close so the
/// connection is released on every path, including a failed load.
pub struct Loader<'a, S: DocumentStore> {
    store: &'a S,
}

impl<'a, S: DocumentStore> Loader<'a, S> {
    /// Verify the store is reachable before declaring the connection open.
    /// Failure here is fatal to the run and propagates.
    pub async fn open(store: &'a S) -> Result<Loader<'a, S>> {
        if let Err(e) = store.ping().await {
            return Err(EtlError::StoreUnavailable {
                message: e.to_string(),
            });
        }
        tracing::info!("Connected to document store");
        Ok(Self { store })
    }

    /// One bulk insert of the whole batch. Partial insert outcomes are not
    /// inspected; any store error is reported as a persistence failure.
    pub async fn load(&self, collection: &str, batch: &[PulseDocument]) -> Result<usize> {
        if batch.is_empty() {
            tracing::warn!("No data to load");
            return Err(EtlError::EmptyData {
                reason: "empty batch handed to loader".to_string(),
            });
        }

        match self.store.insert_batch(collection, batch).await {
            Ok(inserted) => {
                tracing::info!(inserted, collection, "💾 Inserted documents");
                Ok(inserted)
            }
            Err(e) => {
                tracing::error!(collection, "❌ Insert failed: {}", e);
                Err(EtlError::Persistence {
                    message: e.to_string(),
                })
            }
        }
    }

    pub async fn close(self) {
        self.store.close().await;
        tracing::info!("Document store connection closed");
    }
}
