use crate::domain::model::PulseDocument;
use crate::domain::ports::DocumentStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Database};

/// Production document store backed by the official MongoDB driver.
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Parse the connection string and select the database. The driver
    /// connects lazily; liveness is checked by `ping` at load time.
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let database = client.database(database);
        Ok(Self { client, database })
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn ping(&self) -> Result<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn insert_batch(&self, collection: &str, batch: &[PulseDocument]) -> Result<usize> {
        let mut documents = Vec::with_capacity(batch.len());
        for pulse in batch {
            documents.push(mongodb::bson::to_document(pulse)?);
        }

        let outcome = self
            .database
            .collection::<Document>(collection)
            .insert_many(documents)
            .await?;
        Ok(outcome.inserted_ids.len())
    }

    async fn close(&self) {
        // Client is a handle over a shared connection pool; shutdown
        // consumes one handle and tears the pool down.
        self.client.clone().shutdown().await;
    }
}
