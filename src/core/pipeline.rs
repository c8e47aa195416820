use crate::config::Settings;
use crate::core::extractor::Extractor;
use crate::core::loader::Loader;
use crate::core::transformer::Transformer;
use crate::domain::model::{PulseDocument, RawResponse};
use crate::domain::ports::{DocumentStore, Pipeline};
use crate::utils::error::Result;

/// Production pipeline: authenticated feed fetch, pulse normalization, and
/// a scoped bulk insert into the configured collection.
pub struct PulsePipeline<S: DocumentStore> {
    extractor: Extractor,
    transformer: Transformer,
    store: S,
    settings: Settings,
}

impl<S: DocumentStore> PulsePipeline<S> {
    pub fn new(extractor: Extractor, transformer: Transformer, store: S, settings: Settings) -> Self {
        Self {
            extractor,
            transformer,
            store,
            settings,
        }
    }
}

#[async_trait::async_trait]
impl<S: DocumentStore> Pipeline for PulsePipeline<S> {
    async fn extract(&self) -> Result<RawResponse> {
        let params = match self.settings.page_size {
            Some(limit) => vec![("limit", limit.to_string())],
            None => Vec::new(),
        };
        self.extractor.fetch(&self.settings.resource, &params).await
    }

    fn transform(&self, payload: &RawResponse) -> Result<Vec<PulseDocument>> {
        self.transformer.transform(payload)
    }

    async fn load(&self, batch: &[PulseDocument]) -> Result<usize> {
        let loader = Loader::open(&self.store).await?;
        let outcome = loader.load(&self.settings.collection, batch).await;
        loader.close().await;
        outcome
    }
}
