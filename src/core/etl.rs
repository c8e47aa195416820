use crate::domain::ports::Pipeline;
use crate::utils::error::{EtlError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Extracting,
    Transforming,
    Loading,
    Succeeded,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Idle => "idle",
            Stage::Extracting => "extracting",
            Stage::Transforming => "transforming",
            Stage::Loading => "loading",
            Stage::Succeeded => "succeeded",
            Stage::Failed => "failed",
        };
        f.write_str(label)
    }
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Drive one run through Extracting → Transforming → Loading,
    /// short-circuiting to Failed on the first stage failure. Returns the
    /// run outcome as a boolean; the only error that propagates is a
    /// store-unavailable failure at connection open.
    pub async fn run(&self) -> Result<bool> {
        tracing::info!("🚀 Starting pulse sync");
        let mut stage = Stage::Idle;

        advance(&mut stage, Stage::Extracting);
        let payload = match self.pipeline.extract().await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("❌ Extract failed: {}", e);
                advance(&mut stage, Stage::Failed);
                return Ok(false);
            }
        };

        advance(&mut stage, Stage::Transforming);
        let batch = match self.pipeline.transform(&payload) {
            Ok(batch) => batch,
            Err(e) => {
                tracing::error!("❌ Transform failed: {}", e);
                advance(&mut stage, Stage::Failed);
                return Ok(false);
            }
        };
        tracing::info!(documents = batch.len(), "Batch ready for load");

        advance(&mut stage, Stage::Loading);
        match self.pipeline.load(&batch).await {
            Ok(inserted) => {
                advance(&mut stage, Stage::Succeeded);
                tracing::info!(inserted, "✅ Pulse sync completed");
                Ok(true)
            }
            Err(e @ EtlError::StoreUnavailable { .. }) => {
                advance(&mut stage, Stage::Failed);
                Err(e)
            }
            Err(e) => {
                tracing::error!("❌ Load failed: {}", e);
                advance(&mut stage, Stage::Failed);
                Ok(false)
            }
        }
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    tracing::info!(from = %stage, to = %next, "Pipeline stage");
    *stage = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{PulseDocument, RawResponse};
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Scripted pipeline: each stage either yields a canned value or fails,
    /// recording the order it was driven in.
    struct ScriptedPipeline {
        extract_outcome: Result<RawResponse>,
        transform_outcome: Result<Vec<PulseDocument>>,
        load_outcome: Result<usize>,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl ScriptedPipeline {
        fn document() -> PulseDocument {
            PulseDocument {
                pulse_id: "p1".to_string(),
                title: "t".to_string(),
                description: String::new(),
                author: "anonymous".to_string(),
                tags: vec![],
                references: vec![],
                indicator_count: 0,
                modified: String::new(),
                ingestion_timestamp: Utc::now(),
            }
        }

        fn happy() -> Self {
            Self {
                extract_outcome: Ok(json!([{"id": 1}])),
                transform_outcome: Ok(vec![Self::document()]),
                load_outcome: Ok(1),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl Pipeline for ScriptedPipeline {
        async fn extract(&self) -> Result<RawResponse> {
            self.calls.lock().unwrap().push("extract");
            clone_outcome(&self.extract_outcome)
        }

        fn transform(&self, _payload: &RawResponse) -> Result<Vec<PulseDocument>> {
            self.calls.lock().unwrap().push("transform");
            clone_outcome(&self.transform_outcome)
        }

        async fn load(&self, _batch: &[PulseDocument]) -> Result<usize> {
            self.calls.lock().unwrap().push("load");
            clone_outcome(&self.load_outcome)
        }
    }

    fn clone_outcome<T: Clone>(outcome: &Result<T>) -> Result<T> {
        match outcome {
            Ok(value) => Ok(value.clone()),
            Err(EtlError::EmptyData { reason }) => Err(EtlError::EmptyData {
                reason: reason.clone(),
            }),
            Err(EtlError::Persistence { message }) => Err(EtlError::Persistence {
                message: message.clone(),
            }),
            Err(EtlError::StoreUnavailable { message }) => Err(EtlError::StoreUnavailable {
                message: message.clone(),
            }),
            Err(EtlError::AttemptsExhausted { attempts }) => Err(EtlError::AttemptsExhausted {
                attempts: *attempts,
            }),
            Err(_) => Err(EtlError::EmptyData {
                reason: "unexpected scripted error".to_string(),
            }),
        }
    }

    #[tokio::test]
    async fn test_run_drives_stages_in_order() {
        let pipeline = ScriptedPipeline::happy();
        let calls = pipeline.calls.clone();

        let outcome = EtlEngine::new(pipeline).run().await.unwrap();

        assert!(outcome);
        assert_eq!(*calls.lock().unwrap(), vec!["extract", "transform", "load"]);
    }

    #[tokio::test]
    async fn test_extract_failure_short_circuits() {
        let pipeline = ScriptedPipeline {
            extract_outcome: Err(EtlError::AttemptsExhausted { attempts: 3 }),
            ..ScriptedPipeline::happy()
        };
        let calls = pipeline.calls.clone();

        let outcome = EtlEngine::new(pipeline).run().await.unwrap();

        assert!(!outcome);
        assert_eq!(*calls.lock().unwrap(), vec!["extract"]);
    }

    #[tokio::test]
    async fn test_transform_failure_skips_load() {
        let pipeline = ScriptedPipeline {
            transform_outcome: Err(EtlError::EmptyData {
                reason: "nothing usable".to_string(),
            }),
            ..ScriptedPipeline::happy()
        };
        let calls = pipeline.calls.clone();

        let outcome = EtlEngine::new(pipeline).run().await.unwrap();

        assert!(!outcome);
        assert_eq!(*calls.lock().unwrap(), vec!["extract", "transform"]);
    }

    #[tokio::test]
    async fn test_load_failure_reports_false() {
        let pipeline = ScriptedPipeline {
            load_outcome: Err(EtlError::Persistence {
                message: "insert refused".to_string(),
            }),
            ..ScriptedPipeline::happy()
        };

        let outcome = EtlEngine::new(pipeline).run().await.unwrap();
        assert!(!outcome);
    }

    #[tokio::test]
    async fn test_store_unavailable_propagates() {
        let pipeline = ScriptedPipeline {
            load_outcome: Err(EtlError::StoreUnavailable {
                message: "ping timed out".to_string(),
            }),
            ..ScriptedPipeline::happy()
        };

        let result = EtlEngine::new(pipeline).run().await;
        assert!(matches!(result, Err(EtlError::StoreUnavailable { .. })));
    }
}
