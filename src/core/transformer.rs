use crate::domain::model::{PulseDocument, RawResponse, ANONYMOUS_AUTHOR, UNKNOWN_PULSE_ID};
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Envelope field holding the record array when the feed does not return a
/// top-level array.
const RECORDS_FIELD: &str = "results";

#[derive(Debug, Clone, Default)]
pub struct Transformer;

impl Transformer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize one raw response into a batch. Records that are not JSON
    /// objects are skipped; a batch with zero usable documents is a failure,
    /// not an empty batch handed downstream.
    pub fn transform(&self, payload: &RawResponse) -> Result<Vec<PulseDocument>> {
        let records = locate_records(payload)?;
        if records.is_empty() {
            return Err(EtlError::EmptyData {
                reason: "feed returned zero records".to_string(),
            });
        }

        // One ingestion instant for the whole batch.
        let ingested_at = Utc::now();

        let batch: Vec<PulseDocument> = records
            .iter()
            .filter_map(|raw| normalize_record(raw, ingested_at))
            .collect();

        let skipped = records.len() - batch.len();
        if skipped > 0 {
            tracing::warn!(skipped, total = records.len(), "Skipped malformed records");
        }

        if batch.is_empty() {
            return Err(EtlError::EmptyData {
                reason: "no usable records after normalization".to_string(),
            });
        }

        tracing::info!(documents = batch.len(), "🔄 Transform complete");
        Ok(batch)
    }
}

fn locate_records(payload: &RawResponse) -> Result<&Vec<Value>> {
    match payload {
        Value::Array(items) => Ok(items),
        Value::Object(envelope) => envelope
            .get(RECORDS_FIELD)
            .and_then(Value::as_array)
            .ok_or_else(|| EtlError::EmptyData {
                reason: format!("response has no '{}' array", RECORDS_FIELD),
            }),
        _ => Err(EtlError::EmptyData {
            reason: "response is neither an array nor an object".to_string(),
        }),
    }
}

/// Map one raw record to the persisted shape, defaulting every field
/// independently. Returns None for records that are not JSON objects;
/// those are skipped by the caller, never an error.
pub fn normalize_record(raw: &Value, ingested_at: DateTime<Utc>) -> Option<PulseDocument> {
    let fields = raw.as_object()?;

    let pulse_id = match fields.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => UNKNOWN_PULSE_ID.to_string(),
    };

    let author = fields
        .get("author")
        .and_then(|author| author.get("username"))
        .and_then(Value::as_str)
        .unwrap_or(ANONYMOUS_AUTHOR)
        .to_string();

    Some(PulseDocument {
        pulse_id,
        title: str_field(fields, "name"),
        description: str_field(fields, "description"),
        author,
        tags: string_list(fields.get("tags")),
        references: string_list(fields.get("references")),
        indicator_count: fields
            .get("indicator_count")
            .and_then(Value::as_i64)
            .unwrap_or(0),
        modified: str_field(fields, "modified"),
        ingestion_timestamp: ingested_at,
    })
}

fn str_field(fields: &Map<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
