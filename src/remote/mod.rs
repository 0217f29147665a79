//! Client side of the structured record store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::data::EntityKind;
use crate::error::{GatewayError, Operation};

pub mod mapping;
pub mod mongo;

pub use mongo::MongoRecordService;

/// Which fields a read returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordQuery {
    #[serde(default)]
    pub fields: Vec<String>,
}

impl RecordQuery {
    pub fn fields(fields: Vec<String>) -> RecordQuery {
        RecordQuery { fields }
    }
}

/// Outcome of a single record within a batch write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RecordResult {
    pub fn ok(data: Value) -> RecordResult {
        RecordResult {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn failed(message: impl ToString) -> RecordResult {
        RecordResult {
            success: false,
            message: Some(message.to_string()),
            data: None,
        }
    }
}

/// Response of every record store call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<RecordResult>>,
}

impl Envelope {
    pub fn ok(data: Value) -> Envelope {
        Envelope {
            success: true,
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn failed(message: impl ToString) -> Envelope {
        Envelope {
            success: false,
            message: Some(message.to_string()),
            ..Default::default()
        }
    }

    /// Batch response. The envelope itself succeeds even if some records
    /// didn't.
    pub fn batch(results: Vec<RecordResult>) -> Envelope {
        Envelope {
            success: true,
            results: Some(results),
            ..Default::default()
        }
    }

    /// Checks the envelope and every record result, returning the payload of
    /// a successful call.
    ///
    /// A failed envelope fails the call with its message. Failed record
    /// results are all logged and the first one's message is surfaced.
    pub fn into_outcome(self, op: Operation, kind: EntityKind) -> Result<Outcome, GatewayError> {
        if !self.success {
            return Err(GatewayError::remote(self.message, op, kind));
        }

        match self.results {
            Some(results) => {
                first_failure(&results, op, kind)?;
                Ok(Outcome::Batch(
                    results.into_iter().filter_map(|it| it.data).collect(),
                ))
            }
            None => Ok(Outcome::Data(self.data)),
        }
    }
}

/// Payload of a successful record store call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Data(Option<Value>),
    Batch(Vec<Value>),
}

impl Outcome {
    /// First returned record, if any.
    pub fn into_first(self) -> Option<Value> {
        match self {
            Outcome::Data(Some(Value::Array(rows))) => rows.into_iter().next(),
            Outcome::Data(data) => data,
            Outcome::Batch(rows) => rows.into_iter().next(),
        }
    }

    pub fn into_rows(self) -> Vec<Value> {
        match self {
            Outcome::Data(Some(Value::Array(rows))) => rows,
            Outcome::Data(Some(Value::Null)) | Outcome::Data(None) => Vec::new(),
            Outcome::Data(Some(row)) => vec![row],
            Outcome::Batch(rows) => rows,
        }
    }
}

fn first_failure(
    results: &[RecordResult],
    op: Operation,
    kind: EntityKind,
) -> Result<(), GatewayError> {
    let failed: Vec<&RecordResult> = results.iter().filter(|it| !it.success).collect();
    if failed.is_empty() {
        return Ok(());
    }

    for result in &failed {
        tracing::error!(
            "{} {} failed for a record: {}",
            kind.noun(),
            op.verb(),
            result.message.as_deref().unwrap_or("no message")
        );
    }

    Err(GatewayError::remote(
        failed.first().and_then(|it| it.message.clone()),
        op,
        kind,
    ))
}

/// Body of create and update calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordsPayload {
    pub records: Vec<Map<String, Value>>,
}

/// Body of delete calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeletePayload {
    #[serde(rename = "RecordIds")]
    pub record_ids: Vec<i64>,
}

/// Structured record store. Every call reports failure through the returned
/// envelope; transport errors become failed envelopes.
#[rocket::async_trait]
pub trait RecordService: Send + Sync {
    async fn fetch_records(&self, table: &str, query: &RecordQuery) -> Envelope;

    async fn get_record_by_id(&self, table: &str, id: i64, query: &RecordQuery) -> Envelope;

    async fn create_record(&self, table: &str, payload: RecordsPayload) -> Envelope;

    async fn update_record(&self, table: &str, payload: RecordsPayload) -> Envelope;

    async fn delete_record(&self, table: &str, payload: DeletePayload) -> Envelope;
}
