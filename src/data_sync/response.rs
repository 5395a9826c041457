use crate::data_sync::query::GraphEntity;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// A response that arrived but cannot be used. These are retried by the
/// fetcher, unlike transport errors.
#[derive(Debug, Error)]
pub enum MalformedResponse {
    #[error("response does not contain property \"data.{0}\"")]
    MissingField(GraphEntity),
    #[error("records under \"data.{entity}\" could not be decoded: {source}")]
    InvalidRecords {
        entity: GraphEntity,
        #[source]
        source: serde_json::Error,
    },
}

/// Typed records from one response plus the block the graph had indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPage<T> {
    pub records: Vec<T>,
    pub block_number: Option<i64>,
}

/// Check that `data.<entity>` is present and decode it into typed records.
pub fn decode_page<T: DeserializeOwned>(response: &Value, entity: GraphEntity) -> Result<GraphPage<T>, MalformedResponse> {
    let records = response
        .get("data")
        .and_then(|data| data.get(entity.to_string()))
        .filter(|records| !records.is_null())
        .ok_or(MalformedResponse::MissingField(entity))?;

    let records = Vec::<T>::deserialize(records).map_err(|source| MalformedResponse::InvalidRecords { entity, source })?;

    Ok(GraphPage { records, block_number: meta_block_number(response) })
}

/// `data._meta.block.number`, accepting numbers or numeric strings.
fn meta_block_number(response: &Value) -> Option<i64> {
    let number = response.pointer("/data/_meta/block/number")?;
    match number {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
