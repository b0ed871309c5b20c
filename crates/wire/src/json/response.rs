//! Index response body
//!
//! The watermark of a response is the newest transaction every shard has
//! indexed. When per-shard states are reported, that is their minimum;
//! otherwise it is the top-level `lastIndexedTxId`.

use super::error::{WireError, WireStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tessera_core::{EntityRef, FacetCount, FieldValue, ResultEntry, ResultSet, TxnId};

/// One result row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRow {
    /// Matched entity
    pub entity_ref: EntityRef,
    /// Relevance score
    #[serde(default)]
    pub score: f32,
    /// Sort field values, when the index returns them
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldValue>,
}

/// Per-shard tracking state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardState {
    /// Shard identifier
    pub shard: String,
    /// Newest transaction this shard has indexed
    #[serde(default)]
    pub last_indexed_tx_id: Option<TxnId>,
}

/// Body the index answers with
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexResponse {
    /// Result rows in index order
    pub rows: Vec<IndexRow>,
    /// Total matches
    pub num_found: u64,
    /// Offset of the first row
    pub start: u64,
    /// Newest transaction reflected by the snapshot
    pub last_indexed_tx_id: Option<TxnId>,
    /// Per-shard tracking states, when sharded
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shard_states: Vec<ShardState>,
    /// In-band status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WireStatus>,
    /// Server-side query time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_time: Option<u64>,
    /// Facet buckets keyed by field, when facets were requested
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub facet_counts: BTreeMap<String, Vec<FacetCount>>,
}

impl IndexResponse {
    /// Fail if the response carries a non-OK status block
    pub fn check_status(&self) -> Result<(), WireError> {
        match &self.status {
            Some(status) if !status.code.is_ok() => Err(WireError::Status {
                code: status.code.to_string(),
                message: status.message.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Effective snapshot watermark
    ///
    /// `None` when the index did not report one, or when any reporting shard
    /// lacks one.
    pub fn watermark(&self) -> Option<TxnId> {
        if self.shard_states.is_empty() {
            return self.last_indexed_tx_id;
        }
        self.shard_states
            .iter()
            .map(|s| s.last_indexed_tx_id)
            .collect::<Option<Vec<_>>>()?
            .into_iter()
            .min()
    }

    /// Whether matches exist past the returned rows
    pub fn has_more(&self) -> bool {
        self.num_found > self.start + self.rows.len() as u64
    }

    /// Convert into a result set carrying the watermark
    pub fn into_result_set(self) -> ResultSet {
        let watermark = self.watermark();
        let has_more = self.has_more();
        let facets = self.facet_counts;
        let entries = self
            .rows
            .into_iter()
            .map(|row| ResultEntry {
                entity: row.entity_ref,
                score: row.score,
                fields: row.fields,
            })
            .collect();
        let set = ResultSet::new(entries, self.num_found, has_more).with_facets(facets);
        match watermark {
            Some(txid) => set.with_watermark(txid),
            None => set,
        }
    }
}

/// Decode a response body and check its status block
pub fn decode_response(json: &str) -> Result<IndexResponse, WireError> {
    let response: IndexResponse =
        serde_json::from_str(json).map_err(|e| WireError::InvalidJson(e.to_string()))?;
    response.check_status()?;
    Ok(response)
}

/// Encode a response body
pub fn encode_response(response: &IndexResponse) -> Result<String, WireError> {
    serde_json::to_string(response).map_err(|e| WireError::Encode(e.to_string()))
}
