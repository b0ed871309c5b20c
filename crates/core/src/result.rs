//! Result sets produced by executors
//!
//! Result sets are built once per query and consumed once. A [`ResultSet`]
//! never holds the same [`EntityRef`] twice: construction keeps the first
//! occurrence and drops the rest.

use crate::types::{EntityRef, TxnId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// A property value carried alongside a result for sorting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// Text
    Text(String),
}

impl FieldValue {
    fn type_rank(&self) -> u8 {
        match self {
            FieldValue::Bool(_) => 0,
            FieldValue::Int(_) | FieldValue::Float(_) => 1,
            FieldValue::Text(_) => 2,
        }
    }

    /// Total order: numbers compare numerically across Int/Float; otherwise
    /// values of different kinds order by kind (bool < number < text)
    pub fn total_cmp(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.total_cmp(b),
            (FieldValue::Int(a), FieldValue::Float(b)) => (*a as f64).total_cmp(b),
            (FieldValue::Float(a), FieldValue::Int(b)) => a.total_cmp(&(*b as f64)),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        FieldValue::Float(x)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// One row of a result set
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEntry {
    /// Matched entity
    pub entity: EntityRef,
    /// Relevance score
    pub score: f32,
    /// Sort-relevant property values, keyed by field name
    pub fields: BTreeMap<String, FieldValue>,
}

impl ResultEntry {
    /// Create an entry with no sort fields
    pub fn new(entity: impl Into<EntityRef>, score: f32) -> Self {
        ResultEntry {
            entity: entity.into(),
            score,
            fields: BTreeMap::new(),
        }
    }

    /// Builder: attach a sort field value
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// One bucket of a field facet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    /// Field value
    pub value: String,
    /// Matches carrying that value
    pub count: u64,
}

impl FacetCount {
    /// Create a bucket
    pub fn new(value: impl Into<String>, count: u64) -> Self {
        FacetCount {
            value: value.into(),
            count,
        }
    }
}

/// Ordered, duplicate-free results of one query
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    entries: Vec<ResultEntry>,
    total_found: u64,
    has_more: bool,
    last_indexed_txid: Option<TxnId>,
    facets: BTreeMap<String, Vec<FacetCount>>,
}

impl ResultSet {
    /// Build a result set, dropping repeated entity references (first wins)
    pub fn new(entries: Vec<ResultEntry>, total_found: u64, has_more: bool) -> Self {
        let mut seen = HashSet::with_capacity(entries.len());
        let entries = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.entity.clone()))
            .collect();
        ResultSet {
            entries,
            total_found,
            has_more,
            last_indexed_txid: None,
            facets: BTreeMap::new(),
        }
    }

    /// Result set with nothing in it
    pub fn empty() -> Self {
        ResultSet::new(vec![], 0, false)
    }

    /// Builder: record the index watermark this set reflects
    pub fn with_watermark(mut self, txid: TxnId) -> Self {
        self.last_indexed_txid = Some(txid);
        self
    }

    /// Builder: attach facet buckets keyed by field
    pub fn with_facets(mut self, facets: BTreeMap<String, Vec<FacetCount>>) -> Self {
        self.facets = facets;
        self
    }

    /// Facet buckets keyed by field; empty unless facets were requested
    pub fn facets(&self) -> &BTreeMap<String, Vec<FacetCount>> {
        &self.facets
    }

    /// Entries in result order
    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    /// Entity references in result order
    pub fn entity_refs(&self) -> Vec<&EntityRef> {
        self.entries.iter().map(|e| &e.entity).collect()
    }

    /// Number of entries held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are held
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total matches the backend reported (may exceed `len()`)
    pub fn total_found(&self) -> u64 {
        self.total_found
    }

    /// Whether the backend holds more matches past this page
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Newest transaction reflected by the index snapshot, if index-sourced
    pub fn last_indexed_txid(&self) -> Option<TxnId> {
        self.last_indexed_txid
    }

    /// Consume the set, yielding its entries
    pub fn into_entries(self) -> Vec<ResultEntry> {
        self.entries
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultEntry;
    type IntoIter = std::vec::IntoIter<ResultEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// An entity touched after some watermark, with its latest transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangedEntity {
    /// Entity that was written or deleted
    pub entity: EntityRef,
    /// Transaction that last mutated it
    pub txn_id: TxnId,
}

impl ChangedEntity {
    /// Create a change record
    pub fn new(entity: impl Into<EntityRef>, txn_id: TxnId) -> Self {
        ChangedEntity {
            entity: entity.into(),
            txn_id,
        }
    }
}
