//! Raw record query contract and an in-process implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::VitalsError;

/// A stored document: its id and JSON-decoded fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterOp {
    Equal,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    String(String),
    Integer(i64),
    Double(f64),
    Timestamp(DateTime<Utc>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub op: FilterOp,
    pub value: FilterValue,
}

/// Equality/range query over a single collection. Filters are AND-ed.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordQuery {
    pub collection: String,
    pub filters: Vec<FieldFilter>,
    pub limit: Option<u32>,
}

impl RecordQuery {
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            collection: name.into(),
            filters: Vec::new(),
            limit: None,
        }
    }

    pub fn filter(mut self, field: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        self.filters.push(FieldFilter {
            field: field.into(),
            op,
            value,
        });
        self
    }

    pub fn eq(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter(field, FilterOp::Equal, FilterValue::String(value.into()))
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    async fn query(&self, query: &RecordQuery) -> Result<Vec<Document>, VitalsError>;
}

/// Documents held in memory, keyed by collection. Also records every query it
/// served so callers can check which collections were touched.
#[derive(Default)]
pub struct InMemoryRecordStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    served: RwLock<Vec<RecordQuery>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, collection: &str, id: impl Into<String>, fields: Value) {
        let fields = match fields {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("value".into(), other);
                map
            }
        };
        let mut lock = self.collections.write().await;
        lock.entry(collection.to_string()).or_default().push(Document {
            id: id.into(),
            fields,
        });
    }

    pub async fn served_queries(&self) -> Vec<RecordQuery> {
        self.served.read().await.clone()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn query(&self, query: &RecordQuery) -> Result<Vec<Document>, VitalsError> {
        self.served.write().await.push(query.clone());
        let lock = self.collections.read().await;
        let Some(docs) = lock.get(&query.collection) else {
            return Ok(Vec::new());
        };
        let limit = query.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(docs
            .iter()
            .filter(|doc| query.filters.iter().all(|f| matches_filter(doc, f)))
            .take(limit)
            .cloned()
            .collect())
    }
}

fn matches_filter(doc: &Document, filter: &FieldFilter) -> bool {
    let Some(actual) = doc.fields.get(&filter.field) else {
        return false;
    };
    let ordering = match &filter.value {
        FilterValue::String(expected) => actual.as_str().map(|s| s.cmp(expected.as_str())),
        FilterValue::Integer(expected) => actual
            .as_f64()
            .and_then(|n| n.partial_cmp(&(*expected as f64))),
        FilterValue::Double(expected) => actual.as_f64().and_then(|n| n.partial_cmp(expected)),
        FilterValue::Timestamp(expected) => actual
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|ts| ts.with_timezone(&Utc).cmp(expected)),
    };
    let Some(ordering) = ordering else {
        return false;
    };
    match filter.op {
        FilterOp::Equal => ordering == Ordering::Equal,
        FilterOp::GreaterThanOrEqual => ordering != Ordering::Less,
        FilterOp::LessThan => ordering == Ordering::Less,
        FilterOp::LessThanOrEqual => ordering != Ordering::Greater,
    }
}
