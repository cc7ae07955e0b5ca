//! [`RecordStore`](crate::RecordStore) backed by the Firestore REST API.
//!
//! Queries are sent to the `documents:runQuery` endpoint as a
//! `structuredQuery`. Typed Firestore values in the response are flattened to
//! plain JSON (timestamps stay RFC 3339 strings, integers become numbers).

use async_trait::async_trait;
use chrono::SecondsFormat;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value, json};

use crate::{Document, FieldFilter, FilterOp, FilterValue, RecordQuery, RecordStore, VitalsError};

#[derive(Clone, Debug)]
pub struct FirestoreRecordStore {
    base_url: String,
    project_id: String,
    api_key: Option<SecretString>,
    client: reqwest::Client,
}

impl FirestoreRecordStore {
    pub fn new(base_url: &str, project_id: impl Into<String>, api_key: Option<SecretString>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn run_query_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents:runQuery",
            self.base_url, self.project_id
        )
    }
}

#[async_trait]
impl RecordStore for FirestoreRecordStore {
    async fn query(&self, query: &RecordQuery) -> Result<Vec<Document>, VitalsError> {
        let mut request = self
            .client
            .post(self.run_query_url())
            .json(&structured_query(query));
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.expose_secret())]);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let body_snippet: String = body.chars().take(256).collect();
            return Err(VitalsError::from_status(status.as_u16(), body_snippet));
        }

        let rows: Vec<Value> = resp.json().await?;
        tracing::debug!(collection = %query.collection, rows = rows.len(), "firestore runQuery");
        rows.iter()
            .filter_map(|row| row.get("document"))
            .map(decode_document)
            .collect()
    }
}

pub fn structured_query(query: &RecordQuery) -> Value {
    let mut sq = Map::new();
    sq.insert("from".into(), json!([{ "collectionId": query.collection }]));

    let mut filters: Vec<Value> = query.filters.iter().map(field_filter).collect();
    match filters.len() {
        0 => {}
        1 => {
            sq.insert("where".into(), filters.remove(0));
        }
        _ => {
            sq.insert(
                "where".into(),
                json!({ "compositeFilter": { "op": "AND", "filters": filters } }),
            );
        }
    }
    if let Some(limit) = query.limit {
        sq.insert("limit".into(), json!(limit));
    }
    json!({ "structuredQuery": Value::Object(sq) })
}

fn field_filter(filter: &FieldFilter) -> Value {
    let op = match filter.op {
        FilterOp::Equal => "EQUAL",
        FilterOp::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
        FilterOp::LessThan => "LESS_THAN",
        FilterOp::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
    };
    json!({
        "fieldFilter": {
            "field": { "fieldPath": filter.field },
            "op": op,
            "value": encode_value(&filter.value),
        }
    })
}

fn encode_value(value: &FilterValue) -> Value {
    match value {
        FilterValue::String(s) => json!({ "stringValue": s }),
        // Firestore carries int64 as a decimal string.
        FilterValue::Integer(i) => json!({ "integerValue": i.to_string() }),
        FilterValue::Double(d) => json!({ "doubleValue": d }),
        FilterValue::Timestamp(ts) => {
            json!({ "timestampValue": ts.to_rfc3339_opts(SecondsFormat::Secs, true) })
        }
    }
}

fn decode_document(doc: &Value) -> Result<Document, VitalsError> {
    let name = doc
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| VitalsError::Decode("document without name".into()))?;
    let id = name.rsplit('/').next().unwrap_or(name).to_string();

    let mut fields = Map::new();
    if let Some(raw) = doc.get("fields").and_then(Value::as_object) {
        for (k, v) in raw {
            fields.insert(k.clone(), decode_value(v)?);
        }
    }
    Ok(Document { id, fields })
}

/// Flatten one typed Firestore value (`{"stringValue": ...}` etc.) to JSON.
pub fn decode_value(value: &Value) -> Result<Value, VitalsError> {
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return Err(VitalsError::Decode(format!("not a typed value: {value}")));
    };
    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" | "doubleValue" | "stringValue" | "timestampValue" | "referenceValue" => {
            Ok(inner.clone())
        }
        "integerValue" => match inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(Value::from)
                .map_err(|e| VitalsError::Decode(format!("integerValue {s}: {e}"))),
            Value::Number(_) => Ok(inner.clone()),
            other => Err(VitalsError::Decode(format!("integerValue {other}"))),
        },
        "mapValue" => {
            let mut out = Map::new();
            if let Some(fields) = inner.get("fields").and_then(Value::as_object) {
                for (k, v) in fields {
                    out.insert(k.clone(), decode_value(v)?);
                }
            }
            Ok(Value::Object(out))
        }
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|vs| vs.iter().map(decode_value).collect::<Result<Vec<_>, _>>())
                .transpose()?
                .unwrap_or_default();
            Ok(Value::Array(values))
        }
        other => Err(VitalsError::Decode(format!("unsupported value type {other}"))),
    }
}
