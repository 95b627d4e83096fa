//! Response-shape recognition.
//!
//! Remote bodies arrive as one of three shapes, tried in a fixed order:
//! an envelope holding the domain's collection key, a `{ data: [...] }`
//! wrapper, or a bare array. Anything else is a shape mismatch.

use pagination::{PageEnvelope, PageRequest};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::domain::ports::SearchSourceError;

/// Paging metadata reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Paging {
    #[serde(default)]
    total: Option<u64>,
    #[serde(default, alias = "pages")]
    total_pages: Option<u32>,
    #[serde(default, alias = "page")]
    current_page: Option<u32>,
}

impl Paging {
    const fn is_present(&self) -> bool {
        self.total.is_some() || self.total_pages.is_some()
    }
}

/// One recognised response body.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum ResponseShape<T> {
    /// `{ success?, <collection>: [...], pagination?: {...} }`.
    Enveloped { items: Vec<T>, paging: Paging },
    /// `{ data: [...], ... }`.
    Wrapped { data: Vec<T>, paging: Paging },
    /// `[...]`.
    Array(Vec<T>),
}

impl<T> ResponseShape<T> {
    /// Recognise `body`, decoding every element as `T`.
    pub(super) fn parse(body: Value, collection_key: &str) -> Result<Self, SearchSourceError>
    where
        T: DeserializeOwned,
    {
        match body {
            Value::Object(mut object) => {
                if let Some(Value::Bool(false)) = object.get("success") {
                    return Err(SearchSourceError::shape_mismatch(
                        "backend reported success: false",
                    ));
                }
                if let Some(Value::Array(raw)) = object.remove(collection_key) {
                    let paging = paging(&object)?;
                    return Ok(Self::Enveloped {
                        items: decode_items(raw, collection_key)?,
                        paging,
                    });
                }
                if let Some(Value::Array(raw)) = object.remove("data") {
                    let paging = paging(&object)?;
                    return Ok(Self::Wrapped {
                        data: decode_items(raw, "data")?,
                        paging,
                    });
                }
                Err(SearchSourceError::shape_mismatch(format!(
                    "object has neither `{collection_key}` nor `data` array"
                )))
            }
            Value::Array(raw) => Ok(Self::Array(decode_items(raw, "array")?)),
            other => Err(SearchSourceError::shape_mismatch(format!(
                "unexpected JSON {}",
                json_kind(&other)
            ))),
        }
    }

    /// Decoded items, discarding paging metadata.
    pub(super) fn into_items(self) -> Vec<T> {
        match self {
            Self::Enveloped { items, .. } => items,
            Self::Wrapped { data, .. } => data,
            Self::Array(items) => items,
        }
    }

    /// Map into a canonical envelope for `request`.
    ///
    /// Reported metadata is trusted; a body without metadata is treated as
    /// the complete match set and paginated locally.
    pub(super) fn into_envelope(self, request: PageRequest) -> PageEnvelope<T> {
        let (items, paging) = match self {
            Self::Enveloped { items, paging } => (items, paging),
            Self::Wrapped { data, paging } => (data, paging),
            Self::Array(items) => (items, Paging::default()),
        };
        if !paging.is_present() {
            return PageEnvelope::paginate(items, request);
        }

        let mut items = items;
        items.truncate(usize::try_from(request.limit()).unwrap_or(usize::MAX));
        let total = paging
            .total
            .unwrap_or_else(|| u64::try_from(items.len()).unwrap_or(u64::MAX));
        let total_pages = paging
            .total_pages
            .unwrap_or_else(|| PageEnvelope::<T>::pages_for(total, request.limit()));
        let current_page = paging.current_page.unwrap_or(request.page());
        PageEnvelope::new(items, total, total_pages, current_page)
    }
}

fn paging(object: &Map<String, Value>) -> Result<Paging, SearchSourceError> {
    let source = match object.get("pagination") {
        Some(Value::Object(nested)) => nested,
        _ => object,
    };
    let metadata = Value::Object(
        [
            ("total", first_of(source, &["total"])),
            ("totalPages", first_of(source, &["totalPages", "pages"])),
            ("currentPage", first_of(source, &["currentPage", "page"])),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key.to_owned(), value)))
        .collect(),
    );
    serde_json::from_value(metadata).map_err(|error| {
        SearchSourceError::shape_mismatch(format!("invalid pagination metadata: {error}"))
    })
}

fn first_of(source: &Map<String, Value>, keys: &[&str]) -> Option<Value> {
    keys.iter().find_map(|key| source.get(*key)).cloned()
}

fn decode_items<T: DeserializeOwned>(
    raw: Vec<Value>,
    location: &str,
) -> Result<Vec<T>, SearchSourceError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value).map_err(|error| {
                SearchSourceError::shape_mismatch(format!(
                    "element {index} of `{location}` did not decode: {error}"
                ))
            })
        })
        .collect()
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[derive(Debug, PartialEq, Eq, Deserialize)]
    struct Row {
        id: u32,
    }

    fn rows(count: u32) -> Vec<Value> {
        (1..=count).map(|id| json!({ "id": id })).collect()
    }

    fn page(page: u32, limit: u32) -> PageRequest {
        PageRequest::new(page, limit).expect("valid page request")
    }

    #[test]
    fn collection_key_wins_over_data() {
        let body = json!({ "success": true, "guides": rows(1), "data": rows(2) });
        let shape = ResponseShape::<Row>::parse(body, "guides").expect("shape parses");
        assert!(matches!(shape, ResponseShape::Enveloped { ref items, .. } if items.len() == 1));
    }

    #[rstest]
    #[case::wrapped(json!({ "data": rows(2) }))]
    #[case::array(Value::Array(rows(2)))]
    fn fallback_shapes_are_recognised(#[case] body: Value) {
        let items = ResponseShape::<Row>::parse(body, "users")
            .expect("shape parses")
            .into_items();
        assert_eq!(items, vec![Row { id: 1 }, Row { id: 2 }]);
    }

    #[rstest]
    #[case::explicit_failure(json!({ "success": false, "users": [] }))]
    #[case::unknown_key(json!({ "results": [] }))]
    #[case::scalar(json!("nope"))]
    #[case::bad_element(json!([{ "id": "not-a-number" }]))]
    fn unrecognised_bodies_are_shape_mismatches(#[case] body: Value) {
        let error = ResponseShape::<Row>::parse(body, "users").expect_err("shape must fail");
        assert!(matches!(error, SearchSourceError::ShapeMismatch { .. }));
    }

    #[test]
    fn nested_pagination_is_trusted() {
        let body = json!({
            "users": rows(3),
            "pagination": { "total": 23, "totalPages": 3, "currentPage": 2 }
        });
        let envelope = ResponseShape::<Row>::parse(body, "users")
            .expect("shape parses")
            .into_envelope(page(2, 10));
        assert_eq!(envelope.total(), 23);
        assert_eq!(envelope.total_pages(), 3);
        assert_eq!(envelope.current_page(), 2);
        assert_eq!(envelope.items().len(), 3);
    }

    #[test]
    fn top_level_aliases_are_read() {
        let body = json!({ "guides": rows(2), "total": 12, "pages": 2, "page": 1 });
        let envelope = ResponseShape::<Row>::parse(body, "guides")
            .expect("shape parses")
            .into_envelope(page(1, 10));
        assert_eq!(envelope.total(), 12);
        assert_eq!(envelope.total_pages(), 2);
    }

    #[test]
    fn total_without_pages_derives_page_count() {
        let body = json!({ "posts": rows(10), "pagination": { "total": 25 } });
        let envelope = ResponseShape::<Row>::parse(body, "posts")
            .expect("shape parses")
            .into_envelope(page(1, 10));
        assert_eq!(envelope.total_pages(), 3);
        assert_eq!(envelope.current_page(), 1);
    }

    #[test]
    fn bare_array_is_paginated_locally() {
        let envelope = ResponseShape::<Row>::parse(Value::Array(rows(25)), "games")
            .expect("shape parses")
            .into_envelope(page(3, 10));
        assert_eq!(envelope.total(), 25);
        assert_eq!(envelope.total_pages(), 3);
        assert_eq!(envelope.current_page(), 3);
        assert_eq!(envelope.items().first(), Some(&Row { id: 21 }));
    }

    #[test]
    fn oversized_pages_are_truncated_to_limit() {
        let body = json!({ "games": rows(15), "total": 15, "totalPages": 1 });
        let envelope = ResponseShape::<Row>::parse(body, "games")
            .expect("shape parses")
            .into_envelope(page(1, 10));
        assert_eq!(envelope.items().len(), 10);
    }
}
