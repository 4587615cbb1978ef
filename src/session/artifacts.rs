//! Normalization of raw extraction payloads into artifact records.
//!
//! The backend returns two parallel collections of 3-element string tuples
//! `[dataUrl, renderUrl, description]`. Normalization is all-or-nothing: one
//! malformed tuple fails the whole payload so a partial artifact list is
//! never exposed.

use crate::backend::ExtractionPayload;
use crate::session::types::{ArtifactKind, ExtractedArtifact};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while validating extraction tuples.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Collection entry was not a JSON array.
    #[error("{collection}[{index}] is not an array")]
    NotATuple {
        /// Name of the offending collection (`csvs` or `images`).
        collection: &'static str,
        /// Index of the entry within the collection.
        index: usize,
    },
    /// Tuple did not carry exactly three elements.
    #[error("{collection}[{index}] has {arity} elements, expected 3")]
    WrongArity {
        /// Name of the offending collection (`csvs` or `images`).
        collection: &'static str,
        /// Index of the entry within the collection.
        index: usize,
        /// Number of elements actually present.
        arity: usize,
    },
    /// Tuple element was not a string.
    #[error("{collection}[{index}] element {position} is not a string")]
    NonString {
        /// Name of the offending collection (`csvs` or `images`).
        collection: &'static str,
        /// Index of the entry within the collection.
        index: usize,
        /// Position of the non-string element within the tuple.
        position: usize,
    },
}

/// Map a raw extraction payload into a single ordered artifact list.
///
/// Tables come first in `csvs` order, then charts in `images` order; each
/// collection's relative order is preserved exactly. Empty collections yield
/// an empty list.
pub fn normalize_extraction(
    payload: &ExtractionPayload,
) -> Result<Vec<ExtractedArtifact>, NormalizeError> {
    let mut artifacts = normalize_collection("csvs", &payload.csvs, ArtifactKind::Table)?;
    artifacts.extend(normalize_collection(
        "images",
        &payload.images,
        ArtifactKind::Chart,
    )?);
    Ok(artifacts)
}

fn normalize_collection(
    collection: &'static str,
    entries: &[Value],
    kind: ArtifactKind,
) -> Result<Vec<ExtractedArtifact>, NormalizeError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| normalize_tuple(collection, index, entry, kind))
        .collect()
}

fn normalize_tuple(
    collection: &'static str,
    index: usize,
    entry: &Value,
    kind: ArtifactKind,
) -> Result<ExtractedArtifact, NormalizeError> {
    let tuple = entry
        .as_array()
        .ok_or(NormalizeError::NotATuple { collection, index })?;
    if tuple.len() != 3 {
        return Err(NormalizeError::WrongArity {
            collection,
            index,
            arity: tuple.len(),
        });
    }

    let field = |position: usize| {
        tuple[position]
            .as_str()
            .ok_or(NormalizeError::NonString {
                collection,
                index,
                position,
            })
            .map(str::to_string)
    };

    Ok(ExtractedArtifact {
        kind,
        data_url: optional_reference(field(0)?),
        render_url: optional_reference(field(1)?),
        description: field(2)?,
    })
}

/// Empty or blank references mean "no resource", matching how renderers skip
/// empty URL strings.
fn optional_reference(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(csvs: Value, images: Value) -> ExtractionPayload {
        serde_json::from_value(json!({ "csvs": csvs, "images": images })).expect("payload")
    }

    #[test]
    fn maps_collections_to_kinds_preserving_order() {
        let payload = payload(
            json!([["c1", "r1", "first table"], ["c2", "r2", "second table"]]),
            json!([["c3", "r3", "a chart"]]),
        );

        let artifacts = normalize_extraction(&payload).expect("normalization");
        assert_eq!(artifacts.len(), 3);
        assert_eq!(artifacts[0].kind, ArtifactKind::Table);
        assert_eq!(artifacts[0].data_url.as_deref(), Some("c1"));
        assert_eq!(artifacts[0].render_url.as_deref(), Some("r1"));
        assert_eq!(artifacts[0].description, "first table");
        assert_eq!(artifacts[1].data_url.as_deref(), Some("c2"));
        assert_eq!(artifacts[2].kind, ArtifactKind::Chart);
        assert_eq!(artifacts[2].description, "a chart");
    }

    #[test]
    fn empty_collections_yield_empty_list() {
        let payload = ExtractionPayload::default();
        let artifacts = normalize_extraction(&payload).expect("normalization");
        assert!(artifacts.is_empty());
    }

    #[test]
    fn blank_references_become_none() {
        let payload = payload(json!([["", "  ", "caption only"]]), json!([]));
        let artifacts = normalize_extraction(&payload).expect("normalization");
        assert_eq!(artifacts.len(), 1);
        assert!(artifacts[0].data_url.is_none());
        assert!(artifacts[0].render_url.is_none());
        assert_eq!(artifacts[0].description, "caption only");
    }

    #[test]
    fn wrong_arity_fails_the_whole_payload() {
        let payload = payload(
            json!([["c1", "r1", "ok"], ["c2", "r2"]]),
            json!([["c3", "r3", "fine"]]),
        );
        let error = normalize_extraction(&payload).expect_err("arity violation");
        match error {
            NormalizeError::WrongArity {
                collection,
                index,
                arity,
            } => {
                assert_eq!(collection, "csvs");
                assert_eq!(index, 1);
                assert_eq!(arity, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_string_element_fails_the_whole_payload() {
        let payload = payload(json!([]), json!([["c1", 42, "desc"]]));
        let error = normalize_extraction(&payload).expect_err("type violation");
        assert!(matches!(
            error,
            NormalizeError::NonString {
                collection: "images",
                index: 0,
                position: 1,
            }
        ));
    }

    #[test]
    fn non_array_entry_is_rejected() {
        let payload = payload(json!(["not-a-tuple"]), json!([]));
        let error = normalize_extraction(&payload).expect_err("shape violation");
        assert!(matches!(
            error,
            NormalizeError::NotATuple {
                collection: "csvs",
                index: 0,
            }
        ));
    }
}
