//! Format and schema checks.
//!
//! The payload is decoded into a [`serde_json::Value`] first, then each
//! element of `nodes` and `edges` is deserialized on its own so that one
//! malformed element does not hide problems in the others.

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    locate::ElementSpans,
    span::Span,
};

/// A node or edge id as written by the model: `"3"` or `3`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Text(text) => write!(f, "{text}"),
            RawId::Signed(n) => write!(f, "{n}"),
            RawId::Unsigned(n) => write!(f, "{n}"),
        }
    }
}

impl RawId {
    fn is_blank(&self) -> bool {
        matches!(self, RawId::Text(text) if text.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawNode {
    pub id: RawId,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawEdge {
    #[serde(default)]
    pub id: Option<RawId>,
    pub source: RawId,
    pub target: RawId,
    #[serde(default)]
    pub label: Option<String>,
}

/// The schema-checked payload, elements in input order.
#[derive(Debug, Default)]
pub(crate) struct RawDocument {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
}

/// Decodes the payload as JSON.
pub(crate) fn decode(source: &str, payload: Span) -> Result<Value, Diagnostic> {
    let body = &source[payload.range()];
    serde_json::from_str(body).map_err(|err| {
        let at = offset_of(body, err.line(), err.column());
        let end = body
            .get(at..)
            .and_then(|rest| rest.chars().next())
            .map_or(at, |c| at + c.len_utf8());
        let span = Span::new(at..end).offset_by(payload.start());
        Diagnostic::error(format!("payload is not valid JSON: {err}"))
            .with_code(ErrorCode::E001)
            .with_label(span, ErrorCode::E001.description())
            .with_help("the flowchart must be a JSON object, optionally inside a ```json code fence")
    })
}

/// Converts a 1-based line and column reported by `serde_json` to a byte offset.
fn offset_of(body: &str, line: usize, column: usize) -> usize {
    let line_start: usize = body
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(body.len())
}

/// Checks the document shape and deserializes every element.
///
/// Every malformed element is reported before giving up.
pub(crate) fn check_schema(value: &Value, spans: &ElementSpans) -> Result<RawDocument, ParseError> {
    let Some(root) = value.as_object() else {
        return Err(
            Diagnostic::error(format!("expected a JSON object, found {}", describe(value)))
                .with_code(ErrorCode::E100)
                .with_label(spans.payload(), "not an object")
                .with_help(r#"expected `{"nodes": [...], "edges": [...]}`"#)
                .into(),
        );
    };

    let mut collector = DiagnosticCollector::new();
    let node_items = collection(root, "nodes", spans, &mut collector);
    let edge_items = collection(root, "edges", spans, &mut collector);

    let mut document = RawDocument::default();
    for (index, item) in node_items.into_iter().flatten().enumerate() {
        let span = spans.node(index);
        match RawNode::deserialize(item) {
            Ok(node) if node.id.is_blank() => collector.emit(blank_id("nodes", index, span)),
            Ok(node) => document.nodes.push(node),
            Err(err) => collector.emit(malformed("nodes", index, span, &err)),
        }
    }
    for (index, item) in edge_items.into_iter().flatten().enumerate() {
        let span = spans.edge(index);
        match RawEdge::deserialize(item) {
            Ok(edge) if edge.id.as_ref().is_some_and(RawId::is_blank) => {
                collector.emit(blank_id("edges", index, span))
            }
            Ok(edge) => document.edges.push(edge),
            Err(err) => collector.emit(malformed("edges", index, span, &err)),
        }
    }

    collector.finish().map(|_| document)
}

/// Looks up the array member `name`, reporting it when missing or not an array.
fn collection<'v>(
    root: &'v Map<String, Value>,
    name: &str,
    spans: &ElementSpans,
    collector: &mut DiagnosticCollector,
) -> Option<&'v Vec<Value>> {
    match root.get(name) {
        Some(Value::Array(items)) => Some(items),
        Some(other) => {
            collector.emit(
                Diagnostic::error(format!("`{name}` must be an array, found {}", describe(other)))
                    .with_code(ErrorCode::E100)
                    .with_label(spans.payload(), ErrorCode::E100.description()),
            );
            None
        }
        None => {
            collector.emit(
                Diagnostic::error(format!("missing `{name}` array"))
                    .with_code(ErrorCode::E100)
                    .with_label(spans.payload(), ErrorCode::E100.description())
                    .with_help(format!("add `\"{name}\": []` to the object")),
            );
            None
        }
    }
}

fn malformed(collection: &str, index: usize, span: Span, err: &serde_json::Error) -> Diagnostic {
    let help = if collection == "nodes" {
        r#"nodes look like `{"id": "1", "type": "process", "label": "Step"}`"#
    } else {
        r#"edges look like `{"id": "e1", "source": "1", "target": "2"}`"#
    };
    Diagnostic::error(format!("{collection}[{index}] is malformed: {err}"))
        .with_code(ErrorCode::E101)
        .with_label(span, ErrorCode::E101.description())
        .with_help(help)
}

fn blank_id(collection: &str, index: usize, span: Span) -> Diagnostic {
    Diagnostic::error(format!("{collection}[{index}] has an empty id"))
        .with_code(ErrorCode::E101)
        .with_label(span, "empty id")
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn check(value: Value) -> Result<RawDocument, Vec<Diagnostic>> {
        check_schema(&value, &ElementSpans::default()).map_err(|err| err.diagnostics().to_vec())
    }

    #[test]
    fn test_decode_reports_position() {
        let source = "{\n  \"nodes\": [,]\n}";
        let err = decode(source, Span::new(0..source.len())).unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::E001));
        let span = err.labels()[0].span();
        let second_line = source.find('\n').unwrap()..source.rfind('\n').unwrap();
        assert!(second_line.contains(&span.start()));
    }

    #[test]
    fn test_decode_empty_payload() {
        let err = decode("", Span::new(0..0)).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E001));
    }

    #[test]
    fn test_offset_of() {
        let body = "ab\ncd\nef";
        assert_eq!(offset_of(body, 1, 1), 0);
        assert_eq!(offset_of(body, 2, 2), 4);
        assert_eq!(offset_of(body, 3, 1), 6);
        assert_eq!(offset_of(body, 9, 9), body.len());
    }

    #[test]
    fn test_root_must_be_object() {
        let errs = check(json!([1, 2])).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code(), Some(ErrorCode::E100));
        assert!(errs[0].message().contains("an array"));
    }

    #[test]
    fn test_missing_collections() {
        let errs = check(json!({"nodes": []})).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message().contains("`edges`"));

        let errs = check(json!({"nodes": {}, "edges": "none"})).unwrap_err();
        assert_eq!(errs.len(), 2);
        assert!(errs.iter().all(|d| d.code() == Some(ErrorCode::E100)));
    }

    #[test]
    fn test_numeric_ids_are_accepted() {
        let doc = check(json!({
            "nodes": [{"id": 1, "label": "A"}, {"id": "2", "label": "B"}],
            "edges": [{"source": 1, "target": "2"}]
        }))
        .unwrap();

        assert_eq!(doc.nodes[0].id.to_string(), "1");
        assert_eq!(doc.edges[0].source, RawId::Signed(1));
        assert!(doc.edges[0].id.is_none());
    }

    #[test]
    fn test_malformed_elements_are_all_reported() {
        let errs = check(json!({
            "nodes": [{"label": "no id"}, {"id": 1.5, "label": "float id"}, {"id": "ok", "label": "fine"}],
            "edges": [{"id": "e1", "source": "ok"}]
        }))
        .unwrap_err();

        assert_eq!(errs.len(), 3);
        assert!(errs[0].message().starts_with("nodes[0] is malformed"));
        assert!(errs[1].message().starts_with("nodes[1] is malformed"));
        assert!(errs[2].message().starts_with("edges[0] is malformed"));
        assert!(errs.iter().all(|d| d.code() == Some(ErrorCode::E101)));
    }

    #[test]
    fn test_blank_id_is_rejected() {
        let errs = check(json!({"nodes": [{"id": "  ", "label": "x"}], "edges": []})).unwrap_err();
        assert_eq!(errs[0].message(), "nodes[0] has an empty id");
    }

    #[test]
    fn test_unknown_fields_and_nulls_are_ignored() {
        let doc = check(json!({
            "title": "Plan",
            "nodes": [{"id": "1", "label": "A", "detail": null, "position": {"x": 0}}],
            "edges": []
        }))
        .unwrap();

        assert_eq!(doc.nodes.len(), 1);
        assert!(doc.nodes[0].detail.is_none());
    }
}
