//! Source spans of `nodes` and `edges` elements.
//!
//! `serde_json` does not report where values came from, so once a payload
//! is known to be valid JSON it is scanned a second time to find the byte
//! range of every element of the top-level `nodes` and `edges` arrays.
//! Diagnostics about an element then point at the element itself.

use std::ops::Range;

use log::debug;
use winnow::{
    Parser as _,
    ascii::multispace0,
    combinator::{alt, delimited, preceded, repeat, separated, terminated},
    error::ModalResult,
    stream::LocatingSlice,
    token::{any, none_of, take_while},
};

use crate::span::Span;

type Input<'a> = LocatingSlice<&'a str>;

/// A member of the top-level object: its raw key and, when the value is an
/// array, the ranges of its elements.
type Member<'a> = (&'a str, Option<Vec<Range<usize>>>);

/// Parse a string literal and return its raw contents, escapes untouched.
fn string<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    delimited(
        '"',
        repeat(
            0..,
            alt((preceded('\\', any).void(), none_of(['"', '\\']).void())),
        )
        .map(|()| ())
        .take(),
        '"',
    )
    .parse_next(input)
}

/// Parse a number, `true`, `false` or `null`.
fn scalar(input: &mut Input<'_>) -> ModalResult<()> {
    take_while(1.., |c: char| {
        c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')
    })
    .void()
    .parse_next(input)
}

fn value(input: &mut Input<'_>) -> ModalResult<()> {
    alt((string.void(), array.void(), object, scalar)).parse_next(input)
}

/// Parse an array and return the range of each element.
fn array(input: &mut Input<'_>) -> ModalResult<Vec<Range<usize>>> {
    delimited(
        ('[', multispace0),
        separated(0.., value.span(), (multispace0, ',', multispace0)),
        (multispace0, ']'),
    )
    .parse_next(input)
}

fn member(input: &mut Input<'_>) -> ModalResult<()> {
    (string, multispace0, ':', multispace0, value)
        .void()
        .parse_next(input)
}

fn object(input: &mut Input<'_>) -> ModalResult<()> {
    delimited(
        ('{', multispace0),
        separated(0.., member, (multispace0, ',', multispace0)).map(|()| ()),
        (multispace0, '}'),
    )
    .parse_next(input)
}

fn top_member<'a>(input: &mut Input<'a>) -> ModalResult<Member<'a>> {
    (
        terminated(string, (multispace0, ':', multispace0)),
        alt((array.map(Some), value.map(|()| None))),
    )
        .parse_next(input)
}

fn document<'a>(input: &mut Input<'a>) -> ModalResult<Vec<Member<'a>>> {
    delimited(
        (multispace0, '{', multispace0),
        separated(0.., top_member, (multispace0, ',', multispace0)),
        (multispace0, '}'),
    )
    .parse_next(input)
}

/// Spans of the elements of a payload.
#[derive(Debug, Default)]
pub(crate) struct ElementSpans {
    payload: Span,
    nodes: Vec<Span>,
    edges: Vec<Span>,
}

impl ElementSpans {
    /// Scans the payload at `payload` within `source`.
    ///
    /// When the payload cannot be scanned, every element span falls back to
    /// the whole payload.
    pub(crate) fn scan(source: &str, payload: Span) -> Self {
        let mut spans = Self {
            payload,
            ..Self::default()
        };

        let mut input = LocatingSlice::new(&source[payload.range()]);
        let Ok(members) = document.parse_next(&mut input) else {
            debug!(payload_len = payload.len(); "Could not locate payload elements");
            return spans;
        };

        let to_spans = |ranges: Vec<Range<usize>>| {
            ranges
                .into_iter()
                .map(|range| Span::new(range).offset_by(payload.start()))
                .collect()
        };
        for (key, ranges) in members {
            match (key, ranges) {
                ("nodes", Some(ranges)) => spans.nodes = to_spans(ranges),
                ("edges", Some(ranges)) => spans.edges = to_spans(ranges),
                _ => {}
            }
        }

        spans
    }

    /// The span of the whole payload.
    pub(crate) fn payload(&self) -> Span {
        self.payload
    }

    /// The span of `nodes[index]`.
    pub(crate) fn node(&self, index: usize) -> Span {
        self.nodes.get(index).copied().unwrap_or(self.payload)
    }

    /// The span of `edges[index]`.
    pub(crate) fn edge(&self, index: usize) -> Span {
        self.edges.get(index).copied().unwrap_or(self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> ElementSpans {
        ElementSpans::scan(source, Span::new(0..source.len()))
    }

    #[test]
    fn test_string_handles_escapes() {
        let mut input = LocatingSlice::new(r#""a\"b" rest"#);
        assert_eq!(string(&mut input).unwrap(), r#"a\"b"#);
    }

    #[test]
    fn test_element_spans() {
        let source = r#"{"nodes": [{"id": "1"}, {"id": "2", "label": "x"}], "edges": [{"source": "1", "target": "2"}]}"#;
        let spans = scan(source);

        assert_eq!(&source[spans.node(0).range()], r#"{"id": "1"}"#);
        assert_eq!(&source[spans.node(1).range()], r#"{"id": "2", "label": "x"}"#);
        assert_eq!(
            &source[spans.edge(0).range()],
            r#"{"source": "1", "target": "2"}"#
        );
    }

    #[test]
    fn test_nested_values_and_whitespace() {
        let source = "{\n  \"title\": {\"a\": [1, 2.5e3, null]},\n  \"nodes\": [\n    {\"id\": 7, \"meta\": {\"x\": [true, false]}}\n  ],\n  \"edges\": []\n}";
        let spans = scan(source);

        assert_eq!(
            &source[spans.node(0).range()],
            "{\"id\": 7, \"meta\": {\"x\": [true, false]}}"
        );
        assert_eq!(spans.edge(0), spans.payload());
    }

    #[test]
    fn test_spans_are_offset_into_source() {
        let source = "```json\n{\"nodes\": [{\"id\": \"1\"}], \"edges\": []}\n```";
        let payload = Span::new(8..source.len() - 4);
        let spans = ElementSpans::scan(source, payload);

        assert_eq!(&source[spans.node(0).range()], "{\"id\": \"1\"}");
    }

    #[test]
    fn test_missing_element_falls_back_to_payload() {
        let spans = scan(r#"[1, 2, 3]"#);
        assert_eq!(spans.node(0), spans.payload());
        assert_eq!(spans.edge(5), spans.payload());
    }
}
