//! Extraction of the JSON payload from assistant output.
//!
//! Language models often wrap JSON in a Markdown code fence, sometimes emit
//! only the closing marker, and add a sentence before or after the payload.
//! A fence marker counts only at the start of a line, so backticks inside a
//! JSON string are left alone.
//!
//! The payload is chosen in this order:
//!
//! 1. the text before the first marker, when it opens with `{` or `[`
//!    (a trailing marker only);
//! 2. the body of the first fenced block, when it opens with `{` or `[`;
//! 3. the text before the first marker, from its first line that opens
//!    with `{` or `[` (prose, JSON, then a stray marker);
//! 4. the body of the first fenced block.
//!
//! Without any marker the whole text is the payload.

use std::ops::Range;

use winnow::{
    Parser as _,
    error::ModalResult,
    stream::LocatingSlice,
    token::{literal, take_while},
};

use crate::span::Span;

const FENCE: &str = "```";

type Input<'a> = LocatingSlice<&'a str>;

/// A fence marker found at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Marker {
    /// Offset of the line holding the marker.
    line: usize,
    /// Offset just past the marker and its info string.
    body: usize,
}

/// Parses indentation, a fence and its info string (`json`, `JSON`, ...),
/// returning the offset just past them.
fn fence_marker(input: &mut Input<'_>) -> ModalResult<usize> {
    (
        take_while(0.., [' ', '\t']),
        literal(FENCE),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+')
        }),
    )
        .span()
        .map(|range| range.end)
        .parse_next(input)
}

fn line_starts(source: &str) -> impl Iterator<Item = usize> + '_ {
    std::iter::once(0).chain(source.match_indices('\n').map(|(at, _)| at + 1))
}

fn markers(source: &str) -> Vec<Marker> {
    line_starts(source)
        .filter_map(|line| {
            let mut input = LocatingSlice::new(&source[line..]);
            fence_marker(&mut input).ok().map(|end| Marker {
                line,
                body: line + end,
            })
        })
        .collect()
}

/// Returns the span of the payload within `source`, with surrounding
/// whitespace excluded.
pub(crate) fn payload_span(source: &str) -> Span {
    let markers = markers(source);
    let Some(open) = markers.first() else {
        return trim(source, 0..source.len());
    };

    let before = trim(source, 0..open.line);
    if opens_json(source, before) {
        return before;
    }

    let close = markers.get(1).map_or(source.len(), |marker| marker.line);
    let body = strip_inline_close(source, trim(source, open.body..close));
    if opens_json(source, body) {
        return body;
    }

    match json_line(source, 0..open.line) {
        Some(start) => trim(source, start..open.line),
        None => body,
    }
}

fn opens_json(source: &str, span: Span) -> bool {
    source[span.range()].starts_with(['{', '['])
}

/// Offset of the first `{` or `[` that opens a line within `range`.
fn json_line(source: &str, range: Range<usize>) -> Option<usize> {
    line_starts(source)
        .take_while(|&line| line < range.end)
        .filter(|&line| line >= range.start)
        .find_map(|line| {
            let text = &source[line..range.end];
            let indent = text.len() - text.trim_start_matches([' ', '\t']).len();
            text[indent..]
                .starts_with(['{', '['])
                .then_some(line + indent)
        })
}

/// Drops a closing fence that shares the last line with the payload.
fn strip_inline_close(source: &str, span: Span) -> Span {
    if source[span.range()].ends_with(FENCE) {
        trim(source, span.start()..span.end() - FENCE.len())
    } else {
        span
    }
}

fn trim(source: &str, range: Range<usize>) -> Span {
    let body = &source[range.clone()];
    let start = range.start + (body.len() - body.trim_start().len());
    let end = range.end - (body.len() - body.trim_end().len());
    Span::new(start..end.max(start))
}
