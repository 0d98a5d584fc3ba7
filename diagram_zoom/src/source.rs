// Copyright 2025 the Diagram Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Best-effort capture of the fenced block a diagram was rendered from.

use std::sync::LazyLock;

use regex::Regex;

use crate::host::SectionInfo;

/// Source text recorded when a live-edit block cannot be matched.
pub const NO_SOURCE: &str = "No source";

/// Opening fence (with info string), optional lazily captured body, closing
/// fence. An empty block closes on the line after its opening fence.
static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(?:```+|~~~+)[^\n]*\n(?:(.*?)\n)??[ \t]*(?:```+|~~~+)")
        .expect("fenced block pattern is valid")
});

/// Source text and zero-based inclusive line range of a diagram block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceCapture {
    /// Block body without the fences.
    pub text: String,
    /// First line of the block.
    pub line_start: usize,
    /// Last line of the block.
    pub line_end: usize,
}

/// Captures a preview section. The fence lines, if present, are dropped.
pub(crate) fn from_section(info: &SectionInfo) -> SourceCapture {
    let lines: Vec<&str> = info.text.lines().collect();
    let mut body = lines
        .get(info.line_start..=info.line_end)
        .unwrap_or_default();
    if body.first().is_some_and(|l| is_fence(l)) {
        body = &body[1..];
    }
    if body.last().is_some_and(|l| is_fence(l)) {
        body = &body[..body.len() - 1];
    }
    SourceCapture {
        text: body.join("\n"),
        line_start: info.line_start,
        line_end: info.line_end.max(info.line_start),
    }
}

/// Captures the first fenced block at or after `offset` in editor text.
///
/// Returns `None` if `offset` does not point into `text`. A missing or
/// malformed fence is not a failure: the capture then holds [`NO_SOURCE`]
/// and a single-line range at `offset`.
pub(crate) fn from_editor(text: &str, offset: usize) -> Option<SourceCapture> {
    let rest = text.get(offset..)?;
    let line_start = line_of(text, offset);
    let Some(caps) = FENCED_BLOCK.captures(rest) else {
        return Some(SourceCapture {
            text: NO_SOURCE.to_owned(),
            line_start,
            line_end: line_start,
        });
    };
    let whole = caps.get(0)?;
    let start = offset + whole.start();
    let line_start = line_of(text, start);
    Some(SourceCapture {
        text: caps.get(1).map_or("", |m| m.as_str()).to_owned(),
        line_start,
        line_end: line_start + whole.as_str().matches('\n').count(),
    })
}

fn is_fence(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with("```") || line.starts_with("~~~")
}

fn line_of(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTE: &str = "# Title\n\n```mermaid\ngraph TD\n  A --> B\n```\n\ntext\n";

    #[test]
    fn section_drops_fences() {
        let info = SectionInfo {
            text: NOTE.to_owned(),
            line_start: 2,
            line_end: 5,
        };
        let capture = from_section(&info);
        assert_eq!(capture.text, "graph TD\n  A --> B");
        assert_eq!((capture.line_start, capture.line_end), (2, 5));
    }

    #[test]
    fn section_out_of_range_is_empty() {
        let info = SectionInfo {
            text: NOTE.to_owned(),
            line_start: 40,
            line_end: 42,
        };
        assert_eq!(from_section(&info).text, "");
    }

    #[test]
    fn editor_finds_block_at_offset() {
        let offset = NOTE.find("```").unwrap();
        let capture = from_editor(NOTE, offset).unwrap();
        assert_eq!(capture.text, "graph TD\n  A --> B");
        assert_eq!((capture.line_start, capture.line_end), (2, 5));
    }

    #[test]
    fn editor_skips_to_next_block() {
        let capture = from_editor(NOTE, 0).unwrap();
        assert_eq!(capture.line_start, 2);
    }

    #[test]
    fn empty_block_does_not_swallow_the_next_one() {
        let text = "```mermaid\n```\n\ntext\n```dot\ndigraph {}\n```\n";
        let capture = from_editor(text, 0).unwrap();
        assert_eq!(capture.text, "");
        assert_eq!((capture.line_start, capture.line_end), (0, 1));

        let next = from_editor(text, text.find("```dot").unwrap()).unwrap();
        assert_eq!(next.text, "digraph {}");
        assert_eq!((next.line_start, next.line_end), (4, 6));
    }

    #[test]
    fn tilde_fences_are_accepted() {
        let text = "~~~dot\ndigraph { a -> b }\n~~~\n";
        let capture = from_editor(text, 0).unwrap();
        assert_eq!(capture.text, "digraph { a -> b }");
        assert_eq!((capture.line_start, capture.line_end), (0, 2));
    }

    #[test]
    fn unterminated_block_falls_back() {
        let text = "before\n```mermaid\ngraph TD\n";
        let capture = from_editor(text, 7).unwrap();
        assert_eq!(capture.text, NO_SOURCE);
        assert_eq!((capture.line_start, capture.line_end), (1, 1));
    }

    #[test]
    fn offset_outside_text_is_no_context() {
        assert_eq!(from_editor("abc", 10), None);
        // Inside a multi-byte character.
        assert_eq!(from_editor("é", 1), None);
    }
}
