//! Byte-offset to line resolution.

/// Lines spanned by a byte range. Columns are never derived from offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    pub start_line: u32,
    /// `None` when the end could not be resolved.
    pub end_line: Option<u32>,
}

/// Resolves a `[start, end)` byte range in `source` to 1-based line numbers.
///
/// The scan runs from offset 0 to `end`, counting CRLF, lone CR and LF each as a
/// single terminator. The start line is the running count when the scan reaches
/// `start`. If either offset is missing the result is line 1 with an unknown end.
pub fn resolve_lines(source: &str, start: Option<usize>, end: Option<usize>) -> LineSpan {
    let (Some(start), Some(end)) = (start, end) else {
        return LineSpan {
            start_line: 1,
            end_line: None,
        };
    };

    let bytes = source.as_bytes();
    let stop = end.min(bytes.len());

    let mut line: u32 = 1;
    let mut start_line: Option<u32> = None;

    for (i, &b) in bytes[..stop].iter().enumerate() {
        if i == start {
            start_line = Some(line);
        }
        match b {
            b'\r' => line = line.saturating_add(1),
            // The LF of a CRLF pair was already counted at the CR.
            b'\n' if i > 0 && bytes[i - 1] == b'\r' => {}
            b'\n' => line = line.saturating_add(1),
            _ => {}
        }
    }

    LineSpan {
        start_line: start_line.unwrap_or(line),
        end_line: Some(line),
    }
}
