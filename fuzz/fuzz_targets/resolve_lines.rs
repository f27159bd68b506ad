#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use lintmerge_domain::resolve_lines;

#[derive(Arbitrary, Debug)]
struct Input {
    source: String,
    start: Option<usize>,
    end: Option<usize>,
}

fuzz_target!(|input: Input| {
    let span = resolve_lines(&input.source, input.start, input.end);
    assert!(span.start_line >= 1);
    if let Some(end_line) = span.end_line {
        if input.start <= input.end {
            assert!(span.start_line <= end_line);
        }
    }
});
