//! Feeds arbitrary text to every report parser. Parsers may reject input but
//! must never panic.

#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;

use lintmerge_parsers::{ParseContext, ToolParser};

const PARSERS: [ToolParser; 9] = [
    ToolParser::Phpstan,
    ToolParser::Psalm,
    ToolParser::PhpCsFixer,
    ToolParser::Phpcs,
    ToolParser::Stylelint,
    ToolParser::ParallelLint,
    ToolParser::Eslint,
    ToolParser::BiomeAnnotations,
    ToolParser::BiomeJson,
];

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    // A directory that does not exist, so Biome never reads real files.
    let ctx = ParseContext {
        working_dir: Path::new("/nonexistent/lintmerge-fuzz"),
        exit_code: Some(1),
    };
    for parser in PARSERS {
        let _ = parser.parse(&text, &ctx);
    }
});
