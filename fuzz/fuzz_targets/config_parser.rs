//! Fuzz target for config file parsing.
//!
//! Any text either fails to parse or yields a config that survives a
//! serialize/parse cycle unchanged.

#![no_main]

use libfuzzer_sys::fuzz_target;

use lintmerge_types::ConfigFile;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(cfg) = toml::from_str::<ConfigFile>(text) else {
        return;
    };
    let rendered = toml::to_string(&cfg).expect("parsed config serializes");
    let again: ConfigFile = toml::from_str(&rendered).expect("rendered config parses");
    assert_eq!(cfg, again);
});
