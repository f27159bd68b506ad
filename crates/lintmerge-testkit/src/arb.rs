//! Proptest strategies for lintmerge inputs.
//!
//! Generated issues are shaped like normalizer output (tool-prefixed
//! descriptions, relative paths, 1-based lines) but their fingerprints are
//! arbitrary hex; use the domain crate when the hash itself matters.

use lintmerge_types::{
    Category, ISSUE_TYPE, Issue, LastPolicy, Location, Positions, Severity, Tool,
};
use proptest::prelude::*;

/// Maximum path depth of generated relative paths
pub const MAX_PATH_DEPTH: usize = 4;

/// Maximum line number of generated positions
pub const MAX_LINE: u32 = 10_000;

pub fn arb_severity() -> impl Strategy<Value = Severity> {
    prop::sample::select(Severity::ALL.to_vec())
}

pub fn arb_tool() -> impl Strategy<Value = Tool> {
    prop::sample::select(Tool::ALL.to_vec())
}

pub fn arb_last_policy() -> impl Strategy<Value = LastPolicy> {
    prop_oneof![
        Just(LastPolicy::Never),
        Just(LastPolicy::Always),
        Just(LastPolicy::Single),
    ]
}

/// Relative paths like `src/a_1/b.php`.
pub fn arb_rel_path() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(
            prop::string::string_regex("[a-z][a-z0-9_]{0,8}").expect("valid regex"),
            1..MAX_PATH_DEPTH,
        ),
        prop::sample::select(vec!["php", "js", "ts", "css"]),
    )
        .prop_map(|(parts, ext)| format!("{}.{ext}", parts.join("/")))
}

fn arb_rule() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,6}(-[a-z]{1,6}){0,2}").expect("valid regex")
}

pub fn arb_positions() -> impl Strategy<Value = Positions> {
    (
        1u32..MAX_LINE,
        prop::option::of(1u32..200),
        prop::option::of(0u32..20),
        prop::option::of(1u32..200),
    )
        .prop_map(|(line, col, extra, end_col)| {
            Positions::new(line, col, extra.map(|e| line + e), end_col)
        })
}

/// A normalized-looking issue from a random tool.
pub fn arb_issue() -> impl Strategy<Value = Issue> {
    (
        arb_tool(),
        arb_rule(),
        "[A-Za-z ]{1,30}",
        arb_severity(),
        arb_rel_path(),
        arb_positions(),
        "[0-9a-f]{40}",
    )
        .prop_map(|(tool, rule, message, severity, path, positions, fingerprint)| {
            let display = tool.display_name();
            Issue {
                kind: ISSUE_TYPE.to_string(),
                check_name: format!("{display}: {rule}"),
                description: format!("{display}: {message}"),
                categories: Category::DEFAULT_SET.to_vec(),
                severity,
                location: Location {
                    full_path: format!("/work/{path}"),
                    path,
                    positions,
                },
                fingerprint,
            }
        })
}
