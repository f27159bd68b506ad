//! Property-based tests for lintmerge-types.

use lintmerge_types::{Defaults, LastPolicy, Positions, Severity};
use proptest::prelude::*;

// ============================================================================
// Proptest Strategies
// ============================================================================

fn arb_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Info),
        Just(Severity::Minor),
        Just(Severity::Major),
        Just(Severity::Critical),
    ]
}

fn arb_last_policy() -> impl Strategy<Value = LastPolicy> {
    prop_oneof![
        Just(LastPolicy::Never),
        Just(LastPolicy::Always),
        Just(LastPolicy::Single),
    ]
}

fn arb_defaults() -> impl Strategy<Value = Defaults> {
    (
        prop::option::of("[a-z]{1,8}"),
        prop::option::of(any::<bool>()),
        prop::option::of(arb_last_policy()),
    )
        .prop_map(|(php_root, strict, last)| Defaults {
            php_root,
            strict,
            last,
            ..Default::default()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The position string always has exactly four colon-separated segments,
    /// and the first one is the begin line.
    #[test]
    fn position_string_has_four_segments(
        line in 1u32..100_000,
        column in prop::option::of(1u32..500),
        end_line in prop::option::of(1u32..100_000),
        end_column in prop::option::of(1u32..500),
    ) {
        let p = Positions::new(line, column, end_line, end_column);
        let s = p.position_string();
        let segments: Vec<&str> = s.split(':').collect();
        prop_assert_eq!(segments.len(), 4);
        prop_assert_eq!(segments[0], line.to_string());
        prop_assert_eq!(segments[1].is_empty(), column.is_none());
        prop_assert_eq!(segments[2].is_empty(), end_line.is_none());
        prop_assert_eq!(segments[3].is_empty(), end_column.is_none());
    }

    /// Serialized severities are exactly the canonical level names.
    #[test]
    fn severity_serializes_to_canonical_name(sev in arb_severity()) {
        let json = serde_json::to_value(sev).expect("serialize severity");
        prop_assert_eq!(json.as_str(), Some(sev.as_str()));
        prop_assert_eq!(Severity::from_canonical(sev.as_str()), Some(sev));
    }

    /// Merging with an empty overlay is the identity; merging onto empty yields the overlay.
    #[test]
    fn defaults_merge_identity(d in arb_defaults()) {
        prop_assert_eq!(d.clone().merged(Defaults::default()), d.clone());
        prop_assert_eq!(Defaults::default().merged(d.clone()), d);
    }
}
