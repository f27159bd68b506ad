//! Domain logic: turning tool findings into canonical issues.
//!
//! This crate is designed to be I/O-free and highly testable.

pub mod fingerprint;
pub mod location;
pub mod normalize;
pub mod severity;

pub use fingerprint::compute_fingerprint;
pub use location::{LineSpan, resolve_lines};
pub use normalize::{Finding, normalize, relativize};
pub use severity::{ToolSeverity, map_severity};
