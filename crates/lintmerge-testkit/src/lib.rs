//! Shared test utilities for the lintmerge workspace.
//!
//! This crate provides:
//! - **arb**: Proptest strategies for issues and tool identities
//! - **annotation_builder**: Builder for escaped CI annotation lines
//! - **fixtures**: Sample tool reports and throwaway project layouts
//! - **runner**: A [`ProcessRunner`](lintmerge_core::ProcessRunner) that replays canned output
//!
//! # Example
//!
//! ```rust,ignore
//! use lintmerge_testkit::{ScriptedRunner, sample_outputs};
//!
//! let runner = ScriptedRunner::new().respond("phpstan", sample_outputs::PHPSTAN_ONE_MAJOR, 1);
//! ```

pub mod annotation_builder;
pub mod arb;
pub mod fixtures;
pub mod runner;

pub use annotation_builder::AnnotationBuilder;
pub use arb::{arb_issue, arb_last_policy, arb_rel_path, arb_severity, arb_tool};
pub use fixtures::{ProjectLayout, sample_outputs};
pub use runner::ScriptedRunner;
