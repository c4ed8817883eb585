// Pedantic lint configuration for the crate.
// Most of these are reasonable but too strict for this codebase:
// - cast_possible_truncation: Class files and sources stay well within u16/u32 limits
// - missing_errors_doc: Error handling is self-evident from Result types
// - missing_panics_doc: Panics are rare and documented inline
// - module_name_repetitions: Types like `TestMarkers` read better with their module name
// - must_use_candidate: Builders already carry #[must_use] where it matters
// - option_if_let_else: if-let is often clearer
// - manual_let_else: if-let with early return is often clearer in context
#![allow(
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::option_if_let_else,
    clippy::manual_let_else
)]

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod markers;
pub mod models;
pub mod reflect;
pub mod source;
