//! Locating and parsing Java source files.

pub mod java;
pub mod locator;

pub use java::JavaSourceParser;
pub use locator::{source_relative_path, SourceLocation, SourceLocator, SourceOrigin};
