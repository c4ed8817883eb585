use std::path::PathBuf;

use serde::Serialize;

use crate::models::method::{ReflectedMethod, SourceMethod};

/// One test method with its compiled metadata and its source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestMethod {
    /// Binary name of the class level this record was produced for.
    pub class_name: String,
    /// Simple method name, the join key.
    pub name: String,
    pub reflected: ReflectedMethod,
    /// Source declaration; `None` when no source was found for the class.
    pub source: Option<SourceMethod>,
    /// File the source was read from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
}

impl TestMethod {
    /// The method body, if source is available.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.body.as_deref())
    }

    /// Whether the compiled method carries the given annotation.
    #[must_use]
    pub fn has_annotation(&self, fqn: &str) -> bool {
        self.reflected.annotations.iter().any(|a| a == fqn)
    }
}
