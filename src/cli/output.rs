use std::path::PathBuf;

use serde::Serialize;

use crate::models::TestMethod;
use crate::source::SourceLocation;

/// Discovery result for one requested class.
#[derive(Debug, Serialize)]
pub struct ClassReport {
    pub class: String,
    pub methods: Vec<TestMethod>,
}

/// Result of `testdoc locate`.
#[derive(Debug, Serialize)]
pub struct LocateReport {
    pub class: String,
    pub source: Option<SourceLocation>,
}

/// Result of `testdoc init`.
#[derive(Debug, Serialize)]
pub struct InitReport {
    pub config_path: PathBuf,
    pub created: bool,
}

/// Format a result as minified JSON.
pub fn format_json<T: Serialize>(result: &T) -> String {
    serde_json::to_string(result).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}

/// Format an error as JSON.
pub fn format_error(err: &dyn std::fmt::Display) -> String {
    serde_json::json!({ "error": err.to_string() }).to_string()
}
