//! Test-method filter.
//!
//! A method is a test when any of its annotations is one of the configured
//! marker annotations. The same predicate applies to compiled and to source
//! methods through [`Annotated`].

use std::collections::BTreeSet;

use crate::models::Annotated;

/// JUnit 4 `@Test`.
pub const JUNIT4_TEST: &str = "org.junit.Test";
/// JUnit 5 `@Test`.
pub const JUPITER_TEST: &str = "org.junit.jupiter.api.Test";
/// JUnit 5 `@ParameterizedTest`.
pub const PARAMETERIZED_TEST: &str = "org.junit.jupiter.params.ParameterizedTest";

/// Markers recognised when nothing else is configured.
pub const DEFAULT_MARKERS: &[&str] = &[JUNIT4_TEST, JUPITER_TEST, PARAMETERIZED_TEST];

/// The set of annotations that denote a test method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestMarkers {
    markers: BTreeSet<String>,
}

impl Default for TestMarkers {
    fn default() -> Self {
        Self::new(DEFAULT_MARKERS.iter().map(|m| (*m).to_string()))
    }
}

impl TestMarkers {
    /// Build a marker set from fully-qualified annotation names.
    pub fn new(markers: impl IntoIterator<Item = String>) -> Self {
        Self {
            markers: markers
                .into_iter()
                .map(|m| m.trim().trim_start_matches('@').to_string())
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    /// Add one more marker.
    #[must_use]
    pub fn with_marker(mut self, fqn: impl Into<String>) -> Self {
        self.markers.insert(fqn.into());
        self
    }

    #[must_use]
    pub fn contains(&self, fqn: &str) -> bool {
        self.markers.contains(fqn)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.markers.iter().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// True if any annotation of `method` is a marker.
    pub fn is_test<A: Annotated + ?Sized>(&self, method: &A) -> bool {
        method
            .annotation_names()
            .into_iter()
            .any(|name| self.markers.contains(name))
    }

    /// Keep only test methods, preserving order.
    pub fn filter<A: Annotated>(&self, methods: impl IntoIterator<Item = A>) -> Vec<A> {
        methods.into_iter().filter(|m| self.is_test(m)).collect()
    }
}
