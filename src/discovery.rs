//! Pairs compiled test methods with their source declarations.
//!
//! For each class level, from the requested class up through its
//! superclasses, the compiled test methods and the source test methods are
//! indexed by name and joined. Records of a subclass come before those of its
//! ancestors, and a name already produced by a subclass shadows the same name
//! further up.
//!
//! Known limitation: methods are matched by simple name only. Overloaded test
//! methods collapse to the first declaration in source and the first compiled
//! method with that name.

use std::collections::{HashMap, HashSet};

use crate::config::Config;
use crate::error::{Result, TestDocError};
use crate::markers::TestMarkers;
use crate::models::{Annotated, ReflectedMethod, SourceMethod, TestMethod};
use crate::reflect::{ClassIdentity, Runtime};
use crate::source::{JavaSourceParser, SourceLocation, SourceLocator};

/// Test-method discovery over a runtime and a source tree.
pub struct Discovery<R> {
    runtime: R,
    locator: SourceLocator,
    parser: JavaSourceParser,
    markers: TestMarkers,
}

impl<R: Runtime> Discovery<R> {
    /// Discovery with the default markers and strict parsing.
    pub fn new(runtime: R, locator: SourceLocator) -> Self {
        Self {
            runtime,
            locator,
            parser: JavaSourceParser::new(),
            markers: TestMarkers::default(),
        }
    }

    /// Discovery configured from project settings.
    pub fn from_config(runtime: R, config: &Config) -> Self {
        Self {
            runtime,
            locator: SourceLocator::from_config(config),
            parser: JavaSourceParser::new().strict(config.settings.parse.strict),
            markers: config.markers(),
        }
    }

    #[must_use]
    pub fn with_markers(mut self, markers: TestMarkers) -> Self {
        self.markers = markers;
        self
    }

    /// Load `name` from the runtime and discover its test methods.
    pub fn discover_name(&self, name: &str) -> Result<Vec<TestMethod>> {
        let class = self
            .runtime
            .load_class(name)?
            .ok_or_else(|| TestDocError::ClassNotFound {
                name: name.to_string(),
            })?;
        self.discover(&class)
    }

    /// All test methods of `class` and its ancestors, most-derived first.
    ///
    /// A level without locatable source contributes nothing. A source file
    /// that is found but cannot be read or parsed fails the whole call.
    pub fn discover(&self, class: &ClassIdentity) -> Result<Vec<TestMethod>> {
        if self.markers.is_empty() {
            tracing::warn!("no test marker annotations configured");
        }
        let mut records = Vec::new();
        let mut emitted: HashSet<String> = HashSet::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut current = Some(class.clone());

        while let Some(level) = current {
            if level.is_root() {
                break;
            }
            if !visited.insert(level.name.clone()) {
                tracing::warn!(class = %level.name, "cyclic superclass chain");
                break;
            }

            for record in self.collect_level(&level)? {
                if emitted.insert(record.name.clone()) {
                    records.push(record);
                } else {
                    tracing::debug!(class = %level.name, method = %record.name, "shadowed by subclass");
                }
            }

            current = self.runtime.superclass(&level)?;
        }

        Ok(records)
    }

    /// Records contributed by one class level.
    fn collect_level(&self, class: &ClassIdentity) -> Result<Vec<TestMethod>> {
        let reflected: HashMap<String, ReflectedMethod> =
            index_by_name(self.markers.filter(self.runtime.methods(class)?));

        let Some((location, parsed)) = self.read_source(class)? else {
            tracing::debug!(class = %class.name, "no source found");
            return Ok(Vec::new());
        };
        let source_methods = self.markers.filter(parsed);

        let mut seen: HashSet<String> = HashSet::new();
        let mut records = Vec::new();
        for method in source_methods {
            if !seen.insert(method.name.clone()) {
                // TODO: match overloads by parameter types once compiled
                // method signatures are recorded on ReflectedMethod.
                continue;
            }
            let Some(compiled) = reflected.get(&method.name) else {
                tracing::debug!(
                    class = %class.name,
                    method = %method.name,
                    "test in source has no compiled counterpart"
                );
                continue;
            };
            records.push(TestMethod {
                class_name: class.name.clone(),
                name: method.name.clone(),
                reflected: compiled.clone(),
                source: Some(method),
                source_path: Some(location.path.clone()),
            });
        }
        Ok(records)
    }

    /// The first candidate file that declares `class`, with its methods.
    ///
    /// A candidate that parses but declares other types is skipped; read and
    /// syntax errors are returned.
    fn read_source(
        &self,
        class: &ClassIdentity,
    ) -> Result<Option<(SourceLocation, Vec<SourceMethod>)>> {
        for location in self.locator.candidates(&self.runtime, class) {
            match self.parser.load_class(&location.path, &class.name) {
                Ok(methods) => {
                    tracing::debug!(
                        class = %class.name,
                        path = %location.path.display(),
                        origin = ?location.origin,
                        "source located"
                    );
                    return Ok(Some((location, methods)));
                }
                Err(TestDocError::ClassNotInSource { path, .. }) => {
                    tracing::debug!(class = %class.name, path = %path, "candidate does not declare class");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }
}

/// Index methods by name; the first method with a given name wins.
fn index_by_name<A: Annotated>(methods: Vec<A>) -> HashMap<String, A> {
    let mut index = HashMap::with_capacity(methods.len());
    for method in methods {
        index.entry(method.name().to_string()).or_insert(method);
    }
    index
}
