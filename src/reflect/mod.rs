//! Compiled-class model and the runtime seam discovery reflects through.

pub mod classfile;
pub mod classpath;

#[cfg(test)]
#[path = "../../tests/support/class_writer.rs"]
pub mod test_utils;

use std::collections::HashSet;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;
use crate::models::ReflectedMethod;

pub use classpath::ClassPath;

/// Binary name of the root object type.
pub const ROOT_CLASS: &str = "java.lang.Object";

/// Handle to a compiled type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassIdentity {
    /// Binary name, e.g. `com.acme.Outer$Inner`.
    pub name: String,
    /// Binary name of the direct superclass (`None` only for the root type).
    pub superclass: Option<String>,
    /// Methods declared by this class, in class-file order.
    pub declared_methods: Vec<ReflectedMethod>,
    /// Classpath root the class was loaded from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined_in: Option<PathBuf>,
}

impl ClassIdentity {
    /// Identity for the root object type.
    #[must_use]
    pub fn root() -> Self {
        Self {
            name: ROOT_CLASS.to_string(),
            superclass: None,
            declared_methods: Vec::new(),
            defined_in: None,
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.name == ROOT_CLASS
    }
}

/// Reflection facility over compiled classes.
///
/// Implementors load classes and answer resource lookups; the superclass
/// walk and the declared-plus-inherited method view are provided.
pub trait Runtime {
    /// Load a class by binary name; `Ok(None)` when it is not available.
    fn load_class(&self, name: &str) -> Result<Option<ClassIdentity>>;

    /// Look up a resource by classpath-relative path, starting with the
    /// root that defined `class`.
    fn find_resource(&self, class: &ClassIdentity, relative_path: &str) -> Option<PathBuf>;

    /// Direct superclass, or `None` at the root type or when the superclass
    /// is not on the classpath.
    fn superclass(&self, class: &ClassIdentity) -> Result<Option<ClassIdentity>> {
        match class.superclass.as_deref() {
            None => Ok(None),
            Some(ROOT_CLASS) => Ok(Some(ClassIdentity::root())),
            Some(name) => {
                let parent = self.load_class(name)?;
                if parent.is_none() {
                    tracing::debug!(class = %class.name, superclass = name, "superclass not on classpath");
                }
                Ok(parent)
            }
        }
    }

    /// Declared methods followed by public methods inherited from ancestors.
    fn methods(&self, class: &ClassIdentity) -> Result<Vec<ReflectedMethod>> {
        let mut methods = class.declared_methods.clone();
        let mut seen: HashSet<String> = HashSet::from([class.name.clone()]);
        let mut current = self.superclass(class)?;

        while let Some(parent) = current {
            if parent.is_root() || !seen.insert(parent.name.clone()) {
                break;
            }
            methods.extend(
                parent
                    .declared_methods
                    .iter()
                    .filter(|m| m.is_public())
                    .cloned(),
            );
            current = self.superclass(&parent)?;
        }

        Ok(methods)
    }
}
