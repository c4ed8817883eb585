use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::reflect::classfile::ClassFile;
use crate::reflect::{ClassIdentity, Runtime};

/// A `Runtime` backed by class-file directories.
///
/// Classes are read from disk on every lookup; nothing is cached between
/// calls.
#[derive(Debug, Clone, Default)]
pub struct ClassPath {
    roots: Vec<PathBuf>,
}

impl ClassPath {
    pub fn new(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// First `(root, file)` holding the class file for `name`.
    fn class_file(&self, name: &str) -> Option<(&Path, PathBuf)> {
        let relative = format!("{}.class", name.replace('.', "/"));
        self.roots.iter().find_map(|root| {
            let file = root.join(&relative);
            file.is_file().then(|| (root.as_path(), file))
        })
    }
}

impl Runtime for ClassPath {
    fn load_class(&self, name: &str) -> Result<Option<ClassIdentity>> {
        let Some((root, file)) = self.class_file(name) else {
            return Ok(None);
        };

        let bytes = std::fs::read(&file)?;
        let class = ClassFile::parse(&bytes, &file.to_string_lossy())?;
        if class.this_class != name {
            tracing::warn!(
                requested = name,
                found = %class.this_class,
                path = %file.display(),
                "class file name does not match its location"
            );
        }

        Ok(Some(ClassIdentity {
            declared_methods: class.methods,
            name: class.this_class,
            superclass: class.super_class,
            defined_in: Some(root.to_path_buf()),
        }))
    }

    fn find_resource(&self, class: &ClassIdentity, relative_path: &str) -> Option<PathBuf> {
        let defining = class.defined_in.as_deref();
        defining
            .into_iter()
            .chain(
                self.roots
                    .iter()
                    .map(PathBuf::as_path)
                    .filter(|root| Some(*root) != defining),
            )
            .map(|root| root.join(relative_path))
            .find(|candidate| candidate.is_file())
    }
}
