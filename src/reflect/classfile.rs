//! Maps parsed JVM class files onto the reflection model.
//!
//! Decoding is done by `cafebabe`; this module only picks out the class and
//! superclass names and the methods reflection would expose, with their
//! runtime-visible annotation types.

use cafebabe::attributes::AttributeData;
use cafebabe::descriptors::FieldType;
use cafebabe::{MethodAccessFlags, MethodInfo};

use crate::error::{Result, TestDocError};
use crate::models::ReflectedMethod;

/// What discovery needs from one class file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFile {
    /// Binary name (dots, `$` for nesting).
    pub this_class: String,
    /// `None` only for `java.lang.Object` and module-info.
    pub super_class: Option<String>,
    /// Declared methods in class-file order, compiler-generated and
    /// initializer methods removed.
    pub methods: Vec<ReflectedMethod>,
}

impl ClassFile {
    /// Decode a class file. `path` only labels errors.
    pub fn parse(bytes: &[u8], path: &str) -> Result<Self> {
        let class = cafebabe::parse_class(bytes).map_err(|e| TestDocError::ClassFormat {
            path: path.to_string(),
            detail: e.to_string(),
        })?;

        let this_class = binary_name(&class.this_class);
        let methods = class
            .methods
            .iter()
            .filter(|m| !is_hidden(m))
            .map(|m| ReflectedMethod {
                name: m.name.to_string(),
                declaring_class: this_class.clone(),
                access_flags: m.access_flags.bits(),
                annotations: runtime_annotations(m),
            })
            .collect();

        Ok(Self {
            super_class: class.super_class.as_deref().map(binary_name),
            this_class,
            methods,
        })
    }
}

/// `com/acme/Outer$Inner` -> `com.acme.Outer$Inner`
fn binary_name(internal: &str) -> String {
    internal.replace('/', ".")
}

/// Synthetic, bridge and initializer methods are never test methods.
fn is_hidden(method: &MethodInfo<'_>) -> bool {
    method
        .access_flags
        .intersects(MethodAccessFlags::SYNTHETIC | MethodAccessFlags::BRIDGE)
        || method.name.starts_with('<')
}

fn runtime_annotations(method: &MethodInfo<'_>) -> Vec<String> {
    method
        .attributes
        .iter()
        .filter_map(|attr| match &attr.data {
            AttributeData::RuntimeVisibleAnnotations(annotations) => Some(annotations),
            _ => None,
        })
        .flatten()
        .filter_map(|annotation| match &annotation.type_descriptor.field_type {
            FieldType::Object(name) => Some(binary_name(&name.to_string())),
            _ => None,
        })
        .collect()
}
