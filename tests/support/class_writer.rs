//! Writes real class files and source layouts for tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_BRIDGE: u16 = 0x0040;
pub const ACC_SYNTHETIC: u16 = 0x1000;

struct Annotation {
    type_name: String,
    string_element: Option<(String, String)>,
}

struct Method {
    access_flags: u16,
    name: String,
    descriptor: String,
    annotations: Vec<Annotation>,
}

/// Builds a minimal, valid class file.
pub struct ClassFileBuilder {
    name: String,
    superclass: Option<String>,
    methods: Vec<Method>,
    long_constant: bool,
}

#[derive(Default)]
struct Pool {
    entries: Vec<Vec<u8>>,
    slots: u16,
}

impl Pool {
    fn push(&mut self, entry: Vec<u8>, width: u16) -> u16 {
        let index = self.slots + 1;
        self.entries.push(entry);
        self.slots += width;
        index
    }

    fn utf8(&mut self, s: &str) -> u16 {
        let mut entry = vec![1];
        entry.extend_from_slice(&(s.len() as u16).to_be_bytes());
        entry.extend_from_slice(s.as_bytes());
        self.push(entry, 1)
    }

    fn class(&mut self, binary_name: &str) -> u16 {
        let name = self.utf8(&binary_name.replace('.', "/"));
        let mut entry = vec![7];
        entry.extend_from_slice(&name.to_be_bytes());
        self.push(entry, 1)
    }

    fn long(&mut self, value: i64) -> u16 {
        let mut entry = vec![5];
        entry.extend_from_slice(&value.to_be_bytes());
        self.push(entry, 2)
    }
}

impl ClassFileBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            superclass: Some("java.lang.Object".to_string()),
            methods: Vec::new(),
            long_constant: false,
        }
    }

    pub fn extends(mut self, superclass: &str) -> Self {
        self.superclass = Some(superclass.to_string());
        self
    }

    /// Public `()V` method with marker annotations.
    pub fn method(mut self, name: &str, annotations: &[&str]) -> Self {
        self.methods.push(Method {
            access_flags: ACC_PUBLIC,
            name: name.to_string(),
            descriptor: "()V".to_string(),
            annotations: annotations
                .iter()
                .map(|a| Annotation {
                    type_name: (*a).to_string(),
                    string_element: None,
                })
                .collect(),
        });
        self
    }

    /// Public `()V` method with one annotation carrying a string element.
    pub fn method_with_element(
        mut self,
        name: &str,
        annotation: &str,
        element: &str,
        value: &str,
    ) -> Self {
        self.methods.push(Method {
            access_flags: ACC_PUBLIC,
            name: name.to_string(),
            descriptor: "()V".to_string(),
            annotations: vec![Annotation {
                type_name: annotation.to_string(),
                string_element: Some((element.to_string(), value.to_string())),
            }],
        });
        self
    }

    pub fn raw_method(mut self, access_flags: u16, name: &str, descriptor: &str) -> Self {
        self.methods.push(Method {
            access_flags,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            annotations: Vec::new(),
        });
        self
    }

    /// Put a two-slot constant in the pool before everything else.
    pub fn with_long_constant(mut self) -> Self {
        self.long_constant = true;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pool = Pool::default();
        if self.long_constant {
            pool.long(42);
        }
        let this_class = pool.class(&self.name);
        let super_class = self.superclass.as_deref().map_or(0, |s| pool.class(s));
        let annotations_attr = pool.utf8("RuntimeVisibleAnnotations");

        let mut methods = Vec::new();
        for method in &self.methods {
            let mut out = Vec::new();
            out.extend_from_slice(&method.access_flags.to_be_bytes());
            out.extend_from_slice(&pool.utf8(&method.name).to_be_bytes());
            out.extend_from_slice(&pool.utf8(&method.descriptor).to_be_bytes());
            if method.annotations.is_empty() {
                out.extend_from_slice(&0u16.to_be_bytes());
            } else {
                let mut attr = Vec::new();
                attr.extend_from_slice(&(method.annotations.len() as u16).to_be_bytes());
                for annotation in &method.annotations {
                    let descriptor = format!("L{};", annotation.type_name.replace('.', "/"));
                    attr.extend_from_slice(&pool.utf8(&descriptor).to_be_bytes());
                    match &annotation.string_element {
                        None => attr.extend_from_slice(&0u16.to_be_bytes()),
                        Some((element, value)) => {
                            attr.extend_from_slice(&1u16.to_be_bytes());
                            attr.extend_from_slice(&pool.utf8(element).to_be_bytes());
                            attr.push(b's');
                            attr.extend_from_slice(&pool.utf8(value).to_be_bytes());
                        }
                    }
                }
                out.extend_from_slice(&1u16.to_be_bytes());
                out.extend_from_slice(&annotations_attr.to_be_bytes());
                out.extend_from_slice(&(attr.len() as u32).to_be_bytes());
                out.extend_from_slice(&attr);
            }
            methods.push(out);
        }

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0xCAFE_BABE_u32.to_be_bytes());
        bytes.extend_from_slice(&0u16.to_be_bytes());
        bytes.extend_from_slice(&52u16.to_be_bytes());
        bytes.extend_from_slice(&(pool.slots + 1).to_be_bytes());
        for entry in &pool.entries {
            bytes.extend_from_slice(entry);
        }
        bytes.extend_from_slice(&0x0021u16.to_be_bytes());
        bytes.extend_from_slice(&this_class.to_be_bytes());
        bytes.extend_from_slice(&super_class.to_be_bytes());
        bytes.extend_from_slice(&0u16.to_be_bytes()); // interfaces
        bytes.extend_from_slice(&0u16.to_be_bytes()); // fields
        bytes.extend_from_slice(&(methods.len() as u16).to_be_bytes());
        for method in methods {
            bytes.extend_from_slice(&method);
        }
        bytes.extend_from_slice(&0u16.to_be_bytes()); // class attributes
        bytes
    }

    /// Write the class file under `classpath_root` in package layout.
    pub fn write_to(&self, classpath_root: &Path) -> PathBuf {
        let path = classpath_root.join(format!("{}.class", self.name.replace('.', "/")));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, self.build()).unwrap();
        path
    }
}

/// Write a text file at `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}
