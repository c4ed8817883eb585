use serde::Serialize;

/// Uniform view over a method and its annotations.
///
/// Implemented by both the compiled and the source-level method
/// representations so test filtering and the name join are written once.
pub trait Annotated {
    /// Simple method name.
    fn name(&self) -> &str;

    /// Fully-qualified names of the annotations on this method.
    ///
    /// Source annotations that could resolve to more than one type contribute
    /// every candidate.
    fn annotation_names(&self) -> Vec<&str>;
}

/// JVM method access flags relevant to discovery.
pub mod access {
    pub const PUBLIC: u16 = 0x0001;
}

/// A method as seen in compiled class metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReflectedMethod {
    /// Simple method name.
    pub name: String,
    /// Binary name of the class declaring the method.
    pub declaring_class: String,
    /// Raw access flags.
    pub access_flags: u16,
    /// Fully-qualified names of runtime-visible annotations.
    pub annotations: Vec<String>,
}

impl ReflectedMethod {
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.access_flags & access::PUBLIC != 0
    }
}

impl Annotated for ReflectedMethod {
    fn name(&self) -> &str {
        &self.name
    }

    fn annotation_names(&self) -> Vec<&str> {
        self.annotations.iter().map(String::as_str).collect()
    }
}

/// An annotation as written in source, with the types it may refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationRef {
    /// Name as written, without `@` (e.g. `Test` or `org.junit.Test`).
    pub written: String,
    /// Fully-qualified candidates, most likely first.
    pub candidates: Vec<String>,
}

/// A method declaration extracted from a Java source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceMethod {
    pub name: String,
    pub annotations: Vec<AnnotationRef>,
    /// Full span: leading comments, annotations, signature and body.
    pub text: String,
    /// Statements between the body braces, without the braces.
    pub body: Option<String>,
    /// Javadoc or line comments directly above the declaration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_comment: Option<String>,
    /// Start line of the declaration (1-based).
    pub start_line: u32,
    /// End line (1-based, inclusive).
    pub end_line: u32,
}

impl Annotated for SourceMethod {
    fn name(&self) -> &str {
        &self.name
    }

    fn annotation_names(&self) -> Vec<&str> {
        self.annotations
            .iter()
            .flat_map(|a| a.candidates.iter().map(String::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflected_method_flags() {
        let m = ReflectedMethod {
            name: "shouldWork".into(),
            declaring_class: "com.acme.FooTest".into(),
            access_flags: access::PUBLIC,
            annotations: vec!["org.junit.Test".into()],
        };
        assert!(m.is_public());
        assert_eq!(m.annotation_names(), vec!["org.junit.Test"]);
    }

    #[test]
    fn source_method_flattens_candidates() {
        let m = SourceMethod {
            name: "shouldWork".into(),
            annotations: vec![
                AnnotationRef {
                    written: "Test".into(),
                    candidates: vec!["org.junit.Test".into(), "com.acme.Test".into()],
                },
                AnnotationRef {
                    written: "Override".into(),
                    candidates: vec!["java.lang.Override".into()],
                },
            ],
            text: String::new(),
            body: None,
            doc_comment: None,
            start_line: 1,
            end_line: 1,
        };
        assert_eq!(
            m.annotation_names(),
            vec!["org.junit.Test", "com.acme.Test", "java.lang.Override"]
        );
    }
}
