pub mod method;
pub mod test_method;

pub use method::{AnnotationRef, Annotated, ReflectedMethod, SourceMethod};
pub use test_method::TestMethod;
