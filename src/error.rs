use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestDocError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error in {path}: {detail}")]
    Parse { path: String, detail: String },

    #[error("malformed class file {path}: {detail}")]
    ClassFormat { path: String, detail: String },

    #[error("class not found on classpath: {name}")]
    ClassNotFound { name: String },

    #[error("source file {path} does not declare class {class}")]
    ClassNotInSource { class: String, path: String },

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TestDocError>;
