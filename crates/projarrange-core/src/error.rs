use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArrangeError {
    #[error("Invalid argument: node '{argument}' must not be absent")]
    InvalidArgument { argument: String },

    #[error("Document has no root element")]
    MissingRoot,

    #[error("XML parsing error at {location}: {message}")]
    XmlParse { message: String, location: String },

    #[error("XML serialization error: {0}")]
    XmlWrite(String),

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArrangeError>;
