/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the application
#[derive(Debug)]
pub enum Error {
    UnsupportedTrigger { endpoint: String, documenter: String },
    MissingMethod(String),
    UnsupportedDocumenter(String),
    SerializationError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::UnsupportedTrigger {
                endpoint,
                documenter,
            } => write!(
                f,
                "Endpoint {} has a trigger type not supported by the {} documenter",
                endpoint, documenter
            ),
            Error::MissingMethod(endpoint) => {
                write!(f, "Endpoint {} has no HTTP method", endpoint)
            }
            Error::UnsupportedDocumenter(name) => {
                write!(f, "Documenter type '{}' does not exist", name)
            }
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::SerializationError(format!("YAML serialization error: {}", err))
    }
}
