//! Error taxonomy for the Rowt SDK.

/// Error type shared by the parser, the link client and the facade.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowtError {
    /// Input does not have the `scheme://host[path][?query]` shape.
    #[error("Invalid deep link format: {0}")]
    InvalidFormat(String),
    /// A required construction parameter is missing or empty.
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    /// Link creation failed. The message is already normalized
    /// (`Failed to create link: ...`).
    #[error("{0}")]
    LinkCreation(String),
    /// The active linking provider lacks the requested capability.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
    /// The platform linking subsystem reported a failure.
    #[error("Linking error: {0}")]
    Linking(String),
}

pub type Result<T> = std::result::Result<T, RowtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_creation_message_is_verbatim() {
        let err = RowtError::LinkCreation("Failed to create link: boom".to_string());
        assert_eq!(err.to_string(), "Failed to create link: boom");
    }

    #[test]
    fn test_invalid_format_mentions_input() {
        let err = RowtError::InvalidFormat("bad-url".to_string());
        assert!(err.to_string().contains("bad-url"));
    }
}
