use thiserror::Error;

use crate::shared::llm::BackendError;

/// Every way a generation call can fail
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("The rendered prompt is empty")]
    EmptyPrompt,

    #[error("Generation backend returned HTTP {status}: {body}")]
    BackendRequest { status: u16, body: String },

    #[error("Could not reach the generation backend: {0}")]
    Network(String),

    #[error("The generation backend returned an empty response")]
    EmptyResponse,

    #[error("No valid ideas could be parsed")]
    NoIdeasParsed,
}

impl From<BackendError> for GenerationError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Http { status, body } => GenerationError::BackendRequest { status, body },
            BackendError::Network(message) => GenerationError::Network(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_errors_keep_status_and_body() {
        let err = GenerationError::from(BackendError::Http {
            status: 429,
            body: "rate limited".to_string(),
        });
        assert!(matches!(
            err,
            GenerationError::BackendRequest { status: 429, ref body } if body == "rate limited"
        ));

        let err = GenerationError::from(BackendError::Network("timed out".to_string()));
        assert!(matches!(err, GenerationError::Network(ref m) if m == "timed out"));
    }

    #[test]
    fn test_no_ideas_message() {
        assert_eq!(
            GenerationError::NoIdeasParsed.to_string(),
            "No valid ideas could be parsed"
        );
    }
}
