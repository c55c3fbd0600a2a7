//! Generation backend access and model-output parsing.

pub mod client;
pub mod parser;
pub mod response;

pub use client::{
    BackendError, GenerationBackend, GenerationRequest, OpenAiCompatibleClient,
};
pub use parser::parse_with_fallback;
pub use response::LlmResponse;
