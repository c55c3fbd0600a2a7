use schemars::gen::SchemaGenerator;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// Structured answer a generation backend can be asked to produce.
///
/// Parsing never hard-fails: when the text cannot be read as the target type
/// a default value is returned and marked as a fallback, and callers switch
/// to their free-text handling.
pub trait LlmResponse: DeserializeOwned + Default + JsonSchema {
    /// Record that this value is a fallback produced after a parse failure
    fn mark_as_fallback(&mut self, error_message: String);

    /// Whether the value came from a successful parse
    fn is_success(&self) -> bool;

    /// JSON schema for this type, pretty-printed for embedding in a prompt
    fn json_schema_string() -> String {
        let mut gen = SchemaGenerator::default();
        let schema = gen.root_schema_for::<Self>();
        serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
    }

    /// Instruction appended to a prompt to request this type as JSON
    fn format_instruction() -> String {
        format!(
            "\n\nRespond ONLY with a JSON object that matches this JSON schema, \
             without commentary:\n```json\n{}\n```",
            Self::json_schema_string()
        )
    }
}
