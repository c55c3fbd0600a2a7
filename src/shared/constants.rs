// =============================================================================
// GENERATION DEFAULTS
// =============================================================================

/// Default completion budget when the caller does not set `max_tokens`
pub const DEFAULT_MAX_TOKENS: u32 = 1500;

/// Default sampling temperature when the caller does not set one
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Returned by the backend adapter when the provider response carries no content
pub const NO_CONTENT_SENTINEL: &str = "No content generated";

/// Variable name carrying the caller's steer on regeneration
pub const NEW_DIRECTION_VARIABLE: &str = "newDirection";

// =============================================================================
// TEMPLATE PERSISTENCE
// =============================================================================

/// Key-value namespace holding all template overrides as one JSON document
pub const DEFAULT_PROMPT_STORE_KEY: &str = "gtm_prompts";
