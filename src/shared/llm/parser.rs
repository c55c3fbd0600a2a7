use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use super::LlmResponse;

lazy_static! {
    /// Trailing commas before `}` or `]`
    static ref TRAILING_COMMA_RE: Regex = Regex::new(r",(\s*[}\]])").unwrap();

    /// JavaScript-style concatenation between string literals: `"a" + "b"`
    static ref STRING_CONCAT_RE: Regex = Regex::new(r#""\s*\+\s*""#).unwrap();

    /// Opening code fence with an optional language tag
    static ref CODE_FENCE_RE: Regex = Regex::new(r"```[A-Za-z0-9_-]*[ \t]*\r?\n").unwrap();
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JsonExtractError {
    #[error("No JSON object found in response")]
    NotFound,

    #[error("Unterminated code fence in response")]
    UnterminatedFence,

    #[error("Invalid JSON boundaries in response")]
    InvalidBoundaries,

    #[error("Failed to parse JSON after all repair attempts: {0}")]
    Unparseable(String),
}

/// Locate the JSON object inside a model answer.
///
/// Looks, in order, for a fenced code block, a bare object, and finally the
/// span from the first `{` to the last `}`.
pub fn extract_json_string(text: &str) -> Result<String, JsonExtractError> {
    if let Some(fence) = CODE_FENCE_RE.find(text) {
        let body = &text[fence.end()..];
        let end = body.find("```").ok_or(JsonExtractError::UnterminatedFence)?;
        return Ok(body[..end].trim().to_string());
    }

    let trimmed = text.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Ok(trimmed.to_string());
    }

    let start = text.find('{').ok_or(JsonExtractError::NotFound)?;
    let end = text.rfind('}').ok_or(JsonExtractError::NotFound)?;
    if start < end {
        Ok(text[start..=end].to_string())
    } else {
        Err(JsonExtractError::InvalidBoundaries)
    }
}

/// Drop trailing commas, e.g. `{"a": 1,}` -> `{"a": 1}`
pub fn fix_trailing_commas(json_str: &str) -> String {
    TRAILING_COMMA_RE.replace_all(json_str, "$1").to_string()
}

/// Merge `"a" + "b"` into `"ab"`
pub fn fix_string_concatenation(json_str: &str) -> String {
    STRING_CONCAT_RE.replace_all(json_str, "").to_string()
}

fn repair_with_llm_json(json_str: &str) -> Option<String> {
    let options = llm_json::RepairOptions::default();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        llm_json::repair_json(json_str, &options)
    }));

    match result {
        Ok(Ok(repaired)) => Some(repaired),
        Ok(Err(e)) => {
            tracing::debug!("llm_json repair failed: {:?}", e);
            None
        }
        Err(_) => {
            tracing::warn!("llm_json repair panicked");
            None
        }
    }
}

/// Parse `text` as `T`, repairing common model mistakes along the way.
///
/// Stages: extraction, direct parse, quick fixes (string concatenation and
/// trailing commas), then `llm_json` repair.
pub fn try_parse<T>(text: &str) -> Result<T, JsonExtractError>
where
    T: LlmResponse,
{
    let json_str = extract_json_string(text)?;

    if let Ok(parsed) = serde_json::from_str::<T>(&json_str) {
        return Ok(parsed);
    }

    let fixed = fix_trailing_commas(&fix_string_concatenation(&json_str));
    if let Ok(parsed) = serde_json::from_str::<T>(&fixed) {
        tracing::debug!("Structured response parsed after quick fixes");
        return Ok(parsed);
    }

    if let Some(repaired) = repair_with_llm_json(&json_str) {
        if let Ok(parsed) = serde_json::from_str::<T>(&repaired) {
            tracing::debug!("Structured response parsed after llm_json repair");
            return Ok(parsed);
        }
    }

    Err(JsonExtractError::Unparseable(
        json_str.chars().take(200).collect(),
    ))
}

/// Parse with graceful degradation: on failure, `T::default()` marked as fallback
pub fn parse_with_fallback<T>(text: &str) -> T
where
    T: LlmResponse,
{
    match try_parse::<T>(text) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Structured response parsing failed, using fallback: {}", e);
            let mut fallback = T::default();
            fallback.mark_as_fallback(e.to_string());
            fallback
        }
    }
}
