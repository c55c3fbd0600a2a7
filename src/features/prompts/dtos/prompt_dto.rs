use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::features::prompts::models::TemplateCategory;
use crate::features::prompts::services::{TemplateDraft, TemplateEntry};

fn default_active() -> bool {
    true
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("template must not be blank".into()));
    }
    Ok(())
}

// Override request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePromptTemplateDto {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    /// Template body with `{{variableName}}` placeholders
    #[validate(length(min = 1), custom(function = "not_blank"))]
    pub template: String,

    /// Derived from the body when omitted
    pub variables: Option<Vec<String>>,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl From<UpdatePromptTemplateDto> for TemplateDraft {
    fn from(dto: UpdatePromptTemplateDto) -> Self {
        Self {
            name: dto.name,
            description: dto.description,
            template: dto.template,
            variables: dto.variables,
            is_active: dto.is_active,
        }
    }
}

// Response DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptTemplateResponseDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub template: String,
    pub variables: Vec<String>,
    pub category: TemplateCategory,
    pub is_active: bool,
    /// False when the built-in default is in effect
    pub is_override: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TemplateEntry> for PromptTemplateResponseDto {
    fn from(entry: TemplateEntry) -> Self {
        let t = entry.template;
        Self {
            id: t.id,
            name: t.name,
            description: t.description,
            template: t.template,
            variables: t.variables,
            category: t.category,
            is_active: t.is_active,
            is_override: entry.is_override,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Result of a reset; `persisted` is false when the store write failed
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetResultDto {
    pub category: Option<TemplateCategory>,
    pub persisted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_dto_defaults_to_active() {
        let dto: UpdatePromptTemplateDto =
            serde_json::from_value(json!({"template": "Hello {{name}}"})).unwrap();
        assert!(dto.is_active);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_blank_template_is_rejected() {
        let dto: UpdatePromptTemplateDto =
            serde_json::from_value(json!({"template": "   \n"})).unwrap();
        assert!(dto.validate().is_err());

        let dto: UpdatePromptTemplateDto =
            serde_json::from_value(json!({"template": ""})).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_long_name_is_rejected() {
        let dto: UpdatePromptTemplateDto = serde_json::from_value(json!({
            "template": "x",
            "name": "n".repeat(201)
        }))
        .unwrap();
        assert!(dto.validate().is_err());
    }
}
