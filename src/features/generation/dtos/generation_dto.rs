use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::generation::models::{GeneratedIdea, IdeaContext};
use crate::features::generation::services::{BackendOptions, RenderedPrompt};
use crate::features::prompts::models::TemplateCategory;
use crate::shared::prompts::VariableBag;

fn default_idea_category() -> String {
    TemplateCategory::ContentTriggers.as_str().to_string()
}

// Backend overrides shared by every generation request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptionsDto {
    #[validate(range(min = 1, max = 16000))]
    pub max_tokens: Option<u32>,

    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: Option<f32>,

    #[validate(length(min = 1, max = 200))]
    pub model: Option<String>,
}

impl From<GenerationOptionsDto> for BackendOptions {
    fn from(dto: GenerationOptionsDto) -> Self {
        Self {
            max_tokens: dto.max_tokens,
            temperature: dto.temperature,
            model: dto.model,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequestDto {
    /// Template category, e.g. `linkedin_post`
    #[validate(length(min = 1, max = 200))]
    pub category: String,

    #[serde(default)]
    #[schema(value_type = Object)]
    pub variables: VariableBag,

    #[serde(default)]
    #[validate(nested)]
    pub options: GenerationOptionsDto,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateRequestDto {
    #[validate(length(min = 1, max = 200))]
    pub category: String,

    #[serde(default)]
    #[schema(value_type = Object)]
    pub variables: VariableBag,

    /// How the new version should differ from the last one
    #[validate(length(min = 1, max = 2000))]
    pub new_direction: String,

    #[serde(default)]
    #[validate(nested)]
    pub options: GenerationOptionsDto,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateIdeasRequestDto {
    #[serde(default = "default_idea_category")]
    #[validate(length(min = 1, max = 200))]
    pub category: String,

    #[serde(default)]
    #[schema(value_type = Object)]
    pub variables: VariableBag,

    #[serde(default)]
    #[validate(nested)]
    pub options: GenerationOptionsDto,

    /// References copied onto every generated idea
    #[serde(default)]
    pub context: IdeaContext,

    /// Ask the backend for JSON, falling back to text parsing
    #[serde(default)]
    pub structured: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PreviewRequestDto {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub variables: VariableBag,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTextDto {
    pub category: TemplateCategory,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedIdeasDto {
    pub category: TemplateCategory,
    pub ideas: Vec<GeneratedIdea>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPromptDto {
    pub category: TemplateCategory,
    pub template_id: String,
    pub prompt: String,
    pub unresolved_placeholders: Vec<String>,
}

impl From<RenderedPrompt> for RenderedPromptDto {
    fn from(rendered: RenderedPrompt) -> Self {
        Self {
            category: rendered.category,
            template_id: rendered.template_id,
            prompt: rendered.prompt,
            unresolved_placeholders: rendered.unresolved,
        }
    }
}
