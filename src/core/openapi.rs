use utoipa::{Modify, OpenApi};

use crate::features::generation::{
    dtos as generation_dtos, handlers as generation_handlers, models as generation_models,
};
use crate::features::prompts::{
    dtos as prompts_dtos, handlers as prompts_handlers, models as prompts_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Prompts
        prompts_handlers::prompt_handler::list_templates,
        prompts_handlers::prompt_handler::get_template,
        prompts_handlers::prompt_handler::update_template,
        prompts_handlers::prompt_handler::reset_template,
        prompts_handlers::prompt_handler::reset_all_templates,
        // Generation
        generation_handlers::generation_handler::preview_prompt,
        generation_handlers::generation_handler::generate,
        generation_handlers::generation_handler::regenerate,
        generation_handlers::generation_handler::generate_ideas,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Prompts
            prompts_models::TemplateCategory,
            prompts_models::PromptTemplate,
            prompts_dtos::UpdatePromptTemplateDto,
            prompts_dtos::PromptTemplateResponseDto,
            prompts_dtos::ResetResultDto,
            ApiResponse<prompts_dtos::PromptTemplateResponseDto>,
            ApiResponse<Vec<prompts_dtos::PromptTemplateResponseDto>>,
            ApiResponse<prompts_dtos::ResetResultDto>,
            // Generation
            generation_models::GeneratedIdea,
            generation_models::IdeaContext,
            generation_models::IdeaScore,
            generation_models::IdeaSource,
            generation_models::IdeaSourceKind,
            generation_models::NarrativeAnchor,
            generation_dtos::GenerationOptionsDto,
            generation_dtos::GenerateRequestDto,
            generation_dtos::RegenerateRequestDto,
            generation_dtos::GenerateIdeasRequestDto,
            generation_dtos::PreviewRequestDto,
            generation_dtos::GeneratedTextDto,
            generation_dtos::GeneratedIdeasDto,
            generation_dtos::RenderedPromptDto,
            ApiResponse<generation_dtos::GeneratedTextDto>,
            ApiResponse<generation_dtos::GeneratedIdeasDto>,
            ApiResponse<generation_dtos::RenderedPromptDto>,
        )
    ),
    tags(
        (name = "prompts", description = "Prompt templates and per-category overrides"),
        (name = "generation", description = "Prompt rendering, text generation and idea parsing"),
    ),
    info(
        title = "Frayma Core API",
        version = "0.1.0",
        description = "Prompt templates and content generation for Frayma AI",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
