use axum::{extract::Path, extract::State, Json};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::generation::dtos::{
    GenerateIdeasRequestDto, GenerateRequestDto, GeneratedIdeasDto, GeneratedTextDto,
    PreviewRequestDto, RegenerateRequestDto, RenderedPromptDto,
};
use crate::features::generation::services::GenerationOrchestrator;
use crate::features::prompts::handlers::resolve_category;
use crate::shared::types::{ApiResponse, Meta};

/// Interpolate a category's template without calling the backend
#[utoipa::path(
    post,
    path = "/api/prompts/{category}/preview",
    params(
        ("category" = String, Path, description = "Template category")
    ),
    request_body = PreviewRequestDto,
    responses(
        (status = 200, description = "Prompt rendered", body = ApiResponse<RenderedPromptDto>),
        (status = 400, description = "Rendered prompt is empty"),
        (status = 404, description = "Unknown category")
    ),
    tag = "generation"
)]
pub async fn preview_prompt(
    State(orchestrator): State<Arc<GenerationOrchestrator>>,
    Path(category): Path<String>,
    AppJson(dto): AppJson<PreviewRequestDto>,
) -> Result<Json<ApiResponse<RenderedPromptDto>>> {
    let category = resolve_category(&category)?;
    let rendered = orchestrator.render_prompt(category, &dto.variables).await?;
    Ok(Json(ApiResponse::success(Some(rendered.into()), None, None)))
}

/// Generate raw text from a category's template
#[utoipa::path(
    post,
    path = "/api/generate",
    request_body = GenerateRequestDto,
    responses(
        (status = 200, description = "Text generated", body = ApiResponse<GeneratedTextDto>),
        (status = 400, description = "Validation error or empty prompt"),
        (status = 404, description = "Unknown category"),
        (status = 429, description = "Backend rate limited the request"),
        (status = 502, description = "Backend failed or returned nothing")
    ),
    tag = "generation"
)]
pub async fn generate(
    State(orchestrator): State<Arc<GenerationOrchestrator>>,
    AppJson(dto): AppJson<GenerateRequestDto>,
) -> Result<Json<ApiResponse<GeneratedTextDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let category = resolve_category(&dto.category)?;

    let content = orchestrator
        .generate(category, &dto.variables, &dto.options.into())
        .await?;

    Ok(Json(ApiResponse::success(
        Some(GeneratedTextDto { category, content }),
        None,
        None,
    )))
}

/// Generate again, steered by a new direction
#[utoipa::path(
    post,
    path = "/api/generate/regenerate",
    request_body = RegenerateRequestDto,
    responses(
        (status = 200, description = "Text regenerated", body = ApiResponse<GeneratedTextDto>),
        (status = 400, description = "Validation error or empty prompt"),
        (status = 404, description = "Unknown category"),
        (status = 429, description = "Backend rate limited the request"),
        (status = 502, description = "Backend failed or returned nothing")
    ),
    tag = "generation"
)]
pub async fn regenerate(
    State(orchestrator): State<Arc<GenerationOrchestrator>>,
    AppJson(dto): AppJson<RegenerateRequestDto>,
) -> Result<Json<ApiResponse<GeneratedTextDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let category = resolve_category(&dto.category)?;

    let content = orchestrator
        .regenerate(category, dto.variables, &dto.new_direction, &dto.options.into())
        .await?;

    Ok(Json(ApiResponse::success(
        Some(GeneratedTextDto { category, content }),
        None,
        None,
    )))
}

/// Generate content ideas and split them into structured records
#[utoipa::path(
    post,
    path = "/api/ideas",
    request_body = GenerateIdeasRequestDto,
    responses(
        (status = 200, description = "Ideas generated", body = ApiResponse<GeneratedIdeasDto>),
        (status = 400, description = "Validation error or empty prompt"),
        (status = 404, description = "Unknown category"),
        (status = 422, description = "No valid ideas could be parsed"),
        (status = 429, description = "Backend rate limited the request"),
        (status = 502, description = "Backend failed or returned nothing")
    ),
    tag = "generation"
)]
pub async fn generate_ideas(
    State(orchestrator): State<Arc<GenerationOrchestrator>>,
    AppJson(dto): AppJson<GenerateIdeasRequestDto>,
) -> Result<Json<ApiResponse<GeneratedIdeasDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let category = resolve_category(&dto.category)?;

    let ideas = orchestrator
        .generate_ideas(
            category,
            &dto.variables,
            &dto.options.into(),
            &dto.context,
            dto.structured,
        )
        .await?;
    let total = ideas.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(GeneratedIdeasDto { category, ideas }),
        None,
        Some(Meta { total }),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::prompts::models::TemplateCategory;
    use crate::shared::test_helpers::{memory_template_store, FakeBackend, TestContext};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_generate_returns_backend_text() {
        let backend = FakeBackend::replying("Here is your post");
        let ctx = TestContext::with_backend(memory_template_store(), backend.clone());

        let response = ctx
            .server
            .post("/api/generate")
            .json(&json!({
                "category": "linkedin_post",
                "variables": {"idea": "Pricing pages lie", "callToAction": "DM me"},
                "options": {"maxTokens": 300}
            }))
            .await;

        response.assert_status_ok();
        let body: ApiResponse<GeneratedTextDto> = response.json();
        let data = body.data.unwrap();
        assert_eq!(data.content, "Here is your post");
        assert_eq!(data.category, TemplateCategory::LinkedinPost);

        let request = backend.last_request().unwrap();
        assert_eq!(request.max_tokens, 300);
        assert!(request.prompt.contains("Pricing pages lie"));
    }

    #[tokio::test]
    async fn test_generate_unknown_category_is_not_found() {
        let ctx = TestContext::new(memory_template_store());
        let response = ctx
            .server
            .post("/api/generate")
            .json(&json!({"category": "blog_post"}))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_generate_rejects_out_of_range_options() {
        let ctx = TestContext::new(memory_template_store());
        let response = ctx
            .server
            .post("/api/generate")
            .json(&json!({"category": "email", "options": {"temperature": 3.0}}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_429() {
        let ctx = TestContext::with_backend(
            memory_template_store(),
            FakeBackend::failing(429, "Too many requests"),
        );
        let response = ctx
            .server
            .post("/api/generate")
            .json(&json!({"category": "email"}))
            .await;

        response.assert_status(StatusCode::TOO_MANY_REQUESTS);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("Too many requests"));
    }

    #[tokio::test]
    async fn test_backend_server_error_maps_to_502() {
        let ctx = TestContext::with_backend(
            memory_template_store(),
            FakeBackend::failing(500, "upstream exploded"),
        );
        let response = ctx
            .server
            .post("/api/generate")
            .json(&json!({"category": "email"}))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_regenerate_sends_direction() {
        let backend = FakeBackend::echo();
        let ctx = TestContext::with_backend(memory_template_store(), backend.clone());

        let response = ctx
            .server
            .post("/api/generate/regenerate")
            .json(&json!({
                "category": "email",
                "variables": {"idea": "Cold outreach"},
                "newDirection": "make it warmer"
            }))
            .await;

        response.assert_status_ok();
        let body: ApiResponse<GeneratedTextDto> = response.json();
        assert!(body.data.unwrap().content.contains("make it warmer"));
    }

    #[tokio::test]
    async fn test_ideas_are_structured() {
        let backend = FakeBackend::replying(
            "Title: Forecasts are fiction\nNarrative: Reps sandbag.\nCTA: Audit one deal\n\n\
             Title: Demo less\nNarrative: Discovery wins.",
        );
        let ctx = TestContext::with_backend(memory_template_store(), backend);

        let response = ctx
            .server
            .post("/api/ideas")
            .json(&json!({
                "variables": {"triggerSource": "A competitor raised prices"},
                "context": {
                    "source": {"type": "text", "content": "A competitor raised prices"},
                    "productFeatures": ["feature-1"]
                }
            }))
            .await;

        response.assert_status_ok();
        let body: ApiResponse<GeneratedIdeasDto> = response.json();
        assert_eq!(body.meta.unwrap().total, 2);
        let ideas = body.data.unwrap().ideas;
        assert_eq!(ideas[0].title, "Forecasts are fiction");
        assert_eq!(ideas[0].cta, "Audit one deal");
        assert_eq!(ideas[1].product_features, vec!["feature-1".to_string()]);
        assert!(ideas[1].score.is_none());
    }

    #[tokio::test]
    async fn test_blank_ideas_response_is_bad_gateway() {
        let ctx =
            TestContext::with_backend(memory_template_store(), FakeBackend::replying("   "));
        let response = ctx.server.post("/api/ideas").json(&json!({})).await;

        response.assert_status(StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_preview_reports_unresolved_placeholders() {
        let ctx = TestContext::new(memory_template_store());
        let response = ctx
            .server
            .post("/api/prompts/email/preview")
            .json(&json!({"variables": {"idea": "Quarterly planning"}}))
            .await;

        response.assert_status_ok();
        let body: ApiResponse<RenderedPromptDto> = response.json();
        let rendered = body.data.unwrap();
        assert!(rendered.prompt.contains("Quarterly planning"));
        assert!(rendered.prompt.contains("{{icpProfile}}"));
        assert!(rendered
            .unresolved_placeholders
            .contains(&"icpProfile".to_string()));
        assert!(!rendered.unresolved_placeholders.contains(&"idea".to_string()));
    }

    #[tokio::test]
    async fn test_preview_of_blank_override_is_bad_request() {
        let store = memory_template_store();
        let ctx = TestContext::new(store);
        ctx.server
            .put("/api/prompts/email")
            .json(&json!({"template": "{{only}}"}))
            .await
            .assert_status_ok();

        let response = ctx
            .server
            .post("/api/prompts/email/preview")
            .json(&json!({"variables": {"only": ""}}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
