use axum::{extract::Path, extract::State, Json};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::prompts::dtos::{
    PromptTemplateResponseDto, ResetResultDto, UpdatePromptTemplateDto,
};
use crate::features::prompts::models::TemplateCategory;
use crate::features::prompts::services::{TemplateEntry, TemplateStore};
use crate::shared::types::{ApiResponse, Meta};

/// Map a path or body category onto a known one; unknown categories are 404
pub fn resolve_category(raw: &str) -> Result<TemplateCategory> {
    raw.parse::<TemplateCategory>().map_err(AppError::NotFound)
}

fn persistence_message(persisted: bool) -> Option<String> {
    (!persisted).then(|| {
        "Change applied but could not be persisted; it will be lost on restart".to_string()
    })
}

/// List the effective template for every category
#[utoipa::path(
    get,
    path = "/api/prompts",
    responses(
        (status = 200, description = "Templates retrieved successfully", body = ApiResponse<Vec<PromptTemplateResponseDto>>)
    ),
    tag = "prompts"
)]
pub async fn list_templates(
    State(store): State<Arc<TemplateStore>>,
) -> Result<Json<ApiResponse<Vec<PromptTemplateResponseDto>>>> {
    let templates: Vec<PromptTemplateResponseDto> = store
        .list_templates()
        .await
        .into_iter()
        .map(PromptTemplateResponseDto::from)
        .collect();
    let total = templates.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(templates),
        None,
        Some(Meta { total }),
    )))
}

/// Get the effective template for a category
#[utoipa::path(
    get,
    path = "/api/prompts/{category}",
    params(
        ("category" = String, Path, description = "Template category, e.g. `content_triggers`")
    ),
    responses(
        (status = 200, description = "Template retrieved successfully", body = ApiResponse<PromptTemplateResponseDto>),
        (status = 404, description = "Unknown category")
    ),
    tag = "prompts"
)]
pub async fn get_template(
    State(store): State<Arc<TemplateStore>>,
    Path(category): Path<String>,
) -> Result<Json<ApiResponse<PromptTemplateResponseDto>>> {
    let category = resolve_category(&category)?;

    let entry = store.get_entry(category).await;
    Ok(Json(ApiResponse::success(Some(entry.into()), None, None)))
}

/// Override the template for a category
#[utoipa::path(
    put,
    path = "/api/prompts/{category}",
    params(
        ("category" = String, Path, description = "Template category")
    ),
    request_body = UpdatePromptTemplateDto,
    responses(
        (status = 200, description = "Template override saved", body = ApiResponse<PromptTemplateResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Unknown category")
    ),
    tag = "prompts"
)]
pub async fn update_template(
    State(store): State<Arc<TemplateStore>>,
    Path(category): Path<String>,
    AppJson(dto): AppJson<UpdatePromptTemplateDto>,
) -> Result<Json<ApiResponse<PromptTemplateResponseDto>>> {
    let category = resolve_category(&category)?;
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (template, persisted) = store.set_template(category, dto.into()).await;
    let entry = TemplateEntry {
        is_override: template.is_active,
        template,
    };

    Ok(Json(ApiResponse::success(
        Some(entry.into()),
        persistence_message(persisted.is_ok()),
        None,
    )))
}

/// Discard the override for a category
#[utoipa::path(
    post,
    path = "/api/prompts/{category}/reset",
    params(
        ("category" = String, Path, description = "Template category")
    ),
    responses(
        (status = 200, description = "Template reset to default", body = ApiResponse<ResetResultDto>),
        (status = 404, description = "Unknown category")
    ),
    tag = "prompts"
)]
pub async fn reset_template(
    State(store): State<Arc<TemplateStore>>,
    Path(category): Path<String>,
) -> Result<Json<ApiResponse<ResetResultDto>>> {
    let category = resolve_category(&category)?;
    let persisted = store.reset_template(category).await.is_ok();

    Ok(Json(ApiResponse::success(
        Some(ResetResultDto {
            category: Some(category),
            persisted,
        }),
        persistence_message(persisted),
        None,
    )))
}

/// Discard every override
#[utoipa::path(
    post,
    path = "/api/prompts/reset",
    responses(
        (status = 200, description = "All templates reset to defaults", body = ApiResponse<ResetResultDto>)
    ),
    tag = "prompts"
)]
pub async fn reset_all_templates(
    State(store): State<Arc<TemplateStore>>,
) -> Result<Json<ApiResponse<ResetResultDto>>> {
    let persisted = store.reset_all().await.is_ok();

    Ok(Json(ApiResponse::success(
        Some(ResetResultDto {
            category: None,
            persisted,
        }),
        persistence_message(persisted),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{memory_template_store, TestContext};
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_resolve_category() {
        assert_eq!(
            resolve_category("email").unwrap(),
            TemplateCategory::Email
        );
        assert!(matches!(
            resolve_category("blog_post"),
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_templates_reports_total() {
        let ctx = TestContext::new(memory_template_store());
        let response = ctx.server.get("/api/prompts").await;

        response.assert_status_ok();
        let body: ApiResponse<Vec<PromptTemplateResponseDto>> = response.json();
        assert!(body.success);
        assert_eq!(body.meta.unwrap().total, TemplateCategory::ALL.len() as i64);
        assert!(body.data.unwrap().iter().all(|t| !t.is_override));
    }

    #[tokio::test]
    async fn test_unknown_category_is_not_found() {
        let ctx = TestContext::new(memory_template_store());
        let response = ctx.server.get("/api/prompts/blog_post").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_set_and_reset_round_trip() {
        let ctx = TestContext::new(memory_template_store());

        let response = ctx
            .server
            .put("/api/prompts/email")
            .json(&json!({"template": "Hi {{firstName}}", "name": "Short email"}))
            .await;
        response.assert_status_ok();
        let body: ApiResponse<PromptTemplateResponseDto> = response.json();
        let saved = body.data.unwrap();
        assert!(saved.is_override);
        assert_eq!(saved.variables, vec!["firstName".to_string()]);
        assert_eq!(saved.category, TemplateCategory::Email);
        assert!(body.message.is_none());

        let fetched: ApiResponse<PromptTemplateResponseDto> =
            ctx.server.get("/api/prompts/email").await.json();
        assert_eq!(fetched.data.unwrap().template, "Hi {{firstName}}");

        let reset = ctx.server.post("/api/prompts/email/reset").await;
        reset.assert_status_ok();
        let reset: ApiResponse<ResetResultDto> = reset.json();
        assert!(reset.data.unwrap().persisted);

        let fetched: ApiResponse<PromptTemplateResponseDto> =
            ctx.server.get("/api/prompts/email").await.json();
        let fetched = fetched.data.unwrap();
        assert!(!fetched.is_override);
        assert_eq!(fetched.id, "default-email-v1");
    }

    #[tokio::test]
    async fn test_reset_all_clears_overrides() {
        let ctx = TestContext::new(memory_template_store());
        ctx.server
            .put("/api/prompts/linkedin_post")
            .json(&json!({"template": "post"}))
            .await
            .assert_status_ok();

        ctx.server
            .post("/api/prompts/reset")
            .await
            .assert_status_ok();

        let body: ApiResponse<Vec<PromptTemplateResponseDto>> =
            ctx.server.get("/api/prompts").await.json();
        assert!(body.data.unwrap().iter().all(|t| !t.is_override));
    }

    #[tokio::test]
    async fn test_blank_template_is_rejected() {
        let ctx = TestContext::new(memory_template_store());
        let response = ctx
            .server
            .put("/api/prompts/email")
            .json(&json!({"template": "   "}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unpersisted_override_is_reported() {
        let ctx = TestContext::new(crate::shared::test_helpers::failing_template_store());
        let response = ctx
            .server
            .put("/api/prompts/email")
            .json(&json!({"template": "kept in memory"}))
            .await;

        response.assert_status_ok();
        let body: ApiResponse<PromptTemplateResponseDto> = response.json();
        assert!(body.message.unwrap().contains("could not be persisted"));
        assert_eq!(body.data.unwrap().template, "kept in memory");
    }
}
