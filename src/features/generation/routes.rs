use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::generation::handlers;
use crate::features::generation::services::GenerationOrchestrator;

/// Routes that render prompts and call the generation backend
pub fn routes(orchestrator: Arc<GenerationOrchestrator>) -> Router {
    Router::new()
        .route("/api/generate", post(handlers::generate))
        .route("/api/generate/regenerate", post(handlers::regenerate))
        .route("/api/ideas", post(handlers::generate_ideas))
        .route(
            "/api/prompts/{category}/preview",
            post(handlers::preview_prompt),
        )
        .with_state(orchestrator)
}
