pub mod generation;
pub mod prompts;

use std::sync::Arc;

use axum::Router;

use crate::features::generation::GenerationOrchestrator;
use crate::features::prompts::TemplateStore;

/// Every feature router, merged
pub fn routes(templates: Arc<TemplateStore>, orchestrator: Arc<GenerationOrchestrator>) -> Router {
    Router::new()
        .merge(prompts::routes::routes(templates))
        .merge(generation::routes::routes(orchestrator))
}
