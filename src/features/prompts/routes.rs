use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::prompts::{handlers, services::TemplateStore};

/// Routes for reading, overriding and resetting templates
pub fn routes(store: Arc<TemplateStore>) -> Router {
    Router::new()
        .route("/api/prompts", get(handlers::list_templates))
        .route("/api/prompts/reset", post(handlers::reset_all_templates))
        .route(
            "/api/prompts/{category}",
            get(handlers::get_template).put(handlers::update_template),
        )
        .route(
            "/api/prompts/{category}/reset",
            post(handlers::reset_template),
        )
        .with_state(store)
}
