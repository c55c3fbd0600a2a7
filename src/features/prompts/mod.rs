//! Prompt templates: built-in defaults per category plus persisted overrides.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/prompts` | List effective templates |
//! | GET | `/api/prompts/{category}` | Effective template for a category |
//! | PUT | `/api/prompts/{category}` | Set an override |
//! | POST | `/api/prompts/{category}/reset` | Restore the default |
//! | POST | `/api/prompts/reset` | Restore every default |
//!
//! Previews (`/api/prompts/{category}/preview`) are served by the generation
//! feature, which owns rendering.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod registry;
pub mod routes;
pub mod services;

pub use services::TemplateStore;
