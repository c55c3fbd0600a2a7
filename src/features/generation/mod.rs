//! Content generation: template resolution, interpolation, backend calls and
//! idea parsing.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/prompts/{category}/preview` | Render a prompt without generating |
//! | POST | `/api/generate` | Generate raw text |
//! | POST | `/api/generate/regenerate` | Generate again with a new direction |
//! | POST | `/api/ideas` | Generate and structure content ideas |
//!
//! ## Error mapping
//!
//! | Error | Status |
//! |-------|--------|
//! | `EmptyPrompt` | 400 |
//! | `BackendRequest` (backend 429) | 429 |
//! | `BackendRequest` (other), `Network`, `EmptyResponse` | 502 |
//! | `NoIdeasParsed` | 422 |

pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use error::GenerationError;
pub use services::GenerationOrchestrator;
