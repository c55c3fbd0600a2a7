pub mod idea_parser;
pub mod orchestrator;

pub use idea_parser::{parse_ideas, structure_idea};
pub use orchestrator::{
    BackendOptions, GenerationDefaults, GenerationOrchestrator, RenderedPrompt,
};
