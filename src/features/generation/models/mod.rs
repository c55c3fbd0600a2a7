pub mod idea;

pub use idea::{
    GeneratedIdea, IdeaBatch, IdeaContext, IdeaDraft, IdeaScore, IdeaSource, IdeaSourceKind,
    NarrativeAnchor,
};
