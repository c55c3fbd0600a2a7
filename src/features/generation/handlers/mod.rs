pub mod generation_handler;

pub use generation_handler::{
    __path_generate, __path_generate_ideas, __path_preview_prompt, __path_regenerate, generate,
    generate_ideas, preview_prompt, regenerate,
};
