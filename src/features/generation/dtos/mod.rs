pub mod generation_dto;

pub use generation_dto::{
    GenerateIdeasRequestDto, GenerateRequestDto, GeneratedIdeasDto, GeneratedTextDto,
    GenerationOptionsDto, PreviewRequestDto, RegenerateRequestDto, RenderedPromptDto,
};
