pub mod prompt;

pub use prompt::{PromptTemplate, TemplateCategory};
