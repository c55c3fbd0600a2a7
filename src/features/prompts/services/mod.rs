pub mod template_store;

pub use template_store::{TemplateDraft, TemplateEntry, TemplateStore};
