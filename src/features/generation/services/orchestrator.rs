use std::sync::Arc;

use serde_json::Value;

use crate::core::config::GenerationConfig;
use crate::features::generation::error::GenerationError;
use crate::features::generation::models::{GeneratedIdea, IdeaBatch, IdeaContext, IdeaDraft};
use crate::features::generation::services::{parse_ideas, structure_idea};
use crate::features::prompts::models::{PromptTemplate, TemplateCategory};
use crate::features::prompts::TemplateStore;
use crate::shared::constants::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, NEW_DIRECTION_VARIABLE};
use crate::shared::llm::{parse_with_fallback, GenerationBackend, GenerationRequest, LlmResponse};
use crate::shared::prompts::{interpolate, placeholders, VariableBag};

/// Per-call overrides; unset fields use the orchestrator defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationDefaults {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl From<&GenerationConfig> for GenerationDefaults {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            max_tokens: config.default_max_tokens,
            temperature: config.default_temperature,
        }
    }
}

/// An interpolated prompt, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPrompt {
    pub category: TemplateCategory,
    pub template_id: String,
    pub prompt: String,
    /// Placeholders in the template with no value in the bag, left as-is
    pub unresolved: Vec<String>,
}

/// Template resolution, interpolation and backend invocation.
pub struct GenerationOrchestrator {
    templates: Arc<TemplateStore>,
    backend: Arc<dyn GenerationBackend>,
    defaults: GenerationDefaults,
}

impl std::fmt::Debug for GenerationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationOrchestrator")
            .field("templates", &self.templates)
            .field("backend_model", &self.backend.default_model())
            .field("defaults", &self.defaults)
            .finish()
    }
}

impl GenerationOrchestrator {
    pub fn new(
        templates: Arc<TemplateStore>,
        backend: Arc<dyn GenerationBackend>,
        defaults: GenerationDefaults,
    ) -> Self {
        Self {
            templates,
            backend,
            defaults,
        }
    }

    /// Resolve and interpolate without calling the backend
    pub async fn render_prompt(
        &self,
        category: TemplateCategory,
        variables: &VariableBag,
    ) -> Result<RenderedPrompt, GenerationError> {
        let template = self.templates.get_template(category).await;
        render(template, variables)
    }

    /// Render the category's template and return the backend's raw text
    pub async fn generate(
        &self,
        category: TemplateCategory,
        variables: &VariableBag,
        options: &BackendOptions,
    ) -> Result<String, GenerationError> {
        let rendered = self.render_prompt(category, variables).await?;
        self.complete(category, rendered.prompt, options).await
    }

    /// Same as `generate`, steered by the caller's new direction
    pub async fn regenerate(
        &self,
        category: TemplateCategory,
        mut variables: VariableBag,
        new_direction: &str,
        options: &BackendOptions,
    ) -> Result<String, GenerationError> {
        variables.insert(
            NEW_DIRECTION_VARIABLE.to_string(),
            Value::String(new_direction.to_string()),
        );

        let template = self.templates.get_template(category).await;
        let has_slot = placeholders(&template.template)
            .iter()
            .any(|name| name == NEW_DIRECTION_VARIABLE);
        let mut rendered = render(template, &variables)?;

        if !has_slot && !new_direction.trim().is_empty() {
            rendered.prompt = format!(
                "{}\n\nNew direction: {}",
                rendered.prompt.trim_end(),
                new_direction.trim()
            );
        }

        tracing::info!("Regenerating '{}' with a new direction", category);
        self.complete(category, rendered.prompt, options).await
    }

    /// Generate, split into ideas and structure each one.
    ///
    /// With `structured`, the backend is asked for JSON first; unreadable JSON
    /// falls back to free-text splitting.
    pub async fn generate_ideas(
        &self,
        category: TemplateCategory,
        variables: &VariableBag,
        options: &BackendOptions,
        context: &IdeaContext,
        structured: bool,
    ) -> Result<Vec<GeneratedIdea>, GenerationError> {
        let rendered = self.render_prompt(category, variables).await?;

        let drafts = if structured {
            let prompt = format!("{}{}", rendered.prompt, IdeaBatch::format_instruction());
            let raw = self.complete(category, prompt, options).await?;
            structured_drafts(&raw)?
        } else {
            let raw = self.complete(category, rendered.prompt, options).await?;
            text_drafts(&raw)?
        };

        tracing::info!("Parsed {} idea(s) for '{}'", drafts.len(), category);

        Ok(drafts
            .into_iter()
            .map(|draft| GeneratedIdea::from_draft(draft, context))
            .collect())
    }

    async fn complete(
        &self,
        category: TemplateCategory,
        prompt: String,
        options: &BackendOptions,
    ) -> Result<String, GenerationError> {
        let request = GenerationRequest {
            max_tokens: options.max_tokens.unwrap_or(self.defaults.max_tokens),
            temperature: options.temperature.unwrap_or(self.defaults.temperature),
            model: options
                .model
                .clone()
                .unwrap_or_else(|| self.backend.default_model().to_string()),
            prompt,
        };

        tracing::info!(
            category = %category,
            model = %request.model,
            prompt_len = request.prompt.len(),
            "Calling generation backend"
        );

        let text = self.backend.complete(&request).await.map_err(|e| {
            tracing::warn!(category = %category, "Generation backend failed: {}", e);
            GenerationError::from(e)
        })?;

        if text.trim().is_empty() {
            tracing::warn!(category = %category, "Generation backend returned no text");
            return Err(GenerationError::EmptyResponse);
        }

        tracing::info!(
            category = %category,
            response_len = text.len(),
            "Generation completed"
        );
        Ok(text)
    }
}

fn render(
    template: PromptTemplate,
    variables: &VariableBag,
) -> Result<RenderedPrompt, GenerationError> {
    let prompt = interpolate(&template.template, variables);

    if prompt.trim().is_empty() {
        tracing::warn!("Rendered prompt for '{}' is empty", template.category);
        return Err(GenerationError::EmptyPrompt);
    }

    let unresolved = placeholders(&template.template)
        .into_iter()
        .filter(|name| !variables.contains_key(name))
        .collect();

    Ok(RenderedPrompt {
        category: template.category,
        template_id: template.id,
        prompt,
        unresolved,
    })
}

fn text_drafts(raw: &str) -> Result<Vec<IdeaDraft>, GenerationError> {
    Ok(parse_ideas(raw)?
        .iter()
        .map(|fragment| structure_idea(fragment))
        .collect())
}

fn structured_drafts(raw: &str) -> Result<Vec<IdeaDraft>, GenerationError> {
    let batch: IdeaBatch = parse_with_fallback(raw);
    if batch.is_success() {
        let drafts: Vec<IdeaDraft> = batch
            .ideas
            .into_iter()
            .filter(|draft| !draft.is_blank())
            .collect();
        if !drafts.is_empty() {
            return Ok(drafts);
        }
        tracing::warn!("Structured response held no ideas, falling back to text parsing");
    }
    text_drafts(raw)
}
