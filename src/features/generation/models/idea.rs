use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::llm::LlmResponse;

/// Where the material behind an idea came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum IdeaSourceKind {
    Text,
    File,
    Url,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IdeaSource {
    #[serde(rename = "type")]
    pub kind: IdeaSourceKind,
    pub content: String,
}

/// Which part of the narrative an idea speaks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeAnchor {
    Belief,
    Pain,
    Struggle,
    Transformation,
}

/// Relevance rating, 0 to 3
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "RawIdeaScore")]
pub struct IdeaScore {
    pub value: u8,
    pub label: String,
}

#[derive(Deserialize)]
struct RawIdeaScore {
    value: u8,
}

impl IdeaScore {
    pub const MAX: u8 = 3;

    pub fn new(value: u8) -> Result<Self, String> {
        let label = match value {
            0 => "Not relevant",
            1 => "Weak",
            2 => "Good",
            3 => "Strong",
            other => {
                return Err(format!(
                    "Idea score must be between 0 and {}, got {}",
                    Self::MAX,
                    other
                ))
            }
        };
        Ok(Self {
            value,
            label: label.to_string(),
        })
    }
}

impl TryFrom<RawIdeaScore> for IdeaScore {
    type Error = String;

    fn try_from(raw: RawIdeaScore) -> Result<Self, Self::Error> {
        IdeaScore::new(raw.value)
    }
}

/// Caller-owned references copied onto every idea of a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdeaContext {
    pub source: Option<IdeaSource>,
    pub icp_id: Option<String>,
    pub narrative_anchor: Option<NarrativeAnchor>,
    pub narrative_item_id: Option<String>,
    #[serde(default)]
    pub product_features: Vec<String>,
}

/// A structured content idea
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedIdea {
    pub id: String,
    pub title: String,
    pub narrative: String,
    pub product_tie_in: String,
    pub cta: String,
    pub created_at: DateTime<Utc>,
    pub score: Option<IdeaScore>,
    pub source: Option<IdeaSource>,
    pub icp_id: Option<String>,
    pub narrative_anchor: Option<NarrativeAnchor>,
    pub narrative_item_id: Option<String>,
    pub product_features: Vec<String>,
}

impl GeneratedIdea {
    /// Fresh, unscored idea carrying the caller's references
    pub fn from_draft(draft: IdeaDraft, context: &IdeaContext) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            title: draft.title,
            narrative: draft.narrative,
            product_tie_in: draft.product_tie_in,
            cta: draft.cta,
            created_at: Utc::now(),
            score: None,
            source: context.source.clone(),
            icp_id: context.icp_id.clone(),
            narrative_anchor: context.narrative_anchor,
            narrative_item_id: context.narrative_item_id.clone(),
            product_features: context.product_features.clone(),
        }
    }
}

/// Idea fields as produced by the model, before ids and references are attached
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct IdeaDraft {
    /// Short, specific headline for the idea
    pub title: String,
    /// The story or angle, in two to four sentences
    pub narrative: String,
    /// How the product naturally fits the story
    pub product_tie_in: String,
    /// The single action the reader should take
    pub cta: String,
}

impl IdeaDraft {
    pub fn is_blank(&self) -> bool {
        [&self.title, &self.narrative, &self.product_tie_in, &self.cta]
            .iter()
            .all(|field| field.trim().is_empty())
    }
}

/// Structured-output answer: a list of ideas
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct IdeaBatch {
    pub ideas: Vec<IdeaDraft>,

    #[serde(skip)]
    pub fallback_error: Option<String>,
}

impl LlmResponse for IdeaBatch {
    fn mark_as_fallback(&mut self, error_message: String) {
        self.fallback_error = Some(error_message);
    }

    fn is_success(&self) -> bool {
        self.fallback_error.is_none()
    }
}
