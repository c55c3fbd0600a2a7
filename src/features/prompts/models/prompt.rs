use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Use a template is selected for
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    ContentTriggers,
    HeadlinesGeneration,
    OutlineGeneration,
    IntroGeneration,
    BodyGeneration,
    ConclusionGeneration,
    FullArticle,
    LinkedinPost,
    Email,
    SuccessStory,
}

impl TemplateCategory {
    /// Every category, in listing order
    pub const ALL: [TemplateCategory; 10] = [
        TemplateCategory::ContentTriggers,
        TemplateCategory::HeadlinesGeneration,
        TemplateCategory::OutlineGeneration,
        TemplateCategory::IntroGeneration,
        TemplateCategory::BodyGeneration,
        TemplateCategory::ConclusionGeneration,
        TemplateCategory::FullArticle,
        TemplateCategory::LinkedinPost,
        TemplateCategory::Email,
        TemplateCategory::SuccessStory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateCategory::ContentTriggers => "content_triggers",
            TemplateCategory::HeadlinesGeneration => "headlines_generation",
            TemplateCategory::OutlineGeneration => "outline_generation",
            TemplateCategory::IntroGeneration => "intro_generation",
            TemplateCategory::BodyGeneration => "body_generation",
            TemplateCategory::ConclusionGeneration => "conclusion_generation",
            TemplateCategory::FullArticle => "full_article",
            TemplateCategory::LinkedinPost => "linkedin_post",
            TemplateCategory::Email => "email",
            TemplateCategory::SuccessStory => "success_story",
        }
    }
}

impl FromStr for TemplateCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("Unknown template category '{}'", s))
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prompt template record.
///
/// `variables` documents what the body expects; interpolation does not check it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptTemplate {
    /// Unique per template version
    pub id: String,
    pub name: String,
    pub description: String,
    /// Raw body with `{{variableName}}` placeholders
    pub template: String,
    pub variables: Vec<String>,
    pub category: TemplateCategory,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_str() {
        for category in TemplateCategory::ALL {
            assert_eq!(category.as_str().parse::<TemplateCategory>(), Ok(category));
        }
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        assert!("blog_post".parse::<TemplateCategory>().is_err());
        assert!("ContentTriggers".parse::<TemplateCategory>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&TemplateCategory::HeadlinesGeneration).unwrap();
        assert_eq!(json, "\"headlines_generation\"");
        assert_eq!(TemplateCategory::LinkedinPost.to_string(), "linkedin_post");
    }

    #[test]
    fn test_template_serializes_camel_case() {
        let now = Utc::now();
        let template = PromptTemplate {
            id: "t1".to_string(),
            name: "Triggers".to_string(),
            description: String::new(),
            template: "{{x}}".to_string(),
            variables: vec!["x".to_string()],
            category: TemplateCategory::ContentTriggers,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&template).unwrap();
        assert_eq!(value["isActive"], true);
        assert_eq!(value["category"], "content_triggers");
        assert!(value.get("createdAt").is_some());
    }
}
