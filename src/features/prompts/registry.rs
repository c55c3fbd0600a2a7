use chrono::{DateTime, Utc};

use crate::features::prompts::models::{PromptTemplate, TemplateCategory};

/// Built-in template for a category, compiled into the binary
#[derive(Debug, Clone, Copy)]
pub struct DefaultTemplateDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub template: &'static str,
    pub variables: &'static [&'static str],
}

const CONTENT_TRIGGERS: DefaultTemplateDefinition = DefaultTemplateDefinition {
    name: "Content Triggers",
    description: "Turns a content trigger into PLS content ideas (Title / Narrative / Product tie-in / CTA)",
    template: include_str!("../../../templates/prompts/content_triggers.txt"),
    variables: &[
        "icpProfile",
        "narrativeAnchor",
        "narrativeItem",
        "productContext",
        "productFeatures",
        "triggerSource",
    ],
};

const HEADLINES_GENERATION: DefaultTemplateDefinition = DefaultTemplateDefinition {
    name: "Headlines Generation",
    description: "Headline options for an article topic",
    template: include_str!("../../../templates/prompts/headlines_generation.txt"),
    variables: &[
        "articleTopic",
        "icpProfile",
        "narrativeAnchor",
        "productContext",
        "headlineCount",
    ],
};

const OUTLINE_GENERATION: DefaultTemplateDefinition = DefaultTemplateDefinition {
    name: "Outline Generation",
    description: "Five-part PLS article outline for a chosen headline",
    template: include_str!("../../../templates/prompts/outline_generation.txt"),
    variables: &[
        "headline",
        "icpProfile",
        "narrativeAnchor",
        "productContext",
        "keyPoints",
    ],
};

const INTRO_GENERATION: DefaultTemplateDefinition = DefaultTemplateDefinition {
    name: "Introduction Generation",
    description: "Article introduction from headline and outline",
    template: include_str!("../../../templates/prompts/intro_generation.txt"),
    variables: &["headline", "outline", "icpProfile", "authorVoice"],
};

const BODY_GENERATION: DefaultTemplateDefinition = DefaultTemplateDefinition {
    name: "Body Generation",
    description: "Article body following the outline",
    template: include_str!("../../../templates/prompts/body_generation.txt"),
    variables: &[
        "headline",
        "outline",
        "introduction",
        "productContext",
        "productFeatures",
        "authorVoice",
    ],
};

const CONCLUSION_GENERATION: DefaultTemplateDefinition = DefaultTemplateDefinition {
    name: "Conclusion Generation",
    description: "Article conclusion ending on the call to action",
    template: include_str!("../../../templates/prompts/conclusion_generation.txt"),
    variables: &["headline", "body", "callToAction", "authorVoice"],
};

const FULL_ARTICLE: DefaultTemplateDefinition = DefaultTemplateDefinition {
    name: "Full Article",
    description: "Complete article in one pass",
    template: include_str!("../../../templates/prompts/full_article.txt"),
    variables: &[
        "headline",
        "icpProfile",
        "narrativeAnchor",
        "productContext",
        "productFeatures",
        "authorVoice",
        "wordCount",
    ],
};

const LINKEDIN_POST: DefaultTemplateDefinition = DefaultTemplateDefinition {
    name: "LinkedIn Post",
    description: "First-person LinkedIn post from an idea",
    template: include_str!("../../../templates/prompts/linkedin_post.txt"),
    variables: &[
        "idea",
        "icpProfile",
        "authorVoice",
        "productContext",
        "callToAction",
    ],
};

const EMAIL: DefaultTemplateDefinition = DefaultTemplateDefinition {
    name: "Email",
    description: "Short outbound email with subject line",
    template: include_str!("../../../templates/prompts/email.txt"),
    variables: &[
        "idea",
        "icpProfile",
        "productContext",
        "emailGoal",
        "callToAction",
    ],
};

const SUCCESS_STORY: DefaultTemplateDefinition = DefaultTemplateDefinition {
    name: "Success Story",
    description: "Customer success story with the customer as the hero",
    template: include_str!("../../../templates/prompts/success_story.txt"),
    variables: &[
        "customerName",
        "customerChallenge",
        "solutionUsed",
        "results",
        "icpProfile",
        "productContext",
    ],
};

/// Built-in definition for `category`. Every category has one.
pub fn default_definition(category: TemplateCategory) -> &'static DefaultTemplateDefinition {
    match category {
        TemplateCategory::ContentTriggers => &CONTENT_TRIGGERS,
        TemplateCategory::HeadlinesGeneration => &HEADLINES_GENERATION,
        TemplateCategory::OutlineGeneration => &OUTLINE_GENERATION,
        TemplateCategory::IntroGeneration => &INTRO_GENERATION,
        TemplateCategory::BodyGeneration => &BODY_GENERATION,
        TemplateCategory::ConclusionGeneration => &CONCLUSION_GENERATION,
        TemplateCategory::FullArticle => &FULL_ARTICLE,
        TemplateCategory::LinkedinPost => &LINKEDIN_POST,
        TemplateCategory::Email => &EMAIL,
        TemplateCategory::SuccessStory => &SUCCESS_STORY,
    }
}

/// Materialize the built-in template for `category`, seeded at `seeded_at`
pub fn default_template(category: TemplateCategory, seeded_at: DateTime<Utc>) -> PromptTemplate {
    let definition = default_definition(category);
    PromptTemplate {
        id: format!("default-{}-v1", category.as_str()),
        name: definition.name.to_string(),
        description: definition.description.to_string(),
        template: definition.template.to_string(),
        variables: definition.variables.iter().map(|v| v.to_string()).collect(),
        category,
        is_active: true,
        created_at: seeded_at,
        updated_at: seeded_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::prompts::placeholders;

    #[test]
    fn test_every_category_has_a_non_empty_default() {
        for category in TemplateCategory::ALL {
            let template = default_template(category, Utc::now());
            assert!(!template.template.trim().is_empty(), "{} is empty", category);
            assert_eq!(template.category, category);
            assert!(template.is_active);
        }
    }

    #[test]
    fn test_declared_variables_match_placeholders() {
        for category in TemplateCategory::ALL {
            let definition = default_definition(category);
            let mut declared: Vec<&str> = definition.variables.to_vec();
            let mut found = placeholders(definition.template);
            declared.sort_unstable();
            found.sort_unstable();
            assert_eq!(declared, found, "variables drifted for {}", category);
        }
    }

    #[test]
    fn test_default_ids_are_unique() {
        let now = Utc::now();
        let mut ids: Vec<String> = TemplateCategory::ALL
            .into_iter()
            .map(|c| default_template(c, now).id)
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), TemplateCategory::ALL.len());
    }

    #[test]
    fn test_content_triggers_asks_for_title_markers() {
        assert!(CONTENT_TRIGGERS.template.contains("Title:"));
    }
}
