//! Splitting and labelling of free-text idea lists.

use lazy_static::lazy_static;
use regex::Regex;

use crate::features::generation::error::GenerationError;
use crate::features::generation::models::IdeaDraft;

lazy_static! {
    /// `Title` followed by `-`, `–` or `:`; each match starts a new idea
    static ref TITLE_MARKER_RE: Regex = Regex::new(r"(?i)title\s*[-–:]").unwrap();

    static ref BLANK_LINE_RE: Regex = Regex::new(r"\n\s*\n").unwrap();

    /// A labelled line such as `**Product tie-in:** ...` or `1. Title - ...`
    static ref LABEL_RE: Regex = Regex::new(
        r"(?i)^\s*(?:\d+[.)]\s*)?(?:[-*•#]+\s*)?(?:\*\*)?(title|narrative|story|product\s+tie[-\s]?in|cta|call\s+to\s+action)(?:\*\*)?\s*[-–:]\s*(?:\*\*)?\s*(.*)$"
    )
    .unwrap();
}

/// Split raw model output into idea fragments.
///
/// Splits before every `Title` marker; without markers, splits on blank
/// lines. Fragments are trimmed and empty ones dropped.
pub fn parse_ideas(raw: &str) -> Result<Vec<String>, GenerationError> {
    let starts: Vec<usize> = TITLE_MARKER_RE.find_iter(raw).map(|m| m.start()).collect();

    let fragments: Vec<String> = if starts.is_empty() {
        BLANK_LINE_RE
            .split(raw)
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        let mut bounds = Vec::with_capacity(starts.len() + 2);
        bounds.push(0);
        bounds.extend(starts);
        bounds.push(raw.len());
        bounds.dedup();

        bounds
            .windows(2)
            .map(|w| raw[w[0]..w[1]].trim())
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect()
    };

    if fragments.is_empty() {
        return Err(GenerationError::NoIdeasParsed);
    }

    Ok(fragments)
}

#[derive(Clone, Copy, PartialEq)]
enum Field {
    Title,
    Narrative,
    ProductTieIn,
    Cta,
}

fn field_for(label: &str) -> Field {
    let label = label.to_lowercase();
    if label == "title" {
        Field::Title
    } else if label == "narrative" || label == "story" {
        Field::Narrative
    } else if label.starts_with("product") {
        Field::ProductTieIn
    } else {
        Field::Cta
    }
}

/// Best-effort split of one fragment into labelled fields.
///
/// Unlabelled text before any label becomes the title (first line) and the
/// narrative (the rest). Text after a label continues that field.
pub fn structure_idea(fragment: &str) -> IdeaDraft {
    let mut title: Vec<&str> = Vec::new();
    let mut narrative: Vec<&str> = Vec::new();
    let mut product_tie_in: Vec<&str> = Vec::new();
    let mut cta: Vec<&str> = Vec::new();
    let mut loose: Vec<&str> = Vec::new();
    let mut current: Option<Field> = None;

    for line in fragment.lines() {
        let (field, text) = match LABEL_RE.captures(line) {
            Some(caps) => {
                let field = field_for(caps.get(1).map_or("", |m| m.as_str()));
                current = Some(field);
                (Some(field), caps.get(2).map_or("", |m| m.as_str()))
            }
            None => (current, line),
        };

        let text = text.trim().trim_end_matches("**").trim();
        if text.is_empty() {
            continue;
        }

        match field {
            Some(Field::Title) => title.push(text),
            Some(Field::Narrative) => narrative.push(text),
            Some(Field::ProductTieIn) => product_tie_in.push(text),
            Some(Field::Cta) => cta.push(text),
            None => loose.push(text),
        }
    }

    if title.is_empty() && !loose.is_empty() {
        title.push(loose.remove(0));
    }
    loose.extend(narrative);

    IdeaDraft {
        title: title.join(" "),
        narrative: loose.join("\n"),
        product_tie_in: product_tie_in.join("\n"),
        cta: cta.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_title_markers() {
        let raw = "Title: A\nNarrative: one\n\nTitle - B\nNarrative: two\nTITLE– C";
        let ideas = parse_ideas(raw).unwrap();
        assert_eq!(ideas.len(), 3);
        assert!(ideas[0].starts_with("Title: A"));
        assert!(ideas[1].starts_with("Title - B"));
        assert_eq!(ideas[2], "TITLE– C");
    }

    #[test]
    fn test_mixed_marker_separators() {
        let ideas = parse_ideas("Title - A\nbody1\nTitle: B\nbody2").unwrap();
        assert_eq!(ideas, vec!["Title - A\nbody1", "Title: B\nbody2"]);
    }

    #[test]
    fn test_text_before_first_marker_is_its_own_fragment() {
        let ideas = parse_ideas("Here you go:\nTitle: Only one").unwrap();
        assert_eq!(ideas, vec!["Here you go:", "Title: Only one"]);
    }

    #[test]
    fn test_falls_back_to_blank_lines() {
        let raw = "First idea\nwith detail\n\n   \nSecond idea\n\nThird";
        let ideas = parse_ideas(raw).unwrap();
        assert_eq!(ideas, vec!["First idea\nwith detail", "Second idea", "Third"]);
    }

    #[test]
    fn test_single_block_without_markers_is_one_idea() {
        assert_eq!(parse_ideas("just one thought").unwrap().len(), 1);
    }

    #[test]
    fn test_blank_input_has_no_ideas() {
        assert!(matches!(
            parse_ideas("  \n\n \t"),
            Err(GenerationError::NoIdeasParsed)
        ));
        assert!(matches!(parse_ideas(""), Err(GenerationError::NoIdeasParsed)));
    }

    #[test]
    fn test_structure_labelled_fragment() {
        let draft = structure_idea(
            "**Title:** Your CRM is lying to you\n\
             Narrative: Pipeline reviews feel productive.\n\
             They are not.\n\
             Product tie-in: Live deal health scores\n\
             CTA: Book a teardown of your pipeline",
        );

        assert_eq!(draft.title, "Your CRM is lying to you");
        assert_eq!(
            draft.narrative,
            "Pipeline reviews feel productive.\nThey are not."
        );
        assert_eq!(draft.product_tie_in, "Live deal health scores");
        assert_eq!(draft.cta, "Book a teardown of your pipeline");
    }

    #[test]
    fn test_structure_alternate_labels() {
        let draft = structure_idea(
            "1. Title - Ship less\nStory: We cut scope.\nCall to action: Reply \"less\"",
        );
        assert_eq!(draft.title, "Ship less");
        assert_eq!(draft.narrative, "We cut scope.");
        assert_eq!(draft.cta, "Reply \"less\"");
        assert!(draft.product_tie_in.is_empty());
    }

    #[test]
    fn test_structure_unlabelled_fragment() {
        let draft = structure_idea("Onboarding is a sales problem\nMost churn starts in week one.");
        assert_eq!(draft.title, "Onboarding is a sales problem");
        assert_eq!(draft.narrative, "Most churn starts in week one.");
        assert!(draft.cta.is_empty());
    }
}
