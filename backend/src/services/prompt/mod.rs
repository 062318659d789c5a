//! Prompt assembly for image analysis requests
//!
//! A prompt is built in three steps:
//! 1. pick the template pair for the resolved language
//! 2. fill `{question}` then `{tone}` into the with-question template, or
//!    `{tone}` alone into the no-question template
//! 3. append [`SENTINEL_DIRECTIVE`]
//!
//! The directive is always English, whatever the prompt language: it is
//! aimed at the model's instruction following, not at the end user.

mod render;
mod templates;

pub use render::{Placeholder, render_template};
pub use templates::{
    DEFAULT_LANGUAGE, LanguageTemplates, Template, TemplateSet, lookup, resolve,
    supported_languages,
};

/// Literal answer the model is told to give when it cannot identify the subject.
pub const SENTINEL_TOKEN: &str = "INDETERMINATO";

/// Appended verbatim to every rendered prompt.
pub const SENTINEL_DIRECTIVE: &str = " If you cannot identify the object with certainty, if the image is unclear, or if it is not an object, respond EXACTLY and ONLY with the word: 'INDETERMINATO'";

/// Render the full prompt for one request.
///
/// `question` is treated as absent when `None`; callers filter out empty
/// strings before getting here.
pub fn render_prompt(templates: &TemplateSet, tone: &str, question: Option<&str>) -> String {
    let mut prompt = match question {
        Some(question) => fill(&templates.question, tone, question),
        None => fill(&templates.no_question, tone, ""),
    };
    prompt.push_str(SENTINEL_DIRECTIVE);
    prompt
}

fn fill(template: &Template, tone: &str, question: &str) -> String {
    let bindings: Vec<(Placeholder, &str)> = template
        .placeholders
        .iter()
        .map(|&placeholder| match placeholder {
            Placeholder::Question => (placeholder, question),
            Placeholder::Tone => (placeholder, tone),
        })
        .collect();
    render_template(template.text, &bindings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TONES: &[&str] = &["formale", "ironico", "", "{tone}", "{question}", "a \"quoted\" tone"];
    const QUESTIONS: &[&str] = &["che materiale è?", "what is it?", "{tone}", "{question}"];

    #[test]
    fn test_directive_mentions_sentinel() {
        assert!(SENTINEL_DIRECTIVE.ends_with(&format!("'{}'", SENTINEL_TOKEN)));
    }

    #[test]
    fn test_question_path_uses_question_template() {
        for lang in supported_languages() {
            let set = resolve(Some(lang)).templates;
            let question_head = set.question.text.split("{question}").next().unwrap();
            let no_question_head = set.no_question.text.split("{tone}").next().unwrap();

            for &tone in TONES {
                for &question in QUESTIONS {
                    let prompt = render_prompt(set, tone, Some(question));
                    assert!(prompt.starts_with(question_head), "{lang}: {prompt}");
                    assert!(prompt.contains(question), "{lang}: {prompt}");
                    assert!(!prompt.starts_with(no_question_head), "{lang}: {prompt}");
                }

                let prompt = render_prompt(set, tone, None);
                assert!(prompt.starts_with(no_question_head), "{lang}: {prompt}");
                assert!(!prompt.starts_with(question_head), "{lang}: {prompt}");
            }
        }
    }

    #[test]
    fn test_directive_always_last() {
        for lang in supported_languages().into_iter().chain(["fr", ""]) {
            let set = resolve(Some(lang)).templates;
            for &tone in TONES {
                for question in QUESTIONS.iter().copied().map(Some).chain([None]) {
                    let prompt = render_prompt(set, tone, question);
                    assert!(prompt.ends_with(SENTINEL_DIRECTIVE), "{lang}: {prompt}");
                    assert_eq!(prompt.matches(SENTINEL_DIRECTIVE).count(), 1);
                }
            }
        }
    }

    #[test]
    fn test_italian_question_prompt() {
        let prompt = render_prompt(resolve(Some("it")).templates, "formale", Some("che materiale è?"));
        assert!(prompt.starts_with(
            "Riguardo a questa immagine, rispondi alla seguente domanda in italiano: \"che materiale è?\""
        ));
        assert!(prompt.contains("tono formale"));
        assert!(prompt.ends_with(SENTINEL_DIRECTIVE));
    }

    #[test]
    fn test_english_no_question_prompt() {
        let prompt = render_prompt(resolve(Some("en")).templates, "playful", None);
        assert_eq!(
            prompt,
            format!(
                "Analyze the object in this image in detail in a playful tone, in English. Describe its main features, possible uses, the context in which it is found, and the materials it might be made of.{}",
                SENTINEL_DIRECTIVE
            )
        );
    }

    #[test]
    fn test_tone_equal_to_question_placeholder_is_literal() {
        let prompt = render_prompt(resolve(Some("en")).templates, "{question}", Some("why?"));
        assert!(prompt.starts_with(
            "Regarding this image, answer the following question in English: \"why?\". Provide the answer in a {question} tone."
        ));
    }

    #[test]
    fn test_question_containing_tone_placeholder_is_literal() {
        let prompt = render_prompt(resolve(Some("it")).templates, "serio", Some("{tone}"));
        assert!(prompt.starts_with(
            "Riguardo a questa immagine, rispondi alla seguente domanda in italiano: \"{tone}\". Fornisci la risposta con un tono serio."
        ));
    }

    #[test]
    fn test_only_first_tone_slot_is_filled() {
        let prompt = render_prompt(resolve(Some("en")).templates, "dry", Some("q"));
        assert_eq!(prompt.matches("dry").count(), 1);
        assert!(prompt.contains("in detail in a {tone} tone."));
    }
}
