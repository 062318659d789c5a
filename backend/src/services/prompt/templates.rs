//! Per-language prompt templates

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::render::Placeholder;
use crate::utils::normalize_language;

/// Language used when the requested one has no template set.
pub const DEFAULT_LANGUAGE: &str = "it";

#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub text: &'static str,
    /// Placeholders filled in, in substitution order
    pub placeholders: &'static [Placeholder],
}

/// The with-question / without-question pair for one language
#[derive(Debug, Clone, Copy)]
pub struct TemplateSet {
    pub question: Template,
    pub no_question: Template,
}

/// A template set together with the language code it was found under
#[derive(Debug, Clone, Copy)]
pub struct LanguageTemplates {
    pub language: &'static str,
    pub templates: &'static TemplateSet,
}

const QUESTION_PLACEHOLDERS: &[Placeholder] = &[Placeholder::Question, Placeholder::Tone];
const NO_QUESTION_PLACEHOLDERS: &[Placeholder] = &[Placeholder::Tone];

const ITALIAN: TemplateSet = TemplateSet {
    question: Template {
        text: "Riguardo a questa immagine, rispondi alla seguente domanda in italiano: \"{question}\". Fornisci la risposta con un tono {tone}. Se la domanda non è pertinente all'immagine, analizza l'oggetto in dettaglio con un tono {tone}.",
        placeholders: QUESTION_PLACEHOLDERS,
    },
    no_question: Template {
        text: "Analizza in dettaglio l'oggetto presente in questa immagine con un tono {tone}, in italiano. Descrivi le sue caratteristiche principali, i possibili usi, il contesto in cui si trova e i materiali di cui potrebbe essere composto.",
        placeholders: NO_QUESTION_PLACEHOLDERS,
    },
};

const ENGLISH: TemplateSet = TemplateSet {
    question: Template {
        text: "Regarding this image, answer the following question in English: \"{question}\". Provide the answer in a {tone} tone. If the question is not relevant to the image, analyze the object in detail in a {tone} tone.",
        placeholders: QUESTION_PLACEHOLDERS,
    },
    no_question: Template {
        text: "Analyze the object in this image in detail in a {tone} tone, in English. Describe its main features, possible uses, the context in which it is found, and the materials it might be made of.",
        placeholders: NO_QUESTION_PLACEHOLDERS,
    },
};

static TEMPLATES: Lazy<HashMap<&'static str, &'static TemplateSet>> =
    Lazy::new(|| HashMap::from([("it", &ITALIAN), ("en", &ENGLISH)]));

/// Language codes with a template set, sorted
pub fn supported_languages() -> Vec<&'static str> {
    let mut languages: Vec<_> = TEMPLATES.keys().copied().collect();
    languages.sort_unstable();
    languages
}

/// Look up the template set for a language code, if there is one.
pub fn lookup(code: &str) -> Option<LanguageTemplates> {
    let code = normalize_language(code);
    TEMPLATES
        .get_key_value(code.as_str())
        .map(|(language, templates)| LanguageTemplates { language: *language, templates: *templates })
}

/// Resolve the template set for a request.
///
/// Unknown or absent codes fall back to [`DEFAULT_LANGUAGE`] without error.
pub fn resolve(code: Option<&str>) -> LanguageTemplates {
    code.and_then(lookup)
        .unwrap_or(LanguageTemplates { language: DEFAULT_LANGUAGE, templates: &ITALIAN })
}
