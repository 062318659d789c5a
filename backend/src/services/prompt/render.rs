//! Literal placeholder substitution
//!
//! Templates are filled in one placeholder at a time. Each placeholder
//! replaces its first occurrence in the *template text only*: a value that
//! was already inserted is never scanned again, so a tone of `{question}`
//! or a question containing `{tone}` comes out verbatim.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Question,
    Tone,
}

impl Placeholder {
    pub const ALL: [Placeholder; 2] = [Placeholder::Question, Placeholder::Tone];

    pub const fn token(self) -> &'static str {
        match self {
            Self::Question => "{question}",
            Self::Tone => "{tone}",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Template(&'a str),
    Value(&'a str),
}

/// Substitute `bindings` into `template`, in the order given.
///
/// A placeholder with no remaining occurrence in the template text is
/// skipped.
pub fn render_template<'a>(template: &'a str, bindings: &[(Placeholder, &'a str)]) -> String {
    let mut segments = vec![Segment::Template(template)];

    for &(placeholder, value) in bindings {
        let token = placeholder.token();
        let hit = segments.iter().enumerate().find_map(|(idx, segment)| match *segment {
            Segment::Template(text) => text.find(token).map(|pos| (idx, text, pos)),
            Segment::Value(_) => None,
        });

        if let Some((idx, text, pos)) = hit {
            let before = Segment::Template(&text[..pos]);
            let after = Segment::Template(&text[pos + token.len()..]);
            segments.splice(idx..=idx, [before, Segment::Value(value), after]);
        }
    }

    let len = segments
        .iter()
        .map(|segment| match segment {
            Segment::Template(text) | Segment::Value(text) => text.len(),
        })
        .sum();
    let mut rendered = String::with_capacity(len);
    for segment in segments {
        match segment {
            Segment::Template(text) | Segment::Value(text) => rendered.push_str(text),
        }
    }
    rendered
}
