//! `<h1>` rewriting by exact literal match.
//!
//! A heading `<h1>{text}</h1>` becomes `<h1>{text'}{suffix}</h1>` where `text'`
//! is `text` with the first occurrence of the highlight word wrapped in a
//! `<span>`. No markup is parsed: a heading with different whitespace,
//! attributes or casing is left alone.

use crate::rules::RewriteRule;

pub const DEFAULT_CITY: &str = "Curitiba";
pub const DEFAULT_HIGHLIGHT_CLASS: &str = "highlight";

/// Markup appended to and inserted into rewritten headings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingStyle {
    pub suffix: String,
    pub highlight_class: String,
}

impl Default for HeadingStyle {
    fn default() -> Self {
        Self::for_city(DEFAULT_CITY)
    }
}

impl HeadingStyle {
    pub fn for_city(city: &str) -> Self {
        Self {
            suffix: format!(" em {}", city),
            highlight_class: DEFAULT_HIGHLIGHT_CLASS.to_string(),
        }
    }

    pub fn with_highlight_class(mut self, class: impl Into<String>) -> Self {
        self.highlight_class = class.into();
        self
    }

    pub fn highlight_span(&self, word: &str) -> String {
        format!(r#"<span class="{}">{}</span>"#, self.highlight_class, word)
    }

    /// Heading text with the first `highlight_word` wrapped and the suffix appended.
    ///
    /// Later occurrences of the word stay unstyled. An empty or absent word
    /// inserts no span.
    pub fn replacement_string(&self, heading_text: &str, highlight_word: &str) -> String {
        let styled = if highlight_word.is_empty() {
            heading_text.to_string()
        } else {
            heading_text.replacen(highlight_word, &self.highlight_span(highlight_word), 1)
        };
        format!("<h1>{}{}</h1>", styled, self.suffix)
    }

    pub fn rewrite_content(&self, content: &str, rule: &RewriteRule) -> Rewrite {
        let search = search_string(&rule.heading_text);
        let replacements = content.matches(search.as_str()).count();
        if replacements == 0 {
            return Rewrite {
                content: content.to_string(),
                replacements,
            };
        }

        let replacement = self.replacement_string(&rule.heading_text, &rule.highlight_word);
        Rewrite {
            content: content.replace(search.as_str(), &replacement),
            replacements,
        }
    }
}

pub fn search_string(heading_text: &str) -> String {
    format!("<h1>{}</h1>", heading_text)
}

/// Result of rewriting one page's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub content: String,
    pub replacements: usize,
}

impl Rewrite {
    pub fn is_unchanged(&self) -> bool {
        self.replacements == 0
    }
}
