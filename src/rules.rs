//! Rewrite rules: which page gets which heading treatment.
//!
//! The built-in table covers the service pages of the site. A rules file can
//! replace it:
//!
//! ```yaml
//! city: Curitiba
//! highlight_class: highlight
//!
//! rules:
//!   - path: redes-e-infraestrutura/rede-cabeada
//!     heading: Rede Cabeada
//!     highlight: Cabeada
//!   - path: [seguranca-eletronica, interfonia]
//!     heading: Interfonia
//!     highlight: Interfonia
//! ```

use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer};

use crate::error::{Result, RewriterError};
use crate::heading::HeadingStyle;

/// One page and the heading to rewrite in it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RewriteRule {
    /// Directory segments below the site root holding `index.html`
    #[serde(rename = "path", deserialize_with = "deserialize_segments")]
    pub relative_path: Vec<String>,

    /// Literal text between `<h1>` and `</h1>`
    #[serde(rename = "heading")]
    pub heading_text: String,

    /// Substring of the heading to wrap in the highlight span
    #[serde(rename = "highlight")]
    pub highlight_word: String,
}

impl RewriteRule {
    pub fn new(
        relative_path: &str,
        heading_text: impl Into<String>,
        highlight_word: impl Into<String>,
    ) -> Self {
        Self {
            relative_path: split_path(relative_path),
            heading_text: heading_text.into(),
            highlight_word: highlight_word.into(),
        }
    }

    pub fn display_path(&self) -> String {
        self.relative_path.join("/")
    }

    /// Whether the highlight word actually occurs in the heading.
    pub fn highlights(&self) -> bool {
        !self.highlight_word.is_empty() && self.heading_text.contains(&self.highlight_word)
    }

    pub fn validate(&self) -> Result<()> {
        if self.relative_path.is_empty() {
            return Err(RewriterError::InvalidRule(format!(
                "empty path for heading '{}'",
                self.heading_text
            )));
        }

        for segment in &self.relative_path {
            if segment.is_empty()
                || segment == "."
                || segment == ".."
                || segment.contains(['/', '\\'])
            {
                return Err(RewriterError::InvalidRule(format!(
                    "bad path segment '{}' in '{}'",
                    segment,
                    self.display_path()
                )));
            }
        }

        if self.heading_text.is_empty() {
            return Err(RewriterError::InvalidRule(format!(
                "empty heading for '{}'",
                self.display_path()
            )));
        }

        if !self.highlights() {
            tracing::warn!(
                "Highlight '{}' does not occur in heading '{}' ({}); no span will be inserted",
                self.highlight_word,
                self.heading_text,
                self.display_path()
            );
        }

        Ok(())
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn deserialize_segments<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PathRepr {
        Joined(String),
        Segments(Vec<String>),
    }

    Ok(match PathRepr::deserialize(deserializer)? {
        PathRepr::Joined(path) => split_path(&path),
        PathRepr::Segments(segments) => segments,
    })
}

/// Ordered, immutable rule table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<RewriteRule>,
}

static BUILTIN_RULES: Lazy<RuleSet> = Lazy::new(|| {
    let table = [
        // Redes e Infraestrutura
        ("redes-e-infraestrutura/wifi-redes-sem-fio", "Wi-Fi e Redes Sem Fio", "Sem Fio"),
        ("redes-e-infraestrutura/rede-cabeada", "Rede Cabeada", "Cabeada"),
        ("redes-e-infraestrutura/cabeamento-estruturado", "Cabeamento Estruturado", "Estruturado"),
        ("redes-e-infraestrutura/manutencao-de-redes", "Manutenção de Redes", "Redes"),
        ("redes-e-infraestrutura/organizacao-de-cabos", "Organização de Cabos", "Cabos"),
        // Segurança Eletrônica
        ("seguranca-eletronica/camera-de-seguranca", "Câmera de Segurança", "Segurança"),
        ("seguranca-eletronica/alarme-de-seguranca", "Alarme de Segurança", "Segurança"),
        ("seguranca-eletronica/controle-de-acesso", "Controle de Acesso", "Acesso"),
        ("seguranca-eletronica/portao-eletronico", "Portão Eletrônico", "Eletrônico"),
        ("seguranca-eletronica/cerca-eletrica", "Cerca Elétrica", "Elétrica"),
        ("seguranca-eletronica/interfonia", "Interfonia", "Interfonia"),
    ];

    RuleSet::new(
        table
            .iter()
            .map(|(path, heading, highlight)| RewriteRule::new(path, *heading, *highlight))
            .collect(),
    )
});

impl RuleSet {
    pub fn new(rules: Vec<RewriteRule>) -> Self {
        Self { rules }
    }

    /// The service pages of the site.
    pub fn builtin() -> &'static RuleSet {
        &BUILTIN_RULES
    }

    pub fn iter(&self) -> impl Iterator<Item = &RewriteRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        self.rules.iter().try_for_each(RewriteRule::validate)
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a RewriteRule;
    type IntoIter = std::slice::Iter<'a, RewriteRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Contents of a rules file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesFile {
    /// City appended to every heading
    pub city: Option<String>,

    /// CSS class of the highlight span
    pub highlight_class: Option<String>,

    #[serde(default)]
    pub rules: Vec<RewriteRule>,
}

impl RulesFile {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: RulesFile = serde_yaml::from_str(content)
            .map_err(|e| RewriterError::Parse(format!("Invalid rules YAML: {}", e)))?;
        file.rule_set().validate()?;
        Ok(file)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded rules file {}", path.display());
        Self::from_yaml_str(&content)
    }

    pub fn rule_set(&self) -> RuleSet {
        RuleSet::new(self.rules.clone())
    }

    /// Style overrides from the file applied on top of `base`.
    pub fn style(&self, base: HeadingStyle) -> HeadingStyle {
        let style = match &self.city {
            Some(city) => HeadingStyle::for_city(city).with_highlight_class(base.highlight_class),
            None => base,
        };
        match &self.highlight_class {
            Some(class) => style.with_highlight_class(class.clone()),
            None => style,
        }
    }
}
