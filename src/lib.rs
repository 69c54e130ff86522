pub mod encoding;
pub mod error;
pub mod heading;
pub mod rewriter;
pub mod rules;

pub use encoding::TextEncoding;
pub use error::{Result, RewriterError};
pub use heading::{search_string, HeadingStyle, Rewrite, DEFAULT_CITY, DEFAULT_HIGHLIGHT_CLASS};
pub use rewriter::{
    HeadingRewriter, RewriterConfig, RuleOutcome, RuleReport, RunReport, PAGE_FILENAME,
};
pub use rules::{RewriteRule, RuleSet, RulesFile};
