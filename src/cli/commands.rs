use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::encoding::TextEncoding;
use crate::error::Result;
use crate::heading::{search_string, HeadingStyle};
use crate::rewriter::{HeadingRewriter, RewriterConfig};
use crate::rules::{RuleSet, RulesFile};

#[derive(Parser)]
#[command(name = "heading-rewriter")]
#[command(about = "Rewrites <h1> headings of the site's service pages")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Rewrite the built-in pages under the current directory
    heading-rewriter apply

    # Rewrite pages of a site checked out elsewhere
    heading-rewriter apply ~/sites/tech-business

    # Preview without touching any file
    heading-rewriter apply --dry-run --format json

    # Use a custom rule table and city
    heading-rewriter apply --rules headings.yml --city Londrina

    # Show the effective rule table
    heading-rewriter rules
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// YAML rules file replacing the built-in table
    #[arg(long, global = true)]
    pub rules: Option<PathBuf>,

    /// City appended to every heading
    #[arg(long, global = true)]
    pub city: Option<String>,

    /// Output format: text or json
    #[arg(long, global = true, default_value = "text")]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite headings in place
    Apply {
        /// Site root containing the page directories
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Encoding of the page files
        #[arg(long, value_enum, default_value_t = TextEncoding::Utf8)]
        encoding: TextEncoding,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// List the rules and the heading each one produces
    Rules,
}

/// Effective rule table and heading style for the given flags.
fn load_rules(rules_path: Option<&Path>, city: Option<&str>) -> Result<(RuleSet, HeadingStyle)> {
    let (rules, style) = match rules_path {
        Some(path) => {
            let file = RulesFile::load(path)?;
            (file.rule_set(), file.style(HeadingStyle::default()))
        }
        None => (RuleSet::builtin().clone(), HeadingStyle::default()),
    };

    let style = match city {
        Some(city) => HeadingStyle::for_city(city).with_highlight_class(style.highlight_class),
        None => style,
    };

    Ok((rules, style))
}

/// Rewrites the pages under `root`.
///
/// Text mode prints a line per rule as it goes. JSON mode prints the report
/// only once the whole run has succeeded, so a run aborted by an I/O or
/// encoding error leaves no record of the pages already rewritten.
pub fn apply(
    root: &Path,
    rules_path: Option<&Path>,
    city: Option<&str>,
    encoding: TextEncoding,
    dry_run: bool,
    format: &str,
) -> Result<()> {
    let (rules, style) = load_rules(rules_path, city)?;

    let rewriter = HeadingRewriter::new(RewriterConfig {
        root: root.to_path_buf(),
        encoding,
        style,
        dry_run,
    });

    if format == "json" {
        let report = rewriter.run_quiet(&rules)?;
        let output = serde_json::to_string_pretty(&report).unwrap_or_default();
        println!("{}", output);
    } else {
        let report = rewriter.run(&rules)?;
        tracing::info!(
            "{} page(s) updated, {} missing, {} heading(s) replaced{}",
            report.updated(),
            report.not_found(),
            report.total_replacements(),
            if dry_run { " (dry run)" } else { "" }
        );
    }

    Ok(())
}

pub fn list_rules(rules_path: Option<&Path>, city: Option<&str>, format: &str) -> Result<()> {
    let (rules, style) = load_rules(rules_path, city)?;

    if format == "json" {
        let entries: Vec<serde_json::Value> = rules
            .iter()
            .map(|rule| {
                serde_json::json!({
                    "path": rule.display_path(),
                    "search": search_string(&rule.heading_text),
                    "replacement": style.replacement_string(&rule.heading_text, &rule.highlight_word),
                })
            })
            .collect();
        let output = serde_json::to_string_pretty(&entries).unwrap_or_default();
        println!("{}", output);
        return Ok(());
    }

    if rules.is_empty() {
        println!("No rules defined");
        return Ok(());
    }

    println!("Rules ({}):", rules.len());
    for rule in &rules {
        let marker = if rule.highlights() { "" } else { " [no highlight]" };
        println!("  {}{}", rule.display_path(), marker);
        println!("    {}", search_string(&rule.heading_text));
        println!(
            "    -> {}",
            style.replacement_string(&rule.heading_text, &rule.highlight_word)
        );
    }

    Ok(())
}
