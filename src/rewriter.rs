use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::encoding::TextEncoding;
use crate::error::{Result, RewriterError};
use crate::heading::HeadingStyle;
use crate::rules::{RewriteRule, RuleSet};

pub const PAGE_FILENAME: &str = "index.html";

#[derive(Debug, Clone)]
pub struct RewriterConfig {
    /// Site root the rule paths are relative to
    pub root: PathBuf,
    pub encoding: TextEncoding,
    pub style: HeadingStyle,
    /// Compute outcomes without writing pages back
    pub dry_run: bool,
}

impl RewriterConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            encoding: TextEncoding::default(),
            style: HeadingStyle::default(),
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RuleOutcome {
    Updated {
        path: PathBuf,
        replacements: usize,
    },
    NotFound {
        path: PathBuf,
    },
}

impl RuleOutcome {
    /// Console line for this outcome: the relative path when the page was
    /// processed, the full path when it is missing.
    pub fn console_line(&self, rule: &RewriteRule, dry_run: bool) -> String {
        match self {
            RuleOutcome::Updated { .. } if dry_run => {
                format!("Would update: {}", rule.display_path())
            }
            RuleOutcome::Updated { .. } => format!("✅ Updated: {}", rule.display_path()),
            RuleOutcome::NotFound { path } => RewriterError::FileNotFound(path.clone()).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleReport {
    pub rule: String,
    #[serde(flatten)]
    pub outcome: RuleOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub dry_run: bool,
    pub results: Vec<RuleReport>,
}

impl RunReport {
    pub fn updated(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, RuleOutcome::Updated { .. }))
            .count()
    }

    pub fn not_found(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, RuleOutcome::NotFound { .. }))
            .count()
    }

    pub fn total_replacements(&self) -> usize {
        self.results
            .iter()
            .map(|r| match r.outcome {
                RuleOutcome::Updated { replacements, .. } => replacements,
                RuleOutcome::NotFound { .. } => 0,
            })
            .sum()
    }
}

pub struct HeadingRewriter {
    config: RewriterConfig,
}

impl HeadingRewriter {
    pub fn new(config: RewriterConfig) -> Self {
        Self { config }
    }

    pub fn target_path(&self, rule: &RewriteRule) -> PathBuf {
        let mut path = self.config.root.clone();
        path.extend(&rule.relative_path);
        path.push(PAGE_FILENAME);
        path
    }

    /// Rewrites the heading of one page.
    ///
    /// A missing page is reported as [`RuleOutcome::NotFound`] and nothing is
    /// created. An existing page is always written back, even when no heading
    /// matched, unless the rewriter is in dry-run mode.
    pub fn process_rule(&self, rule: &RewriteRule) -> Result<RuleOutcome> {
        let path = self.target_path(rule);
        if !path.is_file() {
            return Ok(RuleOutcome::NotFound { path });
        }

        let content = self.read_page(&path)?;
        let rewrite = self.config.style.rewrite_content(&content, rule);
        tracing::debug!(
            "{}: {} heading(s) replaced",
            path.display(),
            rewrite.replacements
        );

        if !self.config.dry_run {
            self.write_page(&path, &rewrite.content)?;
        }

        Ok(RuleOutcome::Updated {
            path,
            replacements: rewrite.replacements,
        })
    }

    /// Processes every rule in order, printing one line per rule to stdout.
    ///
    /// Stops at the first error other than a missing page; pages for later
    /// rules are left untouched.
    pub fn run(&self, rules: &RuleSet) -> Result<RunReport> {
        self.run_to(rules, &mut io::stdout().lock())
    }

    /// Like [`run`](Self::run) without console output.
    pub fn run_quiet(&self, rules: &RuleSet) -> Result<RunReport> {
        self.run_to(rules, &mut io::sink())
    }

    /// Like [`run`](Self::run), writing the console lines to `out`.
    pub fn run_to<W: Write>(&self, rules: &RuleSet, out: &mut W) -> Result<RunReport> {
        tracing::info!(
            "Rewriting {} page(s) under {}",
            rules.len(),
            self.config.root.display()
        );

        let mut report = RunReport {
            dry_run: self.config.dry_run,
            results: Vec::with_capacity(rules.len()),
        };

        for rule in rules {
            let outcome = self.process_rule(rule)?;
            writeln!(out, "{}", outcome.console_line(rule, self.config.dry_run))?;
            report.results.push(RuleReport {
                rule: rule.display_path(),
                outcome,
            });
        }

        if self.config.dry_run {
            writeln!(out, "\nDry run: no pages written.")?;
        } else {
            writeln!(out, "\n🎉 All pages updated!")?;
        }

        Ok(report)
    }

    fn read_page(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path)?;
        self.config.encoding.decode(bytes, path)
    }

    fn write_page(&self, path: &Path, content: &str) -> Result<()> {
        let bytes = self.config.encoding.encode(content, path)?;
        fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_page(root: &Path, rel: &str, content: &str) -> PathBuf {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(PAGE_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_target_path() {
        let rewriter = HeadingRewriter::new(RewriterConfig::new("/site"));
        let rule = RewriteRule::new("seguranca-eletronica/interfonia", "Interfonia", "Interfonia");
        assert_eq!(
            rewriter.target_path(&rule),
            Path::new("/site/seguranca-eletronica/interfonia/index.html")
        );
    }

    #[test]
    fn test_process_rule_rewrites_page() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_page(temp_dir.path(), "a/interfonia", "<div><h1>Interfonia</h1></div>");

        let rewriter = HeadingRewriter::new(RewriterConfig::new(temp_dir.path()));
        let rule = RewriteRule::new("a/interfonia", "Interfonia", "Interfonia");
        let outcome = rewriter.process_rule(&rule).unwrap();

        assert_eq!(outcome, RuleOutcome::Updated { path: path.clone(), replacements: 1 });
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"<div><h1><span class="highlight">Interfonia</span> em Curitiba</h1></div>"#
        );
    }

    #[test]
    fn test_process_rule_missing_page() {
        let temp_dir = TempDir::new().unwrap();
        let rewriter = HeadingRewriter::new(RewriterConfig::new(temp_dir.path()));
        let rule = RewriteRule::new("nowhere/page", "Rede", "Rede");

        let outcome = rewriter.process_rule(&rule).unwrap();

        let expected = temp_dir.path().join("nowhere/page/index.html");
        assert_eq!(outcome, RuleOutcome::NotFound { path: expected.clone() });
        assert!(!expected.exists());
        assert!(!temp_dir.path().join("nowhere").exists());
    }

    #[test]
    fn test_directory_in_place_of_page_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("a/index.html")).unwrap();
        let rewriter = HeadingRewriter::new(RewriterConfig::new(temp_dir.path()));

        let outcome = rewriter.process_rule(&RewriteRule::new("a", "Rede", "Rede")).unwrap();
        assert!(matches!(outcome, RuleOutcome::NotFound { .. }));
    }

    #[test]
    fn test_dry_run_leaves_page_alone() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_page(temp_dir.path(), "a", "<h1>Rede Cabeada</h1>");

        let mut config = RewriterConfig::new(temp_dir.path());
        config.dry_run = true;
        let rewriter = HeadingRewriter::new(config);
        let outcome = rewriter
            .process_rule(&RewriteRule::new("a", "Rede Cabeada", "Cabeada"))
            .unwrap();

        assert_eq!(outcome, RuleOutcome::Updated { path: path.clone(), replacements: 1 });
        assert_eq!(fs::read_to_string(&path).unwrap(), "<h1>Rede Cabeada</h1>");
    }

    #[test]
    fn test_invalid_utf8_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("a");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(PAGE_FILENAME), [0x3c, 0x68, 0x31, 0x3e, 0xe7]).unwrap();

        let rewriter = HeadingRewriter::new(RewriterConfig::new(temp_dir.path()));
        let err = rewriter
            .process_rule(&RewriteRule::new("a", "Rede", "Rede"))
            .unwrap_err();
        assert!(matches!(err, RewriterError::Encoding { .. }));
    }

    #[test]
    fn test_report_counts() {
        let temp_dir = TempDir::new().unwrap();
        write_page(temp_dir.path(), "a", "<h1>Rede</h1><h1>Rede</h1>");
        write_page(temp_dir.path(), "b", "<h1>Outra</h1>");

        let rules = RuleSet::new(vec![
            RewriteRule::new("a", "Rede", "Rede"),
            RewriteRule::new("missing", "Rede", "Rede"),
            RewriteRule::new("b", "Rede", "Rede"),
        ]);
        let rewriter = HeadingRewriter::new(RewriterConfig::new(temp_dir.path()));
        let report = rewriter.run_quiet(&rules).unwrap();

        assert_eq!(report.results.len(), 3);
        assert_eq!(report.updated(), 2);
        assert_eq!(report.not_found(), 1);
        assert_eq!(report.total_replacements(), 2);
        assert_eq!(report.results[1].rule, "missing");
    }

    #[test]
    fn test_console_lines() {
        let temp_dir = TempDir::new().unwrap();
        write_page(temp_dir.path(), "a/b", "<h1>Rede</h1>");

        let rules = RuleSet::new(vec![
            RewriteRule::new("a/missing", "Rede", "Rede"),
            RewriteRule::new("a/b", "Rede", "Rede"),
        ]);
        let rewriter = HeadingRewriter::new(RewriterConfig::new(temp_dir.path()));
        let mut out = Vec::new();
        rewriter.run_to(&rules, &mut out).unwrap();

        let missing = temp_dir.path().join("a").join("missing").join(PAGE_FILENAME);
        let expected = format!(
            "File not found: {}\n✅ Updated: a/b\n\n🎉 All pages updated!\n",
            missing.display()
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_dry_run_console_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_page(temp_dir.path(), "a/b", "<h1>Rede</h1>");

        let mut config = RewriterConfig::new(temp_dir.path());
        config.dry_run = true;
        let rules = RuleSet::new(vec![RewriteRule::new("a/b", "Rede", "Rede")]);
        let mut out = Vec::new();
        HeadingRewriter::new(config).run_to(&rules, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Would update: a/b\n\nDry run: no pages written.\n"
        );
        assert_eq!(fs::read_to_string(path).unwrap(), "<h1>Rede</h1>");
    }

    #[test]
    fn test_console_line_for_missing_page_names_full_path() {
        let rule = RewriteRule::new("x/y", "Rede", "Rede");
        let outcome = RuleOutcome::NotFound {
            path: PathBuf::from("/site/x/y/index.html"),
        };
        assert_eq!(
            outcome.console_line(&rule, false),
            format!("File not found: {}", Path::new("/site/x/y/index.html").display())
        );
    }
}
