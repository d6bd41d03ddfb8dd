//! Core analyzer for orchestrating lint execution.

use crate::config::{default_excludes, Config, RuleConfig};
use crate::context::{ComponentsInfo, FileContext, RuleContext};
use crate::parser::SourceParser;
use crate::rule::{Rule, RuleBox};
use crate::traversal::Processor;
use crate::types::{LintResult, Violation};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a source file.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Directory walk error.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// No frontend was registered.
    #[error("No source parser configured")]
    MissingParser,
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    parser: Option<Box<dyn SourceParser>>,
    exclude_patterns: Vec<String>,
    include_patterns: Vec<String>,
    config: Option<Config>,
    components: Option<ComponentsInfo>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Sets the source frontend.
    #[must_use]
    pub fn parser<P: SourceParser + 'static>(mut self, parser: P) -> Self {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds an include glob pattern.
    #[must_use]
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the component metadata shared by all rules.
    #[must_use]
    pub fn components(mut self, components: ComponentsInfo) -> Self {
        self.components = Some(components);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// Rule options from the configuration are applied here, and component
    /// metadata named by `components` in the configuration is loaded
    /// relative to the root unless set explicitly.
    ///
    /// # Errors
    ///
    /// Returns an error if no parser is set, a glob pattern is invalid, the
    /// working directory cannot be read or component metadata fails to load.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let parser = self.parser.ok_or(AnalyzerError::MissingParser)?;
        let config = self.config.unwrap_or_default();

        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        // Merge exclude patterns from config
        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        if exclude_patterns.is_empty() {
            exclude_patterns.extend(default_excludes());
        }

        let mut include_patterns = self.include_patterns;
        include_patterns.extend(config.analyzer.include.iter().cloned());
        let include = include_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        let exclude = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let components = match (self.components, &config.components) {
            (Some(components), _) => components,
            (None, Some(path)) => {
                let path = if path.is_absolute() {
                    path.clone()
                } else {
                    root.join(path)
                };
                debug!("Loading component metadata from {}", path.display());
                ComponentsInfo::from_file(&path)?
            }
            (None, None) => ComponentsInfo::default(),
        };

        let mut rules = self.rules;
        for rule in &mut rules {
            if let Some(rule_config) = config.rule_config(rule.name()) {
                rule.configure(rule_config);
            }
        }

        Ok(Analyzer {
            root,
            rules,
            parser,
            exclude_patterns,
            exclude,
            include,
            respect_gitignore: config.analyzer.respect_gitignore,
            components,
            config,
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    parser: Box<dyn SourceParser>,
    exclude_patterns: Vec<String>,
    exclude: Vec<glob::Pattern>,
    include: Vec<glob::Pattern>,
    respect_gitignore: bool,
    components: ComponentsInfo,
    config: Config,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyzes all files and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, a file cannot be read, or a
    /// file fails to parse while `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!(
            "Found {} {} files to analyze",
            files.len(),
            self.parser.language_id()
        );

        for file_path in &files {
            match self.analyze_file(file_path) {
                Ok(violations) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                }
                Err(AnalyzerError::Parse { path, message }) => {
                    warn!("Failed to parse {}: {}", path.display(), message);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse { path, message });
                    }
                    let relative = path.strip_prefix(&self.root).unwrap_or(path.as_path());
                    result.unparsed.push(relative.to_path_buf());
                }
                Err(e) => return Err(e),
            }
        }

        // Sort violations by file, then line
        result.violations.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Analyzes a single file and returns violations.
    fn analyze_file(&self, path: &Path) -> Result<Vec<Violation>, AnalyzerError> {
        let content = std::fs::read_to_string(path)?;
        self.analyze_source(path, &content)
    }

    /// Runs every enabled rule over in-memory `content` as if it were `path`.
    ///
    /// Violations are returned in emission order.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Parse`] if the frontend cannot build a tree.
    pub fn analyze_source(&self, path: &Path, content: &str) -> Result<Vec<Violation>, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let ast = self
            .parser
            .parse(content)
            .map_err(|e| AnalyzerError::Parse {
                path: path.to_path_buf(),
                message: e.message,
            })?;

        let file = FileContext::new(path, content, &self.root);
        let ctx = RuleContext::new(&file, &ast, &self.components);

        let enabled = self.rules.iter().filter(|rule| {
            let enabled = self.config.is_rule_enabled(rule.name());
            if !enabled {
                debug!("Skipping disabled rule: {}", rule.name());
            }
            enabled
        });

        let mut processor = Processor::with_severities(enabled.map(|rule| &**rule), &ctx, |name| {
            self.config.rule_severity(name)
        });
        Ok(processor.transform(ast.root()))
    }

    /// Discovers all source files the parser understands.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let extensions = self.parser.extensions();
        let mut files = Vec::new();

        let walker = ignore::WalkBuilder::new(&self.root)
            .git_ignore(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .build();

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.path();

            let name = path.to_string_lossy();
            if !extensions.iter().any(|ext| name.ends_with(ext)) {
                continue;
            }

            // Check exclude patterns
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            if !self.should_include(path) {
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        let relative = path.strip_prefix(&self.root).unwrap_or(path);

        for (pattern, raw) in self.exclude.iter().zip(&self.exclude_patterns) {
            if pattern.matches(&path_str) || pattern.matches_path(relative) {
                return true;
            }

            // Also check as substring for patterns like "**/build/**"
            let normalized_pattern = raw.replace("**", "");
            if !normalized_pattern.is_empty()
                && normalized_pattern != "/"
                && path_str.contains(&normalized_pattern)
            {
                return true;
            }
        }

        false
    }

    /// Checks include patterns; an empty list includes everything.
    fn should_include(&self, path: &Path) -> bool {
        if self.include.is_empty() {
            return true;
        }
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.include.iter().any(|p| p.matches_path(relative))
    }

    /// Gets the rule configuration for a specific rule.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.config.rule_config(rule_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Ast, AstBuilder, NodeKind, Span};
    use crate::parser::ParseError;
    use crate::report::{Message, Report, Reporter};
    use crate::rule::RuleHandler;
    use crate::types::Severity;
    use crate::NodeId;
    use std::fs;
    use tempfile::TempDir;

    /// One `Other` node per non-empty line, named by its text.
    struct LineParser;

    impl SourceParser for LineParser {
        fn language_id(&self) -> &'static str {
            "lines"
        }

        fn extensions(&self) -> &'static [&'static str] {
            &[".ets"]
        }

        fn parse(&self, source: &str) -> Result<Ast, ParseError> {
            if source.contains("<<broken>>") {
                return Err(ParseError::new("unbalanced input"));
            }
            let mut b = AstBuilder::new(Span::new(0, source.len(), 1, 1));
            let root = b.root();
            let mut offset = 0;
            for (i, line) in source.split('\n').enumerate() {
                if !line.trim().is_empty() {
                    b.push(
                        root,
                        NodeKind::Other(line.trim().to_string()),
                        Span::new(offset, offset + line.len(), i + 1, 1),
                    );
                }
                offset += line.len() + 1;
            }
            Ok(b.finish())
        }
    }

    /// Flags every line equal to `banned`.
    struct Banned {
        banned: String,
    }

    struct BannedHandler<'a> {
        banned: &'a str,
    }

    impl Rule for Banned {
        fn name(&self) -> &'static str {
            "banned-line"
        }
        fn code(&self) -> &'static str {
            "T001"
        }
        fn configure(&mut self, config: &RuleConfig) {
            self.banned = config.get_str("text", &self.banned).to_string();
        }
        fn setup<'a>(&'a self, _ctx: &RuleContext<'_>) -> Box<dyn RuleHandler + 'a> {
            Box::new(BannedHandler {
                banned: &self.banned,
            })
        }
    }

    impl RuleHandler for BannedHandler<'_> {
        fn parsed(&mut self, node: NodeId, ctx: &RuleContext<'_>, reporter: &mut Reporter<'_>) {
            if matches!(ctx.ast.kind(node), NodeKind::Other(text) if text == self.banned) {
                reporter.report(
                    Report::new(node, Message::new("banned", "'{{text}}' is banned"))
                        .data("text", self.banned),
                );
            }
        }
    }

    fn banned(text: &str) -> Banned {
        Banned {
            banned: text.to_string(),
        }
    }

    #[test]
    fn test_builder_requires_parser() {
        let err = Analyzer::builder().root(".").build();
        assert!(matches!(err, Err(AnalyzerError::MissingParser)));
    }

    #[test]
    fn test_exclude_patterns() {
        let analyzer = Analyzer::builder()
            .root("/project")
            .parser(LineParser)
            .exclude("**/build/**")
            .exclude("**/oh_modules/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.should_exclude(Path::new("/project/entry/build/default/Index.ets")));
        assert!(analyzer.should_exclude(Path::new("/project/oh_modules/lib/Index.ets")));
        assert!(!analyzer.should_exclude(Path::new("/project/entry/src/main/ets/Index.ets")));
    }

    #[test]
    fn test_invalid_glob_is_rejected() {
        let err = Analyzer::builder()
            .root(".")
            .parser(LineParser)
            .exclude("[")
            .build();
        assert!(matches!(err, Err(AnalyzerError::Glob(_))));
    }

    #[test]
    fn test_analyze_source_reports_and_configures() {
        let config = Config::parse("[rules.banned-line]\ntext = \"var x\"\n").expect("config");
        let analyzer = Analyzer::builder()
            .root("/project")
            .parser(LineParser)
            .config(config)
            .rule(banned("eval()"))
            .build()
            .expect("analyzer");

        let violations = analyzer
            .analyze_source(Path::new("/project/a.ets"), "let y\nvar x\neval()\n")
            .expect("parsed");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "'var x' is banned");
        assert_eq!(violations[0].location.file, PathBuf::from("a.ets"));
        assert_eq!(violations[0].location.line, 2);
    }

    #[test]
    fn test_disabled_rule_and_severity_override() {
        let config = Config::parse("[rules.banned-line]\nseverity = \"info\"\n").expect("config");
        let analyzer = Analyzer::builder()
            .root("/project")
            .parser(LineParser)
            .config(config)
            .rule(banned("x"))
            .build()
            .expect("analyzer");
        let violations = analyzer
            .analyze_source(Path::new("/project/a.ets"), "x\n")
            .expect("parsed");
        assert_eq!(violations[0].severity, Severity::Info);

        let config = Config::parse("[rules.banned-line]\nenabled = false\n").expect("config");
        let analyzer = Analyzer::builder()
            .root("/project")
            .parser(LineParser)
            .config(config)
            .rule(banned("x"))
            .build()
            .expect("analyzer");
        let violations = analyzer
            .analyze_source(Path::new("/project/a.ets"), "x\n")
            .expect("parsed");
        assert!(violations.is_empty());
    }

    #[test]
    fn test_analyze_walks_tree() {
        let tmp = TempDir::new().unwrap();
        let pages = tmp.path().join("entry/src/main/ets/pages");
        fs::create_dir_all(&pages).unwrap();
        fs::write(pages.join("Index.ets"), "bad\nok\n").unwrap();
        fs::write(pages.join("Other.ets"), "ok\nbad\n").unwrap();
        fs::write(pages.join("notes.txt"), "bad\n").unwrap();
        let build = tmp.path().join("entry/build");
        fs::create_dir_all(&build).unwrap();
        fs::write(build.join("Gen.ets"), "bad\n").unwrap();
        fs::write(pages.join("Broken.ets"), "<<broken>>\n").unwrap();

        let analyzer = Analyzer::builder()
            .root(tmp.path())
            .parser(LineParser)
            .exclude("**/build/**")
            .rule(banned("bad"))
            .build()
            .expect("analyzer");

        let result = analyzer.analyze().expect("analysis");
        assert_eq!(result.files_checked, 2);
        assert_eq!(result.violations.len(), 2);
        assert!(result.violations[0]
            .location
            .file
            .ends_with("Index.ets"));
        assert!(result.violations[1]
            .location
            .file
            .ends_with("Other.ets"));
        assert_eq!(
            result.unparsed,
            vec![PathBuf::from("entry/src/main/ets/pages/Broken.ets")]
        );

        let strict = Analyzer::builder()
            .root(tmp.path())
            .parser(LineParser)
            .exclude("**/build/**")
            .fail_on_parse_error(true)
            .rule(banned("bad"))
            .build()
            .expect("analyzer");
        assert!(matches!(
            strict.analyze(),
            Err(AnalyzerError::Parse { .. })
        ));
    }

    #[test]
    fn test_components_loaded_relative_to_root() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("components.json"),
            r#"{"containerComponents": ["Column"]}"#,
        )
        .unwrap();
        let config = Config::parse("components = \"components.json\"\n").expect("config");

        let analyzer = Analyzer::builder()
            .root(tmp.path())
            .parser(LineParser)
            .config(config)
            .build()
            .expect("analyzer");
        assert!(analyzer.components.is_component("Column"));
    }
}
