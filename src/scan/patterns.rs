//! Co-author trailer patterns that identify AI assistants and automated tools.

use std::sync::{Arc, LazyLock};

use regex::{Regex, RegexBuilder};

use crate::scan::error::PatternError;

/// Remainder of a trailer after the product name: the display name and an
/// optional `<email>` block, so a match spans the whole trailer.
const TRAILER_TAIL: &str = r"[^<\n]*(?:<[^>\n]*>?)?";

/// Product names recognized as co-authors, in evaluation order.
const PRODUCT_PATTERNS: &[(&str, &str)] = &[
    ("qwen-coder", r"qwen[-\s]*coder"),
    ("ai-assistant", r"ai\s*assistant"),
    ("chatgpt", r"chatgpt"),
    ("github-copilot", r"github[-\s]*copilot"),
    ("codellama", r"codellama"),
    ("claude", r"claude"),
    ("llama", r"llama"),
    ("mistral", r"mistral"),
    ("amazon-q", r"amazon[-\s]*q"),
    ("gemini", r"gemini"),
    ("aider", r"aider"),
    ("cursor-agent", r"cursor[-\s]*agent"),
    ("devin-ai", r"devin[-\s]*ai"),
    ("codex", r"(?:openai[-\s]*)?codex"),
];

/// Any co-author whose email domain belongs to an AI vendor.
const VENDOR_DOMAIN_PATTERN: (&str, &str) = (
    "ai-vendor-domain",
    r"co-authored-by:\s*[^<\n]*<[^>\n]*@(?:openai|anthropic|microsoft|google|alibabacloud|amazon|facebook|meta)\.[^>\n]*>?",
);

static BUILTIN: LazyLock<Arc<PatternSet>> = LazyLock::new(|| {
    let products = PRODUCT_PATTERNS
        .iter()
        .map(|(name, product)| (*name, format!(r"co-authored-by:\s*{product}{TRAILER_TAIL}")));
    let domains = std::iter::once((VENDOR_DOMAIN_PATTERN.0, VENDOR_DOMAIN_PATTERN.1.to_string()));

    #[allow(clippy::expect_used)]
    let set = PatternSet::new(products.chain(domains)).expect("builtin patterns compile");
    Arc::new(set)
});

/// A single named detection pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    name: String,
    regex: Regex,
}

impl Pattern {
    /// Returns the pattern's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the compiled expression.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// One pattern hit within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternMatch<'p, 't> {
    /// Name of the pattern that matched.
    pub pattern: &'p str,
    /// The matched substring of the line.
    pub text: &'t str,
}

/// Immutable, ordered set of case-insensitive trailer patterns.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Compiles a pattern set from `(name, expression)` pairs.
    ///
    /// Every expression is compiled case-insensitively and is unanchored.
    pub fn new<I, N, E>(specs: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = (N, E)>,
        N: Into<String>,
        E: AsRef<str>,
    {
        let patterns = specs
            .into_iter()
            .map(|(name, expr)| compile(name.into(), expr.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Returns the shared default pattern set.
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&*BUILTIN)
    }

    /// Returns a copy of this set with extra patterns appended.
    pub fn with_additional<I, N, E>(&self, specs: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = (N, E)>,
        N: Into<String>,
        E: AsRef<str>,
    {
        let extra = Self::new(specs)?;
        let mut patterns = self.patterns.clone();
        patterns.extend(extra.patterns);
        Ok(Self { patterns })
    }

    /// Returns every pattern that matches somewhere in `line`, in set order.
    pub fn matches<'p, 't>(&'p self, line: &'t str) -> Vec<PatternMatch<'p, 't>> {
        self.patterns
            .iter()
            .filter_map(|p| {
                p.regex.find(line).map(|m| PatternMatch {
                    pattern: p.name.as_str(),
                    text: m.as_str(),
                })
            })
            .collect()
    }

    /// Returns `true` if any pattern matches `line`.
    pub fn is_match(&self, line: &str) -> bool {
        self.patterns.iter().any(|p| p.regex.is_match(line))
    }

    /// Iterates over the patterns in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    /// Number of patterns in the set.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` if the set holds no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn compile(name: String, expr: &str) -> Result<Pattern, PatternError> {
    match RegexBuilder::new(expr).case_insensitive(true).build() {
        Ok(regex) => Ok(Pattern { name, regex }),
        Err(source) => Err(PatternError { name, source }),
    }
}
