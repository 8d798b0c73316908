mod rules;

pub use rules::{
    build_rules, RuleKind, SanitizeRule, PUBLIC_FIGURES, SECTION_HEADERS, WELL_KNOWN_EMPLOYERS,
};

use regex::Regex;
use shared_types::ProfileError;
use std::sync::LazyLock;

static LINE_ENDING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n?").unwrap());
static HORIZONTAL_WS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{00A0}\u{2009}\u{202F}]+").unwrap());
static SPACE_AROUND_NEWLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" ?\n ?").unwrap());
static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

static DEFAULT_SANITIZER: LazyLock<TextSanitizer> = LazyLock::new(TextSanitizer::new);

/// Strips social and marketing noise from narrative profile text.
///
/// Rules apply in table order, followed by whitespace normalization, and the
/// whole pass repeats until it changes nothing. Every rule only deletes, so
/// the loop terminates, and the result is a fixed point: sanitizing twice is
/// the same as sanitizing once.
#[derive(Debug, Clone)]
pub struct TextSanitizer {
    rules: Vec<SanitizeRule>,
}

impl TextSanitizer {
    pub fn new() -> Self {
        Self {
            rules: build_rules(&[], &[]).expect("built-in sanitizer rules compile"),
        }
    }

    /// Rule table extended with extra public-figure and employer names
    pub fn with_extensions(
        extra_public_figures: &[String],
        extra_employers: &[String],
    ) -> Result<Self, ProfileError> {
        let rules = build_rules(extra_public_figures, extra_employers)
            .map_err(|e| ProfileError::ConfigError(format!("Invalid sanitizer rule: {}", e)))?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[SanitizeRule] {
        &self.rules
    }

    pub fn sanitize(&self, text: &str) -> String {
        let mut current = normalize_whitespace(text);

        loop {
            let next = self.pass(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    /// Names of the rules that still match, without modifying anything
    pub fn violations(&self, text: &str) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter(|rule| rule.is_match(text))
            .map(|rule| rule.name)
            .collect()
    }

    fn pass(&self, text: &str) -> String {
        let mut out = text.to_string();
        for rule in &self.rules {
            if rule.is_match(&out) {
                out = rule.apply(&out);
            }
        }
        normalize_whitespace(&out)
    }
}

impl Default for TextSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Sanitize with the built-in rule table
pub fn sanitize_text(text: &str) -> String {
    DEFAULT_SANITIZER.sanitize(text)
}

fn normalize_whitespace(text: &str) -> String {
    let text = LINE_ENDING_RE.replace_all(text, "\n");
    let text = HORIZONTAL_WS_RE.replace_all(&text, " ");
    let text = SPACE_AROUND_NEWLINE_RE.replace_all(&text, "\n");
    let text = BLANK_LINES_RE.replace_all(&text, "\n\n");
    text.trim().to_string()
}
