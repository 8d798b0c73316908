use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::RawEntry;

/// Section-location collaborator consumed by the pipeline.
///
/// Implementations must return `None` (or an empty value) when a section is
/// not present on the page; they never fail.
pub trait SectionLocator {
    /// Locate one section of the profile
    fn locate(&self, kind: SectionKind) -> Option<SectionContent>;

    fn entries(&self, kind: SectionKind) -> Vec<RawEntry> {
        match self.locate(kind) {
            Some(SectionContent::Entries(entries)) => entries,
            _ => Vec::new(),
        }
    }

    fn text(&self, kind: SectionKind) -> String {
        match self.locate(kind) {
            Some(SectionContent::Text(text)) => text,
            Some(SectionContent::Items(items)) => items.join("\n"),
            _ => String::new(),
        }
    }

    fn items(&self, kind: SectionKind) -> Vec<String> {
        match self.locate(kind) {
            Some(SectionContent::Items(items)) => items,
            Some(SectionContent::Text(text)) => text
                .lines()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Sections the locator can be asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    Experience,
    Education,
    Skills,
    About,
}

/// What a located section holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SectionContent {
    Entries(Vec<RawEntry>),
    Text(String),
    Items(Vec<String>),
}

/// Errors raised at the edges of the pipeline (input files, configuration).
/// The pipeline itself degrades instead of failing.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for ProfileError {
    fn from(err: serde_json::Error) -> Self {
        ProfileError::ParseError(err.to_string())
    }
}
