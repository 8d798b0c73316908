use serde::{Deserialize, Serialize};
use shared_types::RawEntry;

use crate::email::HOST_DOMAINS;

/// Tunables for one pipeline. Every field has a default so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub max_plausible_years: u32,
    pub min_about_chars: usize,
    pub adopt_about_chars: usize,
    pub max_email_len: usize,
    pub host_domains: Vec<String>,
    pub extra_blocked_email_prefixes: Vec<String>,
    pub extra_public_figures: Vec<String>,
    pub extra_employers: Vec<String>,
    pub overrides: Vec<RoleOverride>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_plausible_years: 50,
            min_about_chars: 10,
            adopt_about_chars: 20,
            max_email_len: 50,
            host_domains: HOST_DOMAINS.iter().map(|d| d.to_string()).collect(),
            extra_blocked_email_prefixes: Vec::new(),
            extra_public_figures: Vec::new(),
            extra_employers: Vec::new(),
            overrides: Vec::new(),
        }
    }
}

impl PipelineConfig {
    pub fn validation_limits(&self) -> ValidationLimits {
        ValidationLimits {
            max_plausible_years: self.max_plausible_years,
            min_about_chars: self.min_about_chars,
            adopt_about_chars: self.adopt_about_chars,
        }
    }
}

/// A role known to be missing from a specific profile's page, keyed by its stable id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleOverride {
    pub profile_id: String,
    pub entry: RawEntry,
}

/// Thresholds the validator checks against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    pub max_plausible_years: u32,
    pub min_about_chars: usize,
    pub adopt_about_chars: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        PipelineConfig::default().validation_limits()
    }
}
