use shared_types::{ProfileRecord, SectionKind, SectionLocator, ValidationReport};

use crate::config::ValidationLimits;
use crate::email::is_valid_email;
use crate::experience::ExperienceAggregator;
use crate::sanitizer::TextSanitizer;

/// Audits an assembled record, repairing implausible totals at most once
#[derive(Debug, Clone, Default)]
pub struct ProfileValidator {
    sanitizer: TextSanitizer,
    aggregator: ExperienceAggregator,
    limits: ValidationLimits,
}

impl ProfileValidator {
    pub fn new(
        sanitizer: TextSanitizer,
        aggregator: ExperienceAggregator,
        limits: ValidationLimits,
    ) -> Self {
        Self {
            sanitizer,
            aggregator,
            limits,
        }
    }

    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Always hands the record back; `ok` is true only when no issue was found.
    ///
    /// `summary` is asked for the About section when the record's own is too
    /// short to be useful.
    pub fn validate(
        &self,
        mut record: ProfileRecord,
        summary: Option<&dyn SectionLocator>,
    ) -> ValidationReport {
        let mut issues = Vec::new();
        let mut repaired = false;

        if record.years_experience > self.limits.max_plausible_years {
            tracing::warn!(
                years = record.years_experience,
                max = self.limits.max_plausible_years,
                "Implausible experience total, recomputing"
            );

            let summary = self.aggregator.summarize(&record.experience);
            record.experience = summary.entries;
            record.years_experience = summary.years;
            repaired = true;

            if record.years_experience > self.limits.max_plausible_years {
                issues.push(format!(
                    "yearsExperience: {} exceeds plausible maximum of {}",
                    record.years_experience, self.limits.max_plausible_years
                ));
            }
        }

        let email = record.email.trim().to_lowercase();
        record.email = if email.is_empty() || is_valid_email(&email) {
            email
        } else {
            issues.push(format!("email: malformed address {:?}", record.email));
            String::new()
        };

        if record.about.trim().chars().count() < self.limits.min_about_chars {
            if let Some(locator) = summary {
                let candidate = self.sanitizer.sanitize(&locator.text(SectionKind::About));
                if candidate.chars().count() > self.limits.adopt_about_chars {
                    tracing::debug!(chars = candidate.len(), "Adopted re-located about section");
                    record.about = candidate;
                }
            }
        }

        issues.extend(self.residual_matches(&record));

        if !issues.is_empty() {
            tracing::warn!(issues = issues.len(), "Profile record failed validation");
        }

        ValidationReport {
            ok: issues.is_empty(),
            record,
            issues,
            repaired,
        }
    }

    /// Sanitizer rules that still match any narrative or experience field
    fn residual_matches(&self, record: &ProfileRecord) -> Vec<String> {
        let mut fields: Vec<(String, &str)> = vec![
            ("fullText".to_string(), record.full_text.as_str()),
            ("about".to_string(), record.about.as_str()),
        ];
        for (i, entry) in record.experience.iter().enumerate() {
            for (name, value) in entry.text_fields() {
                fields.push((format!("experience[{}].{}", i, name), value));
            }
        }

        fields
            .into_iter()
            .flat_map(|(field, value)| {
                self.sanitizer
                    .violations(value)
                    .into_iter()
                    .map(move |rule| format!("{}: matches {}", field, rule))
            })
            .collect()
    }
}
