use shared_types::{
    PipelineDiagnostics, PipelineOutput, PipelineStage, ProfileError, ProfileRecord, RawEntry,
    SectionKind, SectionLocator,
};

use crate::config::{PipelineConfig, RoleOverride};
use crate::document::ProfileDocument;
use crate::email::{EmailDenylist, EmailResolver};
use crate::experience::{DurationParser, ExperienceAggregator};
use crate::locator::TextSectionLocator;
use crate::sanitizer::TextSanitizer;
use crate::validator::ProfileValidator;

/// One profile page plus what the page-side collaborator already located
pub struct ProfileInput<'a> {
    pub document: &'a ProfileDocument,
    pub display_name: &'a str,
    pub sections: &'a dyn SectionLocator,
    /// Stable identifier used to look up role overrides
    pub profile_id: Option<&'a str>,
}

/// Runs every stage from located sections to a validated record
#[derive(Debug, Clone)]
pub struct ProfilePipeline {
    aggregator: ExperienceAggregator,
    sanitizer: TextSanitizer,
    resolver: EmailResolver,
    validator: ProfileValidator,
    overrides: Vec<RoleOverride>,
}

impl ProfilePipeline {
    pub fn new() -> Self {
        let aggregator = ExperienceAggregator::new();
        let sanitizer = TextSanitizer::new();
        Self {
            aggregator,
            validator: ProfileValidator::new(sanitizer.clone(), aggregator, Default::default()),
            sanitizer,
            resolver: EmailResolver::default(),
            overrides: Vec::new(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, ProfileError> {
        let aggregator = ExperienceAggregator::new();
        let sanitizer =
            TextSanitizer::with_extensions(&config.extra_public_figures, &config.extra_employers)?;
        let denylist =
            EmailDenylist::new(&config.host_domains, &config.extra_blocked_email_prefixes);

        Ok(Self {
            aggregator,
            validator: ProfileValidator::new(
                sanitizer.clone(),
                aggregator,
                config.validation_limits(),
            ),
            sanitizer,
            resolver: EmailResolver::new(denylist, config.max_email_len),
            overrides: config.overrides.clone(),
        })
    }

    /// Pin the year "Present" resolves to
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.aggregator =
            ExperienceAggregator::with_parser(DurationParser::with_reference_year(year));
        self.validator = ProfileValidator::new(
            self.sanitizer.clone(),
            self.aggregator,
            *self.validator.limits(),
        );
        self
    }

    pub fn run(&self, input: &ProfileInput) -> PipelineOutput {
        let mut diagnostics = PipelineDiagnostics::default();
        let mut stages = vec![PipelineStage::Raw];

        let raw_text = input.document.full_text();
        let text_sections = TextSectionLocator::new(&raw_text);

        let mut experience = input.sections.entries(SectionKind::Experience);
        if let Some(profile_id) = input.profile_id {
            let before = experience.len();
            experience.extend(self.overrides_for(profile_id));
            diagnostics.overrides_applied = experience.len() - before;
        }
        let education = input.sections.entries(SectionKind::Education);
        let about = input.sections.text(SectionKind::About);
        let mut skills = input.sections.items(SectionKind::Skills);
        if skills.is_empty() {
            skills = text_sections.items(SectionKind::Skills);
        }
        stages.push(PipelineStage::Located);
        tracing::debug!(
            experience = experience.len(),
            education = education.len(),
            skills = skills.len(),
            "Located profile sections"
        );

        let summary = self.aggregator.summarize(&experience);
        stages.extend([
            PipelineStage::DurationParsed,
            PipelineStage::AggregateFiltered,
            PipelineStage::Totaled,
        ]);
        diagnostics.aggregates_removed = summary.removed.len();
        diagnostics.over_filtered = summary.over_filtered;
        diagnostics.unparsed_durations = summary.unparsed;

        let experience: Vec<RawEntry> = summary
            .entries
            .into_iter()
            .map(|e| self.sanitize_entry(e))
            .collect();
        let education: Vec<RawEntry> = education
            .into_iter()
            .map(|e| self.sanitize_entry(e))
            .collect();
        let about = self.sanitizer.sanitize(&about);
        let full_text = self.sanitizer.sanitize(&raw_text);
        let skills = self.sanitize_skills(skills);
        stages.push(PipelineStage::Sanitized);

        let resolution = self.resolver.resolve_detailed(input.document, input.display_name);
        diagnostics.email_candidates = resolution.candidates.len();
        diagnostics.email_strategy = resolution.strategy;

        let record = ProfileRecord {
            name: input.display_name.trim().to_string(),
            email: resolution.email,
            about,
            experience,
            education,
            skills,
            years_experience: summary.years,
            full_text,
        };
        stages.push(PipelineStage::Assembled);

        let report = self.validator.validate(record, Some(&text_sections));
        stages.push(PipelineStage::Validated);
        if report.repaired {
            stages.extend([PipelineStage::Repaired, PipelineStage::Validated]);
        }
        stages.push(PipelineStage::Final);
        diagnostics.stages = stages;

        tracing::info!(
            name = %report.record.name,
            years = report.record.years_experience,
            roles = report.record.experience.len(),
            ok = report.ok,
            issues = report.issues.len(),
            "Profile pipeline finished"
        );

        PipelineOutput {
            report,
            diagnostics,
        }
    }

    fn overrides_for<'a>(&'a self, profile_id: &'a str) -> impl Iterator<Item = RawEntry> + 'a {
        self.overrides
            .iter()
            .filter(move |o| o.profile_id == profile_id)
            .map(|o| o.entry.clone())
    }

    /// Narrative fields only; title, company and duration drive classification and stay as located
    fn sanitize_entry(&self, entry: RawEntry) -> RawEntry {
        RawEntry {
            location: self.sanitizer.sanitize(&entry.location),
            employment_type: self.sanitizer.sanitize(&entry.employment_type),
            description: self.sanitizer.sanitize(&entry.description),
            ..entry
        }
    }

    fn sanitize_skills(&self, skills: Vec<String>) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(skills.len());
        for skill in skills {
            let skill = self.sanitizer.sanitize(&skill);
            if !skill.is_empty() && !out.iter().any(|s| s.eq_ignore_ascii_case(&skill)) {
                out.push(skill);
            }
        }
        out
    }
}

impl Default for ProfilePipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::StaticSections;
    use shared_types::EmailStrategy;

    const PAGE: &str = r#"<html><body>
        <h1>Alice Smith</h1>
        <p>Staff Engineer · 2nd</p>
        <h2>About</h2>
        <p>I design payment systems and mentor engineers.</p>
        <p>5,234 followers</p>
        <h2>Skills</h2>
        <ul><li>Rust</li><li>PostgreSQL</li></ul>
        <section id="contact-info"><h2>Contact info</h2>alice.smith@example.com</section>
        <footer>help: support@example.com</footer>
    </body></html>"#;

    fn entry(title: &str, company: &str, duration: &str) -> RawEntry {
        RawEntry {
            title: title.to_string(),
            company: company.to_string(),
            duration: duration.to_string(),
            ..Default::default()
        }
    }

    fn sections() -> StaticSections {
        StaticSections {
            experience: vec![
                entry("", "Acme Corp at 5 yrs", "5 yrs"),
                RawEntry {
                    description: "Built the ledger. 14 endorsements".to_string(),
                    ..entry("Engineer", "Acme Corp", "2 yrs")
                },
                entry("Senior Engineer", "Acme Corp", "3 yrs"),
            ],
            ..Default::default()
        }
    }

    fn pipeline() -> ProfilePipeline {
        ProfilePipeline::new().with_reference_year(2026)
    }

    #[test]
    fn test_full_run() {
        let document = ProfileDocument::from_html(PAGE);
        let sections = sections();
        let output = pipeline().run(&ProfileInput {
            document: &document,
            display_name: "Alice Smith",
            sections: &sections,
            profile_id: None,
        });

        let record = output.record();
        assert!(output.report.ok, "{:?}", output.report.issues);
        assert_eq!(record.name, "Alice Smith");
        assert_eq!(record.email, "alice.smith@example.com");
        assert_eq!(record.years_experience, 5);
        assert_eq!(record.experience.len(), 2);
        assert_eq!(record.experience[0].description, "Built the ledger.");
        assert_eq!(record.skills, vec!["Rust", "PostgreSQL"]);
        // About was not pre-located, so validation pulled it from the page text
        assert_eq!(record.about, "I design payment systems and mentor engineers.");
        assert!(!record.full_text.contains("followers"));

        assert_eq!(output.diagnostics.aggregates_removed, 1);
        assert_eq!(output.diagnostics.email_strategy, Some(EmailStrategy::TextScan));
        assert_eq!(
            output.diagnostics.stages,
            vec![
                PipelineStage::Raw,
                PipelineStage::Located,
                PipelineStage::DurationParsed,
                PipelineStage::AggregateFiltered,
                PipelineStage::Totaled,
                PipelineStage::Sanitized,
                PipelineStage::Assembled,
                PipelineStage::Validated,
                PipelineStage::Final,
            ]
        );
    }

    #[test]
    fn test_overrides_apply_only_to_their_profile() {
        let config = PipelineConfig {
            overrides: vec![RoleOverride {
                profile_id: "alice-smith-1".to_string(),
                entry: entry("Founder", "Smith Labs", "1 yr"),
            }],
            ..Default::default()
        };
        let pipeline = ProfilePipeline::from_config(&config)
            .unwrap()
            .with_reference_year(2026);
        let document = ProfileDocument::from_text("Alice Smith");
        let sections = sections();

        let run = |profile_id| {
            pipeline.run(&ProfileInput {
                document: &document,
                display_name: "Alice Smith",
                sections: &sections,
                profile_id,
            })
        };

        let with = run(Some("alice-smith-1"));
        assert_eq!(with.diagnostics.overrides_applied, 1);
        assert_eq!(with.record().years_experience, 6);
        assert_eq!(with.record().experience[2].company, "Smith Labs");

        let without = run(Some("someone-else"));
        assert_eq!(without.diagnostics.overrides_applied, 0);
        assert_eq!(without.record().years_experience, 5);
    }

    #[test]
    fn test_implausible_total_takes_the_repair_path() {
        let document = ProfileDocument::from_text("");
        let sections = StaticSections {
            experience: vec![entry("Engineer", "Acme Corp", "60 yrs")],
            ..Default::default()
        };
        let output = pipeline().run(&ProfileInput {
            document: &document,
            display_name: "Alice Smith",
            sections: &sections,
            profile_id: None,
        });

        assert!(!output.report.ok);
        assert!(output.report.repaired);
        assert_eq!(output.record().email, "");
        assert_eq!(
            &output.diagnostics.stages[7..],
            &[
                PipelineStage::Validated,
                PipelineStage::Repaired,
                PipelineStage::Validated,
                PipelineStage::Final,
            ]
        );
    }

    #[test]
    fn test_skills_are_cleaned_and_deduplicated() {
        let skills = pipeline().sanitize_skills(vec![
            "Rust".to_string(),
            "rust".to_string(),
            "12 endorsements".to_string(),
            "Promoted".to_string(),
            "SQL".to_string(),
        ]);
        assert_eq!(skills, vec!["Rust", "SQL"]);
    }

    #[test]
    fn test_configured_public_figures_are_removed() {
        let config = PipelineConfig {
            extra_public_figures: vec!["Ada Lovelace".to_string()],
            ..Default::default()
        };
        let document = ProfileDocument::from_text("Alice Smith\nAda Lovelace\nMathematician");
        let sections = StaticSections::default();
        let output = ProfilePipeline::from_config(&config).unwrap().run(&ProfileInput {
            document: &document,
            display_name: "Alice Smith",
            sections: &sections,
            profile_id: None,
        });

        assert_eq!(output.record().full_text, "Alice Smith\n\nMathematician");
    }
}
