use regex::Regex;
use shared_types::RawEntry;
use std::sync::LazyLock;

static COMPANY_TOTAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^.+?\s*(?:\bat\b|·)\s*\d+\s*(?:yrs?|years?)\b").unwrap()
});
// Prefix carries no digits so date lines like "Jan 2020 - Present · 4 yrs" stay individual
static DURATION_TOTAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\p{L}[\p{L}&.,'()/\- ]*?\s*(?:\bat\b|·)\s*\d+\s*(?:yrs?|years?)\b").unwrap()
});
static TITLE_TOTAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\p{Lu}[\p{L}\p{N}&.,'()/\- ]*?\s*(?:\b[Aa][Tt]\b|·)\s*\d+\s*(?i:yrs?|years?)\b")
        .unwrap()
});
static YEARS_MONTHS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+\s*(?:yrs?|years?)\b(?:\s*\d+\s*(?:mos?|months?)\b)?").unwrap()
});
static COMPANY_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\s+at\s+\d+\s*(?:yrs?|years?)\b|·).*$").unwrap()
});
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Ways an experience row can look like a company-level roll-up.
/// Checked in `AggregateRule::ALL` order; the first match is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateRule {
    CompanyTotal,
    DurationTotal,
    TitleTotal,
    RollupRow,
}

impl AggregateRule {
    pub const ALL: [AggregateRule; 4] = [
        AggregateRule::CompanyTotal,
        AggregateRule::DurationTotal,
        AggregateRule::TitleTotal,
        AggregateRule::RollupRow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AggregateRule::CompanyTotal => "company_total",
            AggregateRule::DurationTotal => "duration_total",
            AggregateRule::TitleTotal => "title_total",
            AggregateRule::RollupRow => "rollup_row",
        }
    }

    /// Does the entry at `index` match this rule, given its siblings?
    pub fn matches(&self, entries: &[RawEntry], index: usize) -> bool {
        let Some(entry) = entries.get(index) else {
            return false;
        };

        match self {
            AggregateRule::CompanyTotal => COMPANY_TOTAL_RE.is_match(entry.company.trim()),
            AggregateRule::DurationTotal => DURATION_TOTAL_RE.is_match(entry.duration.trim()),
            AggregateRule::TitleTotal => TITLE_TOTAL_RE.is_match(entry.title.trim()),
            AggregateRule::RollupRow => is_rollup_row(entries, index),
        }
    }
}

/// An entry dropped by the filter, with the rule that caught it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedEntry {
    pub index: usize, // Position in the classified input
    pub entry: RawEntry,
    pub rule: AggregateRule,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    pub kept: Vec<RawEntry>,
    pub removed: Vec<RemovedEntry>,
    /// More than half of the input was classified as aggregate
    pub over_filtered: bool,
}

/// Separates individual roles from company-level totals
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateFilter;

impl AggregateFilter {
    pub fn new() -> Self {
        Self
    }

    /// Entries that represent individual roles, in their original order
    pub fn filter(&self, entries: &[RawEntry]) -> Vec<RawEntry> {
        self.classify(entries).kept
    }

    pub fn classify(&self, entries: &[RawEntry]) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();

        for (index, entry) in entries.iter().enumerate() {
            match self.aggregate_rule(entries, index) {
                Some(rule) => {
                    tracing::debug!(
                        rule = rule.name(),
                        title = %entry.title,
                        company = %entry.company,
                        "Dropping aggregate experience entry"
                    );
                    outcome.removed.push(RemovedEntry {
                        index,
                        entry: entry.clone(),
                        rule,
                    });
                }
                None => outcome.kept.push(entry.clone()),
            }
        }

        outcome.over_filtered = outcome.removed.len() * 2 > entries.len();
        if outcome.over_filtered {
            tracing::warn!(
                removed = outcome.removed.len(),
                total = entries.len(),
                "More than half of the experience entries were classified as aggregates"
            );
        }

        outcome
    }

    pub fn aggregate_rule(&self, entries: &[RawEntry], index: usize) -> Option<AggregateRule> {
        AggregateRule::ALL
            .into_iter()
            .find(|rule| rule.matches(entries, index))
    }
}

/// Lower-cased company name without any "at N yrs" or "· ..." tail
pub fn company_key(company: &str) -> String {
    let head = COMPANY_SUFFIX_RE.replace(company, "");
    WHITESPACE_RE
        .replace_all(head.trim(), " ")
        .to_lowercase()
}

fn companies_overlap(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.starts_with(b) || b.starts_with(a))
}

fn is_rollup_row(entries: &[RawEntry], index: usize) -> bool {
    let entry = &entries[index];
    let title = entry.title.trim();
    let company = entry.company.trim();

    let untitled = title.is_empty() || title.eq_ignore_ascii_case(company);
    if !untitled || !YEARS_MONTHS_RE.is_match(&entry.duration) {
        return false;
    }

    let key = company_key(company);
    let siblings = entries
        .iter()
        .enumerate()
        .filter(|(i, other)| *i != index && companies_overlap(&key, &company_key(&other.company)))
        .count();

    siblings > 1
}
