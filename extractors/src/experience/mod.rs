mod aggregate;
mod duration;

pub use aggregate::{company_key, AggregateFilter, AggregateRule, FilterOutcome, RemovedEntry};
pub use duration::{
    is_aggregate_total, normalize_duration, parse_duration, DurationParser, DurationTier,
};

use shared_types::RawEntry;

/// Result of totalling an experience list, with the bookkeeping the pipeline reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceSummary {
    pub entries: Vec<RawEntry>,
    pub removed: Vec<RemovedEntry>,
    pub over_filtered: bool,
    pub total_months: u32,
    pub years: u32,
    /// Surviving entries whose duration yielded no months
    pub unparsed: usize,
}

/// Sums individual-role durations into whole years of experience
#[derive(Debug, Clone, Copy, Default)]
pub struct ExperienceAggregator {
    parser: DurationParser,
    filter: AggregateFilter,
}

impl ExperienceAggregator {
    pub fn new() -> Self {
        Self::with_parser(DurationParser::new())
    }

    pub fn with_parser(parser: DurationParser) -> Self {
        Self {
            parser,
            filter: AggregateFilter::new(),
        }
    }

    pub fn parser(&self) -> &DurationParser {
        &self.parser
    }

    pub fn total(&self, entries: &[RawEntry]) -> u32 {
        self.summarize(entries).years
    }

    pub fn summarize(&self, entries: &[RawEntry]) -> ExperienceSummary {
        let months: Vec<u32> = entries
            .iter()
            .map(|e| self.parser.parse(&e.duration))
            .collect();

        let outcome = self.filter.classify(entries);

        let mut total_months: u32 = 0;
        let mut unparsed = 0;
        for (index, m) in months.iter().enumerate() {
            if outcome.removed.iter().any(|r| r.index == index) {
                continue;
            }
            if *m == 0 {
                unparsed += 1;
            }
            total_months = total_months.saturating_add(*m);
        }

        if unparsed > 0 {
            tracing::debug!(unparsed, "Experience entries without a parseable duration");
        }

        ExperienceSummary {
            years: months_to_years(total_months),
            entries: outcome.kept,
            removed: outcome.removed,
            over_filtered: outcome.over_filtered,
            total_months,
            unparsed,
        }
    }
}

/// Whole years, rounding half a year up
pub fn months_to_years(months: u32) -> u32 {
    ((u64::from(months) + 6) / 12) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(title: &str, company: &str, duration: &str) -> RawEntry {
        RawEntry {
            title: title.to_string(),
            company: company.to_string(),
            duration: duration.to_string(),
            ..Default::default()
        }
    }

    fn aggregator() -> ExperienceAggregator {
        ExperienceAggregator::with_parser(DurationParser::with_reference_year(2026))
    }

    #[test]
    fn test_total_skips_company_totals() {
        let entries = vec![
            entry("", "Acme Corp at 5 yrs", "5 yrs"),
            entry("Engineer", "Acme Corp", "2 yrs"),
            entry("Senior Engineer", "Acme Corp", "3 yrs"),
        ];

        let filtered = AggregateFilter::new().filter(&entries);
        assert_eq!(aggregator().total(&filtered), 5);
        assert_eq!(aggregator().total(&entries), 5);
    }

    #[test]
    fn test_summary_counts_unparsed_entries() {
        let entries = vec![
            entry("Engineer", "Acme", "1 yr 6 mos"),
            entry("Volunteer", "Shelter", "on weekends"),
        ];
        let summary = aggregator().summarize(&entries);

        assert_eq!(summary.total_months, 18);
        assert_eq!(summary.years, 2);
        assert_eq!(summary.unparsed, 1);
        assert_eq!(summary.entries.len(), 2);
    }

    #[test]
    fn test_rounding_is_half_up() {
        assert_eq!(months_to_years(0), 0);
        assert_eq!(months_to_years(5), 0);
        assert_eq!(months_to_years(6), 1);
        assert_eq!(months_to_years(17), 1);
        assert_eq!(months_to_years(18), 2);
        assert_eq!(months_to_years(u32::MAX), 357_913_941);
    }

    fn arb_entry() -> impl Strategy<Value = RawEntry> {
        let titles = prop::sample::select(vec![
            "",
            "Engineer",
            "Acme Corp",
            "Lead at 3 yrs",
            "Analyst",
        ]);
        let companies = prop::sample::select(vec![
            "Acme Corp",
            "Acme Corp at 5 yrs",
            "Acme",
            "Globex · Full-time",
            "Globex",
            "",
        ]);
        let durations = prop::sample::select(vec![
            "2 yrs",
            "3 yrs 2 mos",
            "Full-time · 4 yrs",
            "Jan 2020 - Present",
            "8 mos",
            "",
            "Acme Corp at 5 yrs",
        ]);

        (titles, companies, durations).prop_map(|(t, c, d)| entry(t, c, d))
    }

    proptest! {
        #[test]
        fn filter_is_idempotent(entries in prop::collection::vec(arb_entry(), 0..8)) {
            let filter = AggregateFilter::new();
            let once = filter.filter(&entries);
            prop_assert_eq!(filter.filter(&once), once);
        }

        #[test]
        fn total_matches_filtered_sum(entries in prop::collection::vec(arb_entry(), 0..8)) {
            let aggregator = aggregator();
            let kept = AggregateFilter::new().filter(&entries);
            let months: u32 = kept.iter().map(|e| aggregator.parser().parse(&e.duration)).sum();
            prop_assert_eq!(aggregator.total(&entries), months_to_years(months));
        }
    }
}
