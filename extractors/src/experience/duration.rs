use chrono::Datelike;
use regex::Regex;
use std::sync::LazyLock;

static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[·•∙⋅]").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static AGGREGATE_GUARD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\p{L}[\p{L}\p{N}&.,'()/\- ]*?\s+at\s+\d+\s*(?:yrs?|years?)\b").unwrap()
});
static COMBINED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)\s*(?:yrs?|years?)\b(?:\s*(\d+)\s*(?:mos?|months?)\b)?").unwrap()
});
static YEARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+)\s*(?:yrs?|years?)\b").unwrap());
static MONTHS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+)\s*(?:mos?|months?)\b").unwrap());
static DATE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d{4})\b\s*[-–—]\s*(?:\p{L}{3,9}\.?\s+)?(?:\b(\d{4})\b|\b(present|current|now)\b)",
    )
    .unwrap()
});

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;

/// Which step of the fallback chain produced a month count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationTier {
    Combined,
    Separate,
    DateRange,
}

/// Converts free-text role durations into month counts.
///
/// Tiers run in order and the first non-zero result wins; they are never summed.
/// A company-level total such as `"Acme Corp at 5 yrs"` always parses to zero.
#[derive(Debug, Clone, Copy)]
pub struct DurationParser {
    reference_year: i32,
}

impl DurationParser {
    /// Parser resolving "Present" to the current calendar year
    pub fn new() -> Self {
        Self {
            reference_year: chrono::Local::now().year(),
        }
    }

    /// Parser resolving "Present" to a fixed year
    pub fn with_reference_year(reference_year: i32) -> Self {
        Self { reference_year }
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    pub fn parse(&self, duration: &str) -> u32 {
        self.parse_with_tier(duration).0
    }

    pub fn parse_with_tier(&self, duration: &str) -> (u32, Option<DurationTier>) {
        let normalized = normalize_duration(duration);
        if normalized.is_empty() {
            return (0, None);
        }

        if is_aggregate_total(&normalized) {
            tracing::debug!(duration = %normalized, "Duration is a company total, ignoring");
            return (0, None);
        }

        let tiers: [(DurationTier, fn(&Self, &str) -> Option<u32>); 3] = [
            (DurationTier::Combined, Self::combined_months),
            (DurationTier::Separate, Self::separate_months),
            (DurationTier::DateRange, Self::date_range_months),
        ];

        for (tier, parse) in tiers {
            if let Some(months) = parse(self, &normalized).filter(|m| *m > 0) {
                return (months, Some(tier));
            }
        }

        (0, None)
    }

    fn combined_months(&self, text: &str) -> Option<u32> {
        let captures = COMBINED_RE.captures(text)?;
        let years: u32 = captures.get(1)?.as_str().parse().ok()?;
        let months: u32 = match captures.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };

        years.checked_mul(12)?.checked_add(months)
    }

    fn separate_months(&self, text: &str) -> Option<u32> {
        let years = first_number(&YEARS_RE, text);
        let months = first_number(&MONTHS_RE, text);

        if years.is_none() && months.is_none() {
            return None;
        }

        years
            .unwrap_or(0)
            .checked_mul(12)?
            .checked_add(months.unwrap_or(0))
    }

    fn date_range_months(&self, text: &str) -> Option<u32> {
        let captures = DATE_RANGE_RE.captures(text)?;
        let start: i32 = captures.get(1)?.as_str().parse().ok()?;

        let end: i32 = if captures.get(3).is_some() {
            self.reference_year
        } else {
            captures.get(2)?.as_str().parse().ok()?
        };

        if !(MIN_YEAR..=MAX_YEAR).contains(&start) || !(MIN_YEAR..=MAX_YEAR).contains(&end) {
            return None;
        }

        if end < start {
            tracing::debug!(start, end, "Date range runs backwards, ignoring");
            return None;
        }

        u32::try_from((end - start) * 12).ok()
    }
}

impl Default for DurationParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse with a parser anchored to the current year
pub fn parse_duration(duration: &str) -> u32 {
    DurationParser::new().parse(duration)
}

/// Separator glyphs become spaces, whitespace collapses, ends are trimmed.
pub fn normalize_duration(duration: &str) -> String {
    let spaced = SEPARATOR_RE.replace_all(duration, " ");
    WHITESPACE_RE.replace_all(&spaced, " ").trim().to_string()
}

/// `<company-like text> at <N> yrs`, the shape of a company-level total
pub fn is_aggregate_total(normalized: &str) -> bool {
    AGGREGATE_GUARD_RE.is_match(normalized)
}

fn first_number(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> DurationParser {
        DurationParser::with_reference_year(2026)
    }

    #[test]
    fn test_combined_years_and_months() {
        assert_eq!(parser().parse("3 yrs 2 mos"), 38);
        assert_eq!(parser().parse("1 year 3 months"), 15);
        assert_eq!(parser().parse("5 yrs"), 60);
    }

    #[test]
    fn test_empty_duration() {
        assert_eq!(parser().parse(""), 0);
        assert_eq!(parser().parse("   "), 0);
        assert_eq!(parser().parse(" · "), 0);
    }

    #[test]
    fn test_company_total_is_ignored() {
        assert_eq!(parser().parse("Acme Corp at 5 yrs"), 0);
        assert_eq!(parser().parse("Acme Corp · at 5 yrs 4 mos"), 0);
    }

    #[test]
    fn test_months_only_falls_through_to_separate_tier() {
        assert_eq!(
            parser().parse_with_tier("8 mos"),
            (8, Some(DurationTier::Separate))
        );
    }

    #[test]
    fn test_first_tier_wins() {
        // Combined matches "1 yr" first; the trailing months are not added
        assert_eq!(
            parser().parse_with_tier("2 mos 1 yr"),
            (12, Some(DurationTier::Combined))
        );
    }

    #[test]
    fn test_date_range_with_present() {
        assert_eq!(
            parser().parse_with_tier("Jan 2020 - Present"),
            (72, Some(DurationTier::DateRange))
        );
        assert_eq!(parser().parse("Mar 2019 – Current"), 84);
    }

    #[test]
    fn test_date_range_against_current_year() {
        let year = chrono::Local::now().year();
        assert_eq!(
            parse_duration("Jan 2020 - Present"),
            u32::try_from((year - 2020) * 12).unwrap()
        );
    }

    #[test]
    fn test_date_range_between_years() {
        assert_eq!(parser().parse("2015 - 2018"), 36);
        assert_eq!(parser().parse("Sep 2015 - Jun 2018"), 36);
    }

    #[test]
    fn test_linkedin_style_duration_prefers_explicit_length() {
        assert_eq!(parser().parse("Jan 2020 - Present · 4 yrs 10 mos"), 58);
    }

    #[test]
    fn test_backwards_range_is_unparsed() {
        assert_eq!(parser().parse("Mar 2021 - Jan 2019"), 0);
    }

    #[test]
    fn test_unparseable_text() {
        assert_eq!(parser().parse("Full-time"), 0);
        assert_eq!(parser().parse("a while"), 0);
        assert_eq!(parser().parse("99999999999 yrs"), 0);
    }

    #[test]
    fn test_normalize_strips_separators() {
        assert_eq!(normalize_duration("  Full-time •  2 yrs·3 mos "), "Full-time 2 yrs 3 mos");
    }
}
