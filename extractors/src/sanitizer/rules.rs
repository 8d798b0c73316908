use regex::Regex;

/// Public figures whose cards leak into scraped profile text
pub const PUBLIC_FIGURES: &[&str] = &[
    "Bill Gates",
    "Melinda French Gates",
    "Satya Nadella",
    "Sundar Pichai",
    "Jeff Weiner",
    "Ryan Roslansky",
    "Reid Hoffman",
    "Richard Branson",
    "Arianna Huffington",
    "Simon Sinek",
    "Adam Grant",
    "Brené Brown",
    "Gary Vaynerchuk",
    "Mark Cuban",
    "Oprah Winfrey",
    "Elon Musk",
    "Tim Cook",
];

/// Employers whose company cards (name + follower count) show up in sidebars
pub const WELL_KNOWN_EMPLOYERS: &[&str] = &[
    "Microsoft",
    "Google",
    "Amazon",
    "Apple",
    "Meta",
    "LinkedIn",
    "IBM",
    "Oracle",
    "Salesforce",
    "Netflix",
    "Tesla",
    "Adobe",
    "Intel",
    "NVIDIA",
    "Deloitte",
    "Accenture",
    "McKinsey & Company",
    "Goldman Sachs",
    "J.P. Morgan",
];

/// Profile section headings; a sidebar block ends at the next one
pub const SECTION_HEADERS: &[&str] = &[
    "About",
    "Activity",
    "Experience",
    "Education",
    "Skills",
    "Licenses & certifications",
    "Certifications",
    "Projects",
    "Volunteering",
    "Volunteer experience",
    "Publications",
    "Honors & awards",
    "Languages",
    "Recommendations",
    "Courses",
    "Interests",
    "Contact info",
];

const FOLLOWER_LINE: &str =
    r"[ \t]*\d[\d,.]*[ \t]*[KkMm]?\+?[ \t]+(?i:followers?|connections?)[ \t]*";
// Company cards only ever show followers; "N connections" belongs to people
const COMPANY_FOLLOWER_LINE: &str =
    r"[ \t]*\d[\d,.]*[ \t]*[KkMm]?\+?[ \t]+(?i:followers?)[ \t]*";
const NAME_CHAR: &str = r"[\p{L}\p{N}&.,'’()-]";
// A card name never ends in sentence punctuation
const NAME_END: &str = r"[\p{L}\p{N}&'’()-]";

#[derive(Debug, Clone)]
pub enum RuleKind {
    /// Delete every match
    Delete(Regex),
    /// Delete from the start of the line holding `start` up to the next `stop` line, or the end
    Block { start: Regex, stop: Regex },
}

/// One named, pattern-based deletion
#[derive(Debug, Clone)]
pub struct SanitizeRule {
    pub name: &'static str,
    pub kind: RuleKind,
}

impl SanitizeRule {
    fn delete(name: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            kind: RuleKind::Delete(Regex::new(pattern)?),
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        match &self.kind {
            RuleKind::Delete(re) => re.is_match(text),
            RuleKind::Block { start, .. } => start.is_match(text),
        }
    }

    pub fn apply(&self, text: &str) -> String {
        match &self.kind {
            RuleKind::Delete(re) => re.replace_all(text, "").into_owned(),
            RuleKind::Block { start, stop } => remove_blocks(text, start, stop),
        }
    }
}

fn remove_blocks(text: &str, start: &Regex, stop: &Regex) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while let Some(m) = start.find_at(text, pos) {
        let line_start = text[..m.start()].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_start = line_start.max(pos);
        out.push_str(&text[pos..line_start]);

        match stop.find_at(text, m.end()) {
            Some(header) => pos = header.start(),
            None => {
                pos = text.len();
                break;
            }
        }
    }

    out.push_str(&text[pos..]);
    out
}

fn alternation(names: &[&str], extra: &[String]) -> String {
    names
        .iter()
        .copied()
        .chain(extra.iter().map(String::as_str))
        .filter(|n| !n.trim().is_empty())
        .map(|n| regex::escape(n.trim()))
        .collect::<Vec<_>>()
        .join("|")
}

/// Ordered rule table. Line-shaped rules run before the inline ones so that a
/// follower count still marks the company line above it.
pub fn build_rules(
    extra_public_figures: &[String],
    extra_employers: &[String],
) -> Result<Vec<SanitizeRule>, regex::Error> {
    let headers = alternation(SECTION_HEADERS, &[]);
    let figures = alternation(PUBLIC_FIGURES, extra_public_figures);
    let employers = alternation(WELL_KNOWN_EMPLOYERS, extra_employers);
    // One to five words, the first capitalized and at least two characters long
    let company = format!(
        r"\p{{Lu}}(?:{c}*{e}|{c}+(?: {c}*){{0,3}} {c}*{e})",
        c = NAME_CHAR,
        e = NAME_END
    );

    Ok(vec![
        SanitizeRule {
            name: "people_also_viewed",
            kind: RuleKind::Block {
                start: Regex::new(
                    r"(?im)^[ \t]*(?:people also viewed|people you may know|people also follow|more profiles for you)[ \t]*$",
                )?,
                stop: Regex::new(&format!(r"(?im)^[ \t]*(?:{headers})[ \t]*$"))?,
            },
        },
        SanitizeRule::delete(
            "public_figure",
            &format!(r"(?im)^[ \t]*(?:{figures})[ \t]*(?:·[ \t]*(?:1st|2nd|3rd)\+?[ \t]*)?$"),
        )?,
        SanitizeRule::delete(
            "employer_followers",
            &format!(r"(?im)^[ \t]*(?:{employers})[ \t]*\r?\n{COMPANY_FOLLOWER_LINE}$"),
        )?,
        SanitizeRule::delete(
            "company_followers",
            &format!(r"(?m)^[ \t]*{company}[ \t]*\r?\n{COMPANY_FOLLOWER_LINE}$"),
        )?,
        SanitizeRule::delete("follower_line", &format!(r"(?m)^{FOLLOWER_LINE}$"))?,
        SanitizeRule::delete(
            "endorsement_line",
            r"(?im)^[ \t]*at[ \t]+\d+[ \t]+endorsements?\b[^\n]*$",
        )?,
        SanitizeRule::delete("endorsed_by", r"(?i)\bendorsed by[ \t]+\d+[ \t]+\p{L}[^\n]*")?,
        SanitizeRule::delete("endorsement_count", r"(?i)(?:·[ \t]*)?\b\d+[ \t]+endorsements?\b")?,
        SanitizeRule::delete(
            "newsletter",
            r"(?i)\bsubscribe to (?:my |our |the |this )?newsletter\b[^\n]*",
        )?,
        SanitizeRule::delete(
            "subscriber_count",
            r"(?i)\b\d[\d,.]*[ \t]*[KkMm]?\+?[ \t]+subscribers?\b",
        )?,
        SanitizeRule::delete(
            "follower_count",
            r"(?i)\b\d[\d,.]*[ \t]*[KkMm]?\+?[ \t]+(?:followers?|connections?)\b",
        )?,
        SanitizeRule::delete("connection_degree", r"(?i)·[ \t]*(?:1st|2nd|3rd)\b\+?")?,
        // Case-sensitive: narrative "was promoted to" must survive
        SanitizeRule::delete("promoted", r"\bPromoted\b")?,
    ])
}
