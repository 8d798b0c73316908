mod denylist;

pub use denylist::{EmailDenylist, BLOCKED_PREFIXES, CODE_HOSTING_DOMAINS, HOST_DOMAINS};

use crate::document::ProfileDocument;
use regex::Regex;
use shared_types::EmailStrategy;
use std::sync::LazyLock;

static EMAIL_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").unwrap()
});
static EMAIL_SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9._%+-]+@[a-z0-9-]+(?:\.[a-z0-9-]+)*\.[a-z]{2,}$").unwrap()
});
static NAME_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").unwrap());

pub const DEFAULT_MAX_EMAIL_LEN: usize = 50;

/// `local@domain.tld`
pub fn is_valid_email(address: &str) -> bool {
    EMAIL_SHAPE_RE.is_match(address)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailCandidate {
    pub address: String,
    pub strategy: EmailStrategy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailResolution {
    pub email: String, // Empty when nothing usable was found
    pub strategy: Option<EmailStrategy>,
    pub candidates: Vec<EmailCandidate>,
}

/// Finds the candidate's contact address among independent signals on the page
#[derive(Debug, Clone)]
pub struct EmailResolver {
    denylist: EmailDenylist,
    max_len: usize,
}

impl EmailResolver {
    pub fn new(denylist: EmailDenylist, max_len: usize) -> Self {
        Self { denylist, max_len }
    }

    pub fn resolve(&self, document: &ProfileDocument, display_name: &str) -> String {
        self.resolve_detailed(document, display_name).email
    }

    pub fn resolve_detailed(
        &self,
        document: &ProfileDocument,
        display_name: &str,
    ) -> EmailResolution {
        let candidates = self.candidates(document);
        let addresses: Vec<String> = candidates.iter().map(|c| c.address.clone()).collect();

        let Some(email) = select_candidate(&addresses, display_name) else {
            return EmailResolution {
                candidates,
                ..Default::default()
            };
        };

        let strategy = candidates
            .iter()
            .find(|c| c.address == email)
            .map(|c| c.strategy);

        tracing::debug!(
            candidates = candidates.len(),
            strategy = ?strategy,
            "Resolved contact email"
        );

        EmailResolution {
            email,
            strategy,
            candidates,
        }
    }

    /// All candidates in strategy order, de-duplicated, first sighting wins
    pub fn candidates(&self, document: &ProfileDocument) -> Vec<EmailCandidate> {
        let mut found: Vec<EmailCandidate> = Vec::new();

        let strategies: [(EmailStrategy, Vec<String>); 4] = [
            (EmailStrategy::MailtoLink, self.from_links(document)),
            (
                EmailStrategy::TextScan,
                self.scan(&document.full_text()),
            ),
            (
                EmailStrategy::ContactSection,
                document
                    .contact_regions()
                    .iter()
                    .flat_map(|region| self.scan(region))
                    .collect(),
            ),
            (EmailStrategy::DataAttribute, self.from_attributes(document)),
        ];

        for (strategy, addresses) in strategies {
            for address in addresses {
                if !found.iter().any(|c| c.address == address) {
                    found.push(EmailCandidate { address, strategy });
                }
            }
        }

        found
    }

    fn from_links(&self, document: &ProfileDocument) -> Vec<String> {
        document
            .mailto_links()
            .into_iter()
            .filter_map(|a| self.accept(&a))
            .collect()
    }

    fn from_attributes(&self, document: &ProfileDocument) -> Vec<String> {
        document
            .email_attributes()
            .into_iter()
            .filter_map(|a| self.accept(&a))
            .collect()
    }

    fn scan(&self, text: &str) -> Vec<String> {
        EMAIL_TOKEN_RE
            .find_iter(text)
            .filter_map(|m| self.accept(m.as_str()))
            .filter(|address| !self.denylist.is_blocked(address))
            .collect()
    }

    fn accept(&self, raw: &str) -> Option<String> {
        let address = raw.trim().trim_end_matches('.').to_lowercase();
        if address.len() > self.max_len || !is_valid_email(&address) {
            return None;
        }
        Some(address)
    }
}

impl Default for EmailResolver {
    fn default() -> Self {
        Self::new(EmailDenylist::default(), DEFAULT_MAX_EMAIL_LEN)
    }
}

/// First candidate whose local part contains a name token, else the first candidate
pub fn select_candidate(candidates: &[String], display_name: &str) -> Option<String> {
    let tokens = name_tokens(display_name);

    candidates
        .iter()
        .find(|address| {
            let local = address
                .split('@')
                .next()
                .unwrap_or_default()
                .to_lowercase();
            tokens.iter().any(|t| local.contains(t.as_str()))
        })
        .or_else(|| candidates.first())
        .cloned()
}

/// Lower-cased name parts longer than two characters
pub fn name_tokens(display_name: &str) -> Vec<String> {
    NAME_SPLIT_RE
        .split(display_name)
        .filter(|part| part.chars().count() > 2)
        .map(|part| part.to_lowercase())
        .collect()
}
