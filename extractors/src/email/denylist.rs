/// Domains of the profile host itself; addresses there are never the candidate's
pub const HOST_DOMAINS: &[&str] = &["linkedin.com", "licdn.com"];

/// Code-hosting services whose addresses are commit or bot identities
pub const CODE_HOSTING_DOMAINS: &[&str] = &[
    "github.com",
    "gitlab.com",
    "bitbucket.org",
    "sourceforge.net",
    "users.noreply.github.com",
];

pub const BLOCKED_PREFIXES: &[&str] = &[
    "support@",
    "noreply@",
    "no-reply@",
    "donotreply@",
    "do-not-reply@",
];

// Retina image names such as logo@2x.png look like addresses
const ASSET_FRAGMENTS: &[&str] = &["@2x.", "@3x."];

/// Addresses the text scans must never offer as the candidate's email
#[derive(Debug, Clone)]
pub struct EmailDenylist {
    domains: Vec<String>,
    prefixes: Vec<String>,
}

impl EmailDenylist {
    pub fn new(host_domains: &[String], extra_prefixes: &[String]) -> Self {
        let domains = host_domains
            .iter()
            .map(String::as_str)
            .chain(CODE_HOSTING_DOMAINS.iter().copied())
            .map(|d| d.trim().trim_start_matches('@').to_lowercase())
            .filter(|d| !d.is_empty())
            .collect();

        let prefixes = BLOCKED_PREFIXES
            .iter()
            .copied()
            .chain(extra_prefixes.iter().map(String::as_str))
            .map(|p| {
                let p = p.trim().to_lowercase();
                if p.ends_with('@') {
                    p
                } else {
                    format!("{}@", p)
                }
            })
            .filter(|p| p != "@")
            .collect();

        Self { domains, prefixes }
    }

    pub fn is_blocked(&self, address: &str) -> bool {
        let address = address.to_lowercase();

        if ASSET_FRAGMENTS.iter().any(|f| address.contains(f)) {
            return true;
        }

        if self.prefixes.iter().any(|p| address.starts_with(p.as_str())) {
            return true;
        }

        let Some((_, domain)) = address.rsplit_once('@') else {
            return true;
        };

        self.domains
            .iter()
            .any(|d| domain == d || domain.ends_with(&format!(".{}", d)))
    }
}

impl Default for EmailDenylist {
    fn default() -> Self {
        let hosts: Vec<String> = HOST_DOMAINS.iter().map(|d| d.to_string()).collect();
        Self::new(&hosts, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_host_and_generic_addresses() {
        let denylist = EmailDenylist::default();

        assert!(denylist.is_blocked("jobs-noreply@linkedin.com"));
        assert!(denylist.is_blocked("someone@mail.linkedin.com"));
        assert!(denylist.is_blocked("support@acme.com"));
        assert!(denylist.is_blocked("NoReply@acme.com"));
        assert!(denylist.is_blocked("logo@2x.png"));
        assert!(denylist.is_blocked("1234+alice@users.noreply.github.com"));
        assert!(!denylist.is_blocked("alice@acme.com"));
        assert!(!denylist.is_blocked("alice@notlinkedin.com"));
    }

    #[test]
    fn test_extra_prefixes() {
        let denylist = EmailDenylist::new(&[], &["careers".to_string()]);
        assert!(denylist.is_blocked("careers@acme.com"));
        assert!(!denylist.is_blocked("alice@linkedin.com"));
    }
}
