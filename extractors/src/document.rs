use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static TAGGED_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[id], [class], [aria-label], [data-section]").unwrap());
static ANY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("*").unwrap());

static TEXT_MAILTO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)mailto:([^\s"'<>()\[\]]+)"#).unwrap());
static CONTACT_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^contact(?:\s+info(?:rmation)?)?:?$").unwrap());

const CONTACT_TAGS: &[&str] = &["id", "class", "aria-label", "data-section"];
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// One profile page snapshot, either parsed HTML or an already flattened text blob
pub enum ProfileDocument {
    Html(Html),
    Text(String),
}

impl ProfileDocument {
    pub fn from_html(html: &str) -> Self {
        ProfileDocument::Html(Html::parse_document(html))
    }

    pub fn from_text(text: &str) -> Self {
        ProfileDocument::Text(text.to_string())
    }

    /// Visible text, one text node per line
    pub fn full_text(&self) -> String {
        match self {
            ProfileDocument::Html(html) => visible_text(html.root_element()),
            ProfileDocument::Text(text) => text.clone(),
        }
    }

    /// Targets of `mailto:` links with the scheme and any query suffix stripped
    pub fn mailto_links(&self) -> Vec<String> {
        let raw: Vec<String> = match self {
            ProfileDocument::Html(html) => html
                .select(&LINK_SELECTOR)
                .filter_map(|a| a.value().attr("href"))
                .filter_map(|href| {
                    let href = href.trim();
                    href.get(..7)
                        .filter(|scheme| scheme.eq_ignore_ascii_case("mailto:"))
                        .map(|_| href[7..].to_string())
                })
                .collect(),
            ProfileDocument::Text(text) => TEXT_MAILTO_RE
                .captures_iter(text)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .collect(),
        };

        raw.into_iter()
            .map(|target| {
                let address = target.split('?').next().unwrap_or_default();
                address.replace("%40", "@").trim().to_string()
            })
            .filter(|address| !address.is_empty())
            .collect()
    }

    /// Text of regions tagged as contact information
    pub fn contact_regions(&self) -> Vec<String> {
        match self {
            ProfileDocument::Html(html) => html
                .select(&TAGGED_SELECTOR)
                .filter(|el| {
                    CONTACT_TAGS.iter().any(|attr| {
                        el.value()
                            .attr(attr)
                            .is_some_and(|v| v.to_lowercase().contains("contact"))
                    })
                })
                .map(visible_text)
                .filter(|text| !text.is_empty())
                .collect(),
            ProfileDocument::Text(text) => contact_blocks(text),
        }
    }

    /// Values of `data-*` attributes whose name mentions an email
    pub fn email_attributes(&self) -> Vec<String> {
        match self {
            ProfileDocument::Html(html) => html
                .select(&ANY_SELECTOR)
                .flat_map(|el| {
                    el.value()
                        .attrs()
                        .filter(|(name, _)| {
                            let name = name.to_lowercase();
                            name.starts_with("data-") && name.contains("email")
                        })
                        .map(|(_, value)| value.trim().to_string())
                        .collect::<Vec<_>>()
                })
                .filter(|value| !value.is_empty())
                .collect(),
            ProfileDocument::Text(_) => Vec::new(),
        }
    }
}

fn visible_text(element: ElementRef) -> String {
    let mut lines = Vec::new();

    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|e| HIDDEN_ELEMENTS.contains(&e.name()))
        });
        if hidden {
            continue;
        }

        let text = text.trim();
        if !text.is_empty() {
            lines.push(text.to_string());
        }
    }

    lines.join("\n")
}

/// Lines under a "Contact info" heading, up to the first blank line
fn contact_blocks(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if !CONTACT_HEADING_RE.is_match(lines[i].trim()) {
            i += 1;
            continue;
        }

        let mut block = Vec::new();
        i += 1;
        while i < lines.len() && !lines[i].trim().is_empty() {
            block.push(lines[i].trim());
            i += 1;
        }

        if !block.is_empty() {
            blocks.push(block.join("\n"));
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html>
<head><style>.x { color: red }</style><script>var a = "x@y.com";</script></head>
<body>
  <h1>Alice Smith</h1>
  <section class="pv-contact-info">
    <h2>Contact info</h2>
    <span>alice@example.org</span>
  </section>
  <a href="MAILTO:alice.smith@example.com?subject=Hi">Email me</a>
  <a href="https://example.com">Site</a>
  <div data-contact-email="as@example.net" data-id="42"></div>
</body>
</html>"#;

    #[test]
    fn test_full_text_skips_scripts_and_styles() {
        let doc = ProfileDocument::from_html(PAGE);
        let text = doc.full_text();

        assert!(text.contains("Alice Smith"));
        assert!(text.contains("alice@example.org"));
        assert!(!text.contains("x@y.com"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn test_mailto_links() {
        let doc = ProfileDocument::from_html(PAGE);
        assert_eq!(doc.mailto_links(), vec!["alice.smith@example.com"]);

        let text = ProfileDocument::from_text("Reach me: mailto:bob%40example.com?x=1 thanks");
        assert_eq!(text.mailto_links(), vec!["bob@example.com"]);
    }

    #[test]
    fn test_contact_regions() {
        let doc = ProfileDocument::from_html(PAGE);
        let regions = doc.contact_regions();

        assert_eq!(regions.len(), 1);
        assert!(regions[0].contains("alice@example.org"));
    }

    #[test]
    fn test_contact_block_in_flat_text() {
        let doc = ProfileDocument::from_text(
            "Alice Smith\nContact info\nalice@example.org\nexample.org\n\nAbout\nHi",
        );
        assert_eq!(doc.contact_regions(), vec!["alice@example.org\nexample.org"]);
    }

    #[test]
    fn test_email_attributes() {
        let doc = ProfileDocument::from_html(PAGE);
        assert_eq!(doc.email_attributes(), vec!["as@example.net"]);
        assert!(ProfileDocument::from_text("data-email=x@y.com")
            .email_attributes()
            .is_empty());
    }
}
