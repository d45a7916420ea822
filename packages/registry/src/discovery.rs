//! API description link discovery.
//!
//! A document advertises its APIs through alternate links:
//!
//! ```html
//! <link rel="alternate" type="application/raml" title="weather" href="/apis/weather.raml">
//! ```
//!
//! Every matching link with a usable title and href becomes one
//! [`SourceDescriptor`]; relative hrefs are resolved against the document
//! base URL, so the descriptor always carries an absolute locator.

use scraper::{Html, Selector};
use url::Url;

use raml_atlas::SourceDescriptor;

const LINK_SELECTOR: &str =
    r#"link[rel="alternate"][type="application/raml"][title][href]"#;

/// Scan a document for API description links.
///
/// Links with an empty title or an href that cannot be resolved against
/// `base` are skipped with a warning; discovery itself never fails.
pub fn discover_links(html: &str, base: &Url) -> Vec<SourceDescriptor> {
    let Ok(selector) = Selector::parse(LINK_SELECTOR) else {
        tracing::error!("link selector failed to parse");
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut sources = Vec::new();

    for element in document.select(&selector) {
        let title = element.value().attr("title").unwrap_or_default();
        let href = element.value().attr("href").unwrap_or_default();
        if title.is_empty() || href.is_empty() {
            tracing::warn!("skipping description link with empty title or href");
            continue;
        }

        match base.join(href) {
            Ok(locator) => sources.push(SourceDescriptor {
                name: title.to_string(),
                locator,
            }),
            Err(e) => {
                tracing::warn!("skipping description link {href:?}: {e}");
            }
        }
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://site.example/pages/index.html").unwrap()
    }

    #[test]
    fn finds_matching_links_and_absolutizes_hrefs() {
        let html = r#"
            <html><head>
              <link rel="alternate" type="application/raml" title="weather" href="/apis/weather.raml">
              <link rel="alternate" type="application/raml" title="mail" href="mail.raml">
            </head><body></body></html>
        "#;
        let sources = discover_links(html, &base());
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].name, "weather");
        assert_eq!(
            sources[0].locator.as_str(),
            "https://site.example/apis/weather.raml"
        );
        assert_eq!(
            sources[1].locator.as_str(),
            "https://site.example/pages/mail.raml"
        );
    }

    #[test]
    fn absolute_hrefs_pass_through() {
        let html = r#"<link rel="alternate" type="application/raml" title="w"
                       href="https://other.example/w.raml">"#;
        let sources = discover_links(html, &base());
        assert_eq!(sources[0].locator.as_str(), "https://other.example/w.raml");
    }

    #[test]
    fn non_matching_links_are_ignored() {
        let html = r#"
            <link rel="stylesheet" href="style.css">
            <link rel="alternate" type="application/rss+xml" title="feed" href="feed.xml">
            <link rel="alternate" type="application/raml" href="untitled.raml">
            <link rel="alternate" type="application/raml" title="orphan">
        "#;
        assert!(discover_links(html, &base()).is_empty());
    }

    #[test]
    fn empty_title_is_skipped() {
        let html =
            r#"<link rel="alternate" type="application/raml" title="" href="a.raml">"#;
        assert!(discover_links(html, &base()).is_empty());
    }

    #[test]
    fn empty_document_discovers_nothing() {
        assert!(discover_links("", &base()).is_empty());
    }
}
