use roxmltree::{Document, Node, ParsingOptions};

use super::types::FeedEntry;
use crate::core::text::{excerpt, format_date};

const UNTITLED_POST: &str = "Untitled post";

#[derive(Debug, thiserror::Error)]
pub enum FeedParseError {
    #[error("feed payload is empty")]
    EmptyPayload,
    #[error("xml feed parse error: {0}")]
    Xml(#[from] roxmltree::Error),
}

/// Extracts the first entry of an RSS or Atom document.
///
/// RSS `item` elements win over Atom `entry` elements; the first one in
/// document order is taken as the most recent post. `Ok(None)` means the
/// document parsed but carries no entry.
pub fn parse_latest_entry(xml: &str) -> Result<Option<FeedEntry>, FeedParseError> {
    let trimmed = xml.trim_start();
    if trimmed.is_empty() {
        return Err(FeedParseError::EmptyPayload);
    }

    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    let document = Document::parse_with_options(trimmed, options)?;

    let Some(item) = first_element(document.root(), "item")
        .or_else(|| first_element(document.root(), "entry"))
    else {
        return Ok(None);
    };

    Ok(Some(entry_from_node(item)))
}

fn entry_from_node(item: Node<'_, '_>) -> FeedEntry {
    let title = first_element(item, "title")
        .map(|node| text_content(node).trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| UNTITLED_POST.to_string());

    let date = first_non_empty(item, &["pubDate", "updated", "published"]).unwrap_or_default();
    let summary = first_non_empty(item, &["description", "summary"]).unwrap_or_default();

    FeedEntry {
        title,
        link: resolve_link(item),
        date: format_date(&date),
        excerpt: excerpt(&summary),
    }
}

/// RSS link text, overridden by an Atom `href` when one is present.
fn resolve_link(item: Node<'_, '_>) -> String {
    let mut link = first_element(item, "link")
        .map(|node| text_content(node).trim().to_string())
        .unwrap_or_default();

    let atom_link = elements(item, "link")
        .find(|node| node.attribute("rel") == Some("alternate"))
        .or_else(|| elements(item, "link").find(|node| node.has_attribute("href")));
    if let Some(href) = atom_link
        .and_then(|node| node.attribute("href"))
        .filter(|href| !href.is_empty())
    {
        link = href.to_string();
    }

    link
}

fn first_non_empty(item: Node<'_, '_>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| first_element(item, name))
        .map(text_content)
        .find(|value| !value.is_empty())
}

fn elements<'a, 'input: 'a>(
    scope: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    scope
        .descendants()
        .skip(1)
        .filter(move |node| node.is_element() && node.tag_name().name() == name)
}

fn first_element<'a, 'input: 'a>(scope: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    scope
        .descendants()
        .skip(1)
        .find(|node| node.is_element() && node.tag_name().name() == name)
}

fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rss_item() {
        let xml = r#"<rss><channel><item><title>Hi</title><link>https://blog.example/p1</link><pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate><description>&lt;p&gt;Hello world&lt;/p&gt;</description></item></channel></rss>"#;
        let entry = parse_latest_entry(xml)
            .expect("rss must parse")
            .expect("entry must exist");

        assert_eq!(
            entry,
            FeedEntry {
                title: "Hi".to_string(),
                link: "https://blog.example/p1".to_string(),
                date: "Jan 01, 2024".to_string(),
                excerpt: "Hello world".to_string(),
            }
        );
    }

    #[test]
    fn takes_first_item_of_fixture_feed() {
        let xml = include_str!("../../../fixtures/feeds/sample.rss.xml");
        let entry = parse_latest_entry(xml)
            .expect("rss fixture must parse")
            .expect("entry must exist");

        assert_eq!(entry.title, "Shipping a static site with zero JavaScript frameworks");
        assert_eq!(entry.link, "https://blog.example/posts/static-site");
        assert_eq!(entry.date, "Feb 24, 2026");
        assert!(entry.excerpt.starts_with("Notes on building"));
        assert!(!entry.excerpt.contains('<'));
    }

    #[test]
    fn parses_atom_fixture_feed() {
        let xml = include_str!("../../../fixtures/feeds/sample.atom.xml");
        let entry = parse_latest_entry(xml)
            .expect("atom fixture must parse")
            .expect("entry must exist");

        assert_eq!(entry.title, "Writing a tiny feed reader");
        assert_eq!(entry.link, "https://blog.example/posts/feed-reader");
        assert_eq!(entry.date, "Mar 10, 2026");
        assert_eq!(entry.excerpt, "Parsing Atom by hand, for fun.");
    }

    #[test]
    fn atom_href_overrides_plain_link_text() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry>
            <title>Post</title>
            <link>https://blog.example/plain</link>
            <link href="https://blog.example/from-href"/>
        </entry></feed>"#;
        let entry = parse_latest_entry(xml)
            .expect("atom must parse")
            .expect("entry must exist");

        assert_eq!(entry.link, "https://blog.example/from-href");
    }

    #[test]
    fn alternate_link_wins_over_other_hrefs() {
        let xml = r#"<feed><entry>
            <link rel="self" href="https://blog.example/self.xml"/>
            <link rel="alternate" href="https://blog.example/post"/>
        </entry></feed>"#;
        let entry = parse_latest_entry(xml)
            .expect("atom must parse")
            .expect("entry must exist");

        assert_eq!(entry.link, "https://blog.example/post");
        assert_eq!(entry.title, "Untitled post");
        assert_eq!(entry.date, "");
        assert_eq!(entry.excerpt, "");
    }

    #[test]
    fn date_and_excerpt_fall_through_empty_candidates() {
        let xml = r#"<feed><entry>
            <title>  Spaced  </title>
            <link href="https://blog.example/post"/>
            <updated></updated>
            <published>2024-05-06T07:08:09Z</published>
            <summary>&lt;em&gt;Short&lt;/em&gt; summary</summary>
        </entry></feed>"#;
        let entry = parse_latest_entry(xml)
            .expect("atom must parse")
            .expect("entry must exist");

        assert_eq!(entry.title, "Spaced");
        assert_eq!(entry.date, "May 06, 2024");
        assert_eq!(entry.excerpt, "Short summary");
    }

    #[test]
    fn documents_without_entries_yield_none() {
        let xml = "<rss><channel><title>Empty</title></channel></rss>";
        assert_eq!(parse_latest_entry(xml).expect("rss must parse"), None);
    }

    #[test]
    fn malformed_documents_are_errors() {
        assert!(matches!(parse_latest_entry("   "), Err(FeedParseError::EmptyPayload)));
        assert!(matches!(
            parse_latest_entry("<rss><channel>"),
            Err(FeedParseError::Xml(_))
        ));
    }
}
