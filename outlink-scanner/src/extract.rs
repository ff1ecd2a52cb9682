use crate::error::{CrawlError, Result};
use scraper::{Html, Selector};

/// Collect every `href` found inside the document body, in document order.
///
/// Links in `<head>` are ignored. Duplicates are kept; the classifier
/// collapses them. Blank input or a document without a `<body>` (a frameset
/// page, for instance) yields [`CrawlError::EmptyBody`].
pub fn extract_links(content: &[u8]) -> Result<Vec<String>> {
    let html = String::from_utf8_lossy(content);
    if html.trim().is_empty() {
        return Err(CrawlError::EmptyBody);
    }

    let document = Html::parse_document(&html);
    let body_selector = selector("body")?;
    let href_selector = selector("[href]")?;

    let body = document
        .select(&body_selector)
        .next()
        .ok_or(CrawlError::EmptyBody)?;

    Ok(body
        .select(&href_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .collect())
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| CrawlError::ParseError(format!("{}: {}", css, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_in_document_order_with_duplicates() {
        let html = br#"<html><body>
            <a href="http://a.com/x">a</a>
            <p><a href="http://b.com/y">b</a></p>
            <a href="http://a.com/x">a again</a>
        </body></html>"#;

        let links = extract_links(html).unwrap();
        assert_eq!(
            links,
            vec!["http://a.com/x", "http://b.com/y", "http://a.com/x"]
        );
    }

    #[test]
    fn test_head_links_are_ignored() {
        let html = br#"<html>
            <head>
                <link rel="stylesheet" href="http://cdn.example.net/site.css">
                <link rel="canonical" href="http://example.com/">
            </head>
            <body><a href="http://a.com/">a</a></body>
        </html>"#;

        let links = extract_links(html).unwrap();
        assert_eq!(links, vec!["http://a.com/"]);
    }

    #[test]
    fn test_any_element_with_href_counts() {
        let html = br#"<body>
            <map><area href="http://maps.example.org/"></map>
            <a href="  http://padded.io/  ">padded</a>
            <a name="anchor-without-href">nothing</a>
        </body>"#;

        let links = extract_links(html).unwrap();
        assert_eq!(links, vec!["http://maps.example.org/", "http://padded.io/"]);
    }

    #[test]
    fn test_relative_links_are_returned_raw() {
        let html = br##"<body><a href="/about">about</a><a href="#top">top</a></body>"##;
        let links = extract_links(html).unwrap();
        assert_eq!(links, vec!["/about", "#top"]);
    }

    #[test]
    fn test_empty_content_is_empty_body() {
        assert!(matches!(extract_links(b""), Err(CrawlError::EmptyBody)));
        assert!(matches!(extract_links(b"  \n\t "), Err(CrawlError::EmptyBody)));
    }

    #[test]
    fn test_page_without_links() {
        let links = extract_links(b"<html><body><p>nothing here</p></body></html>").unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let mut html = b"<body><a href=\"http://a.com/\">".to_vec();
        html.extend_from_slice(&[0xff, 0xfe]);
        html.extend_from_slice(b"</a></body>");

        let links = extract_links(&html).unwrap();
        assert_eq!(links, vec!["http://a.com/"]);
    }
}
