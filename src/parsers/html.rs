use crate::filter::LinkFilter;
use crate::parsers::{ParseResult, text};
use crate::results::{NO_BODY, NO_TITLE};
use regex::Regex;
use scraper::{Html, Selector};

/// Parses an HTML document into title, body text and links.
///
/// Denylisted subtrees are detached from the body first, so neither their
/// text nor their anchors reach the output. Without a body tag nothing is
/// removed and every anchor in the document is scanned.
pub fn parse(
    html: &str,
    denylist: &[String],
    filter: &LinkFilter,
) -> Result<ParseResult, String> {
    let mut doc = Html::parse_document(html);

    let title = parse_title(&doc)?;

    let content = if declares_body(html)? {
        remove_denylisted(&mut doc, denylist)?;
        body_text(&doc)?
    } else {
        NO_BODY.to_string()
    };
    let links = parse_links(&doc, filter)?;

    ::log::debug!("HTML parser found {} links", links.len());
    if !links.is_empty() {
        ::log::debug!(
            "First few links: {:?}",
            links.iter().take(5).collect::<Vec<_>>()
        );
    }

    Ok(ParseResult::new(title, content, links))
}

/// Reads the first `<title>` text.
///
/// Surrounding whitespace is trimmed and a blank title counts as missing.
pub fn parse_title(doc: &Html) -> Result<String, String> {
    let title_selector = selector("title")?;
    let title = doc
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());

    Ok(title)
}

/// Collects kept anchor hrefs in document order, duplicates included
pub fn parse_links(doc: &Html, filter: &LinkFilter) -> Result<Vec<String>, String> {
    let link_selector = selector("a[href]")?;
    Ok(doc
        .select(&link_selector)
        .filter_map(|e| e.value().attr("href"))
        .filter(|href| filter.should_keep(href))
        .map(|s| s.to_string())
        .collect())
}

/// Whether the markup itself contains a `<body>` tag.
///
/// The HTML5 parser synthesizes a body for every document, so presence is
/// decided on the source rather than on the parsed tree. Comments and the
/// contents of script and style elements are ignored.
pub fn declares_body(html: &str) -> Result<bool, String> {
    let opaque = Regex::new(
        r"(?is)<!--.*?-->|<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>",
    )
    .map_err(|e| e.to_string())?;
    let body_tag = Regex::new(r"(?i)<body[\s/>]").map_err(|e| e.to_string())?;

    Ok(body_tag.is_match(&opaque.replace_all(html, "")))
}

/// Detaches every denylisted element inside the body
pub fn remove_denylisted(doc: &mut Html, denylist: &[String]) -> Result<usize, String> {
    if denylist.is_empty() {
        return Ok(0);
    }

    let body_selector = selector("body")?;
    let denied = selector(&denylist.join(", "))?;

    let ids: Vec<_> = match doc.select(&body_selector).next() {
        Some(body) => body.select(&denied).map(|el| el.id()).collect(),
        None => Vec::new(),
    };

    for id in &ids {
        if let Some(mut node) = doc.tree.get_mut(*id) {
            node.detach();
        }
    }

    ::log::trace!("Removed {} denylisted elements", ids.len());
    Ok(ids.len())
}

/// Text of the body, one trimmed text node per line
pub fn body_text(doc: &Html) -> Result<String, String> {
    let body_selector = selector("body")?;
    Ok(match doc.select(&body_selector).next() {
        Some(body) => text::join_text_nodes(body.text()),
        None => NO_BODY.to_string(),
    })
}

fn selector(css: &str) -> Result<Selector, String> {
    Selector::parse(css).map_err(|e| format!("invalid selector {:?}: {:?}", css, e))
}
