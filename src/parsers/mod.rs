pub mod html;
pub mod text;


use crate::fetch::RawPage;
use crate::filter::LinkFilter;
use crate::results::{LoadedPage, Page, PageFailure};
use serde::{Deserialize, Serialize};

/// Tags whose subtrees never contribute page text
pub const DEFAULT_DENYLIST: [&str; 8] = [
    "script", "style", "img", "input", "header", "footer", "nav", "aside",
];

/// Configuration options for page extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Tag names (or any CSS selectors) removed from the body before reading text
    #[serde(default = "default_denylist")]
    pub denylist: Vec<String>,

    /// Regex patterns for links to drop after the scheme check
    #[serde(default)]
    pub exclude_link_patterns: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            denylist: default_denylist(),
            exclude_link_patterns: Vec::new(),
        }
    }
}

fn default_denylist() -> Vec<String> {
    DEFAULT_DENYLIST.iter().map(|tag| tag.to_string()).collect()
}

/// Result of parsing an HTML document
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Document title
    pub title: String,
    /// Extracted text content
    pub content: String,
    /// Extracted links
    pub links: Vec<String>,
}

impl ParseResult {
    /// Creates a new parse result
    pub fn new(title: String, content: String, links: Vec<String>) -> Self {
        Self {
            title,
            content,
            links,
        }
    }
}

/// Turns fetched bytes into a [`Page`]
#[derive(Debug)]
pub struct PageExtractor {
    options: ExtractOptions,
    link_filter: LinkFilter,
}

impl PageExtractor {
    /// Create an extractor; fails only on invalid link exclude patterns
    pub fn new(options: ExtractOptions) -> Result<Self, regex::Error> {
        let link_filter = LinkFilter::new(&options.exclude_link_patterns)?;
        Ok(Self {
            options,
            link_filter,
        })
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract title, text and links from a fetched page.
    ///
    /// Any failure yields [`Page::Failed`]; a partially populated page is
    /// never returned.
    pub fn extract(&self, url: &str, raw: RawPage) -> Page {
        let source = text::decode_body(&raw.body, raw.charset.as_deref());

        match html::parse(&source, &self.options.denylist, &self.link_filter) {
            Ok(parsed) => {
                ::log::debug!(
                    "Extracted {} chars of text and {} links from {}",
                    parsed.content.len(),
                    parsed.links.len(),
                    url
                );
                Page::Loaded(LoadedPage {
                    url: url.to_string(),
                    title: parsed.title,
                    raw_body: raw.body,
                    text: parsed.content,
                    links: parsed.links,
                })
            }
            Err(message) => {
                ::log::error!("Error processing URL {}: {}", url, message);
                Page::failed(url, PageFailure::Parse(message))
            }
        }
    }
}
