use crate::fetch::FetchError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title used when the document has no `<title>` text
pub const NO_TITLE: &str = "No title found";

/// Text used when the markup declares no `<body>` element
pub const NO_BODY: &str = "No body tag found";

/// Why a page could not be loaded
#[derive(Debug, Clone, Error)]
pub enum PageFailure {
    #[error("Error fetching URL: {0}")]
    Fetch(#[from] FetchError),

    #[error("Error processing URL: {0}")]
    Parse(String),
}

/// Outcome of fetching and extracting a single URL.
///
/// A failed page carries nothing but its URL and the reason, so callers
/// cannot mistake it for content.
#[derive(Debug, Clone)]
pub enum Page {
    Loaded(LoadedPage),
    Failed { url: String, reason: PageFailure },
}

impl Page {
    /// Create a failed page
    pub fn failed(url: impl Into<String>, reason: impl Into<PageFailure>) -> Self {
        Page::Failed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// URL the page was requested from
    pub fn url(&self) -> &str {
        match self {
            Page::Loaded(page) => &page.url,
            Page::Failed { url, .. } => url,
        }
    }

    /// Returns the loaded content, if any
    pub fn loaded(&self) -> Option<&LoadedPage> {
        match self {
            Page::Loaded(page) => Some(page),
            Page::Failed { .. } => None,
        }
    }
}

/// Normalized content of a successfully extracted page
#[derive(Debug, Clone, Serialize)]
pub struct LoadedPage {
    /// URL of the page
    pub url: String,

    /// Document title, or [`NO_TITLE`]
    pub title: String,

    /// Raw response body
    #[serde(skip)]
    pub raw_body: Vec<u8>,

    /// Body text, one trimmed text node per line, or [`NO_BODY`]
    pub text: String,

    /// Absolute http/https links in document order
    pub links: Vec<String>,
}

impl LoadedPage {
    /// Title and text of the page as a presentable view
    pub fn contents(&self) -> PageContents {
        PageContents {
            title: self.title.clone(),
            contents: self.text.clone(),
        }
    }
}

/// Title and text view of a page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageContents {
    #[serde(rename = "Webpage Title")]
    pub title: String,

    #[serde(rename = "Webpage Contents")]
    pub contents: String,
}

impl PageContents {
    /// Render the view as plain text for a completion prompt
    pub fn to_prompt_text(&self) -> String {
        format!(
            "Webpage Title: {}\nWebpage Contents:\n{}",
            self.title, self.contents
        )
    }
}

/// One link the model considered relevant for a brochure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevantLink {
    /// Kind of page, e.g. "about page"
    #[serde(rename = "type")]
    pub kind: String,

    pub url: String,
}

/// Result of link relevance classification.
///
/// Serializes either as `{"links": [...]}` or as an error object
/// `{"error": ..., "details": ..., "raw_content": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LinkClassification {
    Links {
        links: Vec<RelevantLink>,
        #[serde(skip_serializing_if = "Option::is_none")]
        warning: Option<String>,
    },
    Error {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        raw_content: Option<String>,
    },
}

impl LinkClassification {
    /// Classification with no relevant links
    pub fn empty() -> Self {
        Self::Links {
            links: Vec::new(),
            warning: None,
        }
    }

    /// Classification that failed
    pub fn error(error: impl Into<String>, details: Option<String>) -> Self {
        Self::Error {
            error: error.into(),
            details,
            raw_content: None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Relevant links, empty for an error
    pub fn links(&self) -> &[RelevantLink] {
        match self {
            Self::Links { links, .. } => links,
            Self::Error { .. } => &[],
        }
    }
}

/// Brochure step result as it appears in the report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BrochureOutcome {
    Translated {
        source_language: String,
        target_language: String,
        text: String,
    },
    Failed {
        error: String,
        details: String,
    },
}

/// Final structured result for one URL
#[derive(Debug, Clone, Serialize)]
pub struct BrochureReport {
    pub url: String,
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<PageContents>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevant_links: Option<LinkClassification>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub brochure: Option<BrochureOutcome>,
}
