//! Link relevance classification.
//!
//! The page's links go to the completion capability with a fixed schema
//! instruction; the answer must be a JSON object `{"links": [{type, url}]}`.
//! Every outcome, failures included, comes back as a [`LinkClassification`].

use crate::llm::{ChatMessage, CompletionClient, CompletionRequest};
use crate::results::{LinkClassification, Page, RelevantLink};
use serde::Deserialize;
use std::sync::Arc;

pub const LINK_SYSTEM_PROMPT: &str = r#"You are provided with a list of links found on a webpage.
You are able to decide which of the links would be most relevant to include in a brochure about the company, such as links to an About page, or a Company Page, or Careers/Jobs pages.
You should respond in JSON as in this example:
{
    "links": [
        {"type": "about page", "url": "https://example.com/about"},
        {"type": "careers page", "url": "https://example.com/careers"}
    ]
}"#;

pub const EMPTY_RESPONSE_WARNING: &str = "Empty response from AI";

#[derive(Debug, Deserialize)]
struct LinkList {
    links: Vec<RelevantLink>,
}

/// Asks a language model which links matter for a company brochure
pub struct LinkClassifier {
    client: Arc<dyn CompletionClient>,
    model: String,
}

impl LinkClassifier {
    pub fn new(client: Arc<dyn CompletionClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Classify the links of a page.
    ///
    /// Failed pages and pages without links never reach the model.
    pub async fn classify(&self, page: &Page) -> LinkClassification {
        let loaded = match page {
            Page::Loaded(loaded) => loaded,
            Page::Failed { reason, .. } => {
                return LinkClassification::error(
                    format!("Cannot get links due to initialization failure: {}", reason),
                    None,
                );
            }
        };

        if loaded.links.is_empty() {
            ::log::warn!("No links found on {} to analyze", loaded.url);
            return LinkClassification::empty();
        }

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(LINK_SYSTEM_PROMPT),
                ChatMessage::user(links_user_prompt(&loaded.url, &loaded.links)),
            ],
            json_mode: true,
        };

        ::log::info!(
            "Classifying {} links from {}",
            loaded.links.len(),
            loaded.url
        );

        match self.client.complete(request).await {
            Ok(text) => parse_classification(&text),
            Err(e) => {
                ::log::error!("Completion API error: {}", e);
                LinkClassification::error("Completion API error", Some(e.to_string()))
            }
        }
    }
}

/// Builds the user message listing every link verbatim, one per line
pub fn links_user_prompt(url: &str, links: &[String]) -> String {
    format!(
        "Here is the list of links from the website {} - \
         please decide which of these are relevant web links for a brochure about the company. \
         Please do not include terms of service, privacy policy, or any other irrelevant links.\n\n\
         Links (some might be irrelevant):\n{}",
        url,
        links.join("\n")
    )
}

/// Interprets the model's answer
pub fn parse_classification(text: &str) -> LinkClassification {
    if text.trim().is_empty() {
        ::log::warn!("Received empty content from the completion API");
        return LinkClassification::Links {
            links: Vec::new(),
            warning: Some(EMPTY_RESPONSE_WARNING.to_string()),
        };
    }

    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            ::log::error!("Error decoding JSON response: {}", e);
            ::log::error!("Raw response content: {}", text);
            return LinkClassification::Error {
                error: "Invalid JSON response from AI".to_string(),
                details: Some(e.to_string()),
                raw_content: Some(text.to_string()),
            };
        }
    };

    match serde_json::from_value::<LinkList>(value) {
        Ok(list) => LinkClassification::Links {
            links: list.links,
            warning: None,
        },
        Err(e) => {
            ::log::error!("Response does not match the links schema: {}", e);
            LinkClassification::Error {
                error: "Unexpected response shape from AI".to_string(),
                details: Some(e.to_string()),
                raw_content: Some(text.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use crate::llm::{CompletionError, Role};
    use crate::results::LoadedPage;
    use crate::testing::FakeCompletion;
    use serde_json::json;

    fn page_with_links(links: &[&str]) -> Page {
        Page::Loaded(LoadedPage {
            url: "https://acme.example".to_string(),
            title: "Acme".to_string(),
            raw_body: Vec::new(),
            text: "Hello".to_string(),
            links: links.iter().map(|l| l.to_string()).collect(),
        })
    }

    fn classifier(fake: &Arc<FakeCompletion>) -> LinkClassifier {
        LinkClassifier::new(fake.clone(), "gpt-4o-mini")
    }

    #[tokio::test]
    async fn test_no_links_skips_completion() {
        let fake = Arc::new(FakeCompletion::default());
        let result = classifier(&fake).classify(&page_with_links(&[])).await;

        assert_eq!(result, LinkClassification::empty());
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"links": []}));
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_page_is_refused() {
        let fake = Arc::new(FakeCompletion::default());
        let page = Page::failed(
            "https://acme.example",
            FetchError::Timeout {
                url: "https://acme.example".to_string(),
            },
        );

        let result = classifier(&fake).classify(&page).await;
        match result {
            LinkClassification::Error { error, .. } => {
                assert!(error.starts_with("Cannot get links due to initialization failure"));
            }
            other => panic!("expected error, got {:?}", other),
        }
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn test_request_shape() {
        let fake = Arc::new(FakeCompletion::answering(
            r#"{"links": [{"type": "about page", "url": "https://acme.example/about"}]}"#,
        ));
        let page = page_with_links(&["https://acme.example/about", "https://acme.example/privacy"]);

        let result = classifier(&fake).classify(&page).await;
        assert_eq!(
            result.links(),
            &[RelevantLink {
                kind: "about page".to_string(),
                url: "https://acme.example/about".to_string(),
            }]
        );

        let requests = fake.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert!(request.json_mode);
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, LINK_SYSTEM_PROMPT);
        assert_eq!(request.messages[1].role, Role::User);
        assert!(
            request.messages[1]
                .content
                .ends_with("Links (some might be irrelevant):\nhttps://acme.example/about\nhttps://acme.example/privacy")
        );
        assert!(request.messages[1].content.contains("terms of service, privacy policy"));
    }

    #[tokio::test]
    async fn test_malformed_json_keeps_raw_text() {
        let fake = Arc::new(FakeCompletion::answering("{\"links\": [oops"));
        let result = classifier(&fake)
            .classify(&page_with_links(&["https://acme.example/about"]))
            .await;

        match result {
            LinkClassification::Error {
                error, raw_content, ..
            } => {
                assert_eq!(error, "Invalid JSON response from AI");
                assert_eq!(raw_content.as_deref(), Some("{\"links\": [oops"));
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_response_is_warning() {
        let fake = Arc::new(FakeCompletion::answering("  "));
        let result = classifier(&fake)
            .classify(&page_with_links(&["https://acme.example/about"]))
            .await;

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"links": [], "warning": "Empty response from AI"})
        );
    }

    #[tokio::test]
    async fn test_api_failure_is_error_object() {
        let fake = Arc::new(FakeCompletion::failing(CompletionError::Api {
            status: 500,
            message: "server exploded".to_string(),
        }));
        let result = classifier(&fake)
            .classify(&page_with_links(&["https://acme.example/about"]))
            .await;

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "error": "Completion API error",
                "details": "API error 500: server exploded"
            })
        );
    }

    #[test]
    fn test_wrong_shape_is_error() {
        let result = parse_classification(r#"{"pages": []}"#);
        assert!(result.is_error());

        let result = parse_classification(r#"{"links": [{"url": "https://x.example"}]}"#);
        assert!(result.is_error());
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let result = parse_classification(
            r#"{"links": [{"type": "careers page", "url": "https://x.example/jobs", "reason": "jobs"}], "note": "ok"}"#,
        );
        assert_eq!(result.links().len(), 1);
        assert_eq!(result.links()[0].kind, "careers page");
    }
}
