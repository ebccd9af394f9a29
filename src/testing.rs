//! Fake capabilities shared by unit tests.

use crate::fetch::{FetchError, Fetcher, RawPage};
use crate::llm::{CompletionClient, CompletionError, CompletionRequest};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Completion client that replays canned answers and records requests
#[derive(Default)]
pub struct FakeCompletion {
    answers: Mutex<VecDeque<Result<String, CompletionError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeCompletion {
    pub fn with_answers(answers: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(text: &str) -> Self {
        Self::with_answers(vec![Ok(text.to_string())])
    }

    pub fn failing(err: CompletionError) -> Self {
        Self::with_answers(vec![Err(err)])
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for FakeCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::Network("no canned answer left".to_string())))
    }
}

/// Fetcher serving pages from memory
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, Result<RawPage, FetchError>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages
            .insert(url.to_string(), Ok(RawPage::new(url, 200, html.as_bytes())));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(
            url.to_string(),
            Err(FetchError::HttpStatus {
                url: url.to_string(),
                status,
            }),
        );
        self
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
        self.pages.get(url).cloned().unwrap_or_else(|| {
            Err(FetchError::Network {
                url: url.to_string(),
                message: "dns error: no such host".to_string(),
            })
        })
    }
}
