use crate::classify::LinkClassifier;
use crate::config::{BrochureConfig, ConfigError};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::llm::{CompletionClient, OpenAiClient};
use crate::parsers::PageExtractor;
use crate::results::{BrochureOutcome, BrochureReport, Page, PageFailure};
use crate::translate::BrochureTranslator;
use futures::stream::{self, StreamExt};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Stages of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Start,
    Fetching,
    Extracted,
    ClassifyingLinks,
    Translating,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Start => "start",
            RunState::Fetching => "fetching",
            RunState::Extracted => "extracted",
            RunState::ClassifyingLinks => "classifying-links",
            RunState::Translating => "translating",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The page could not be fetched or parsed
    #[error("Could not process website {url}: {reason}")]
    PageUnavailable { url: String, reason: PageFailure },
}

/// Per-run switches
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Ask the model which links are relevant
    pub classify_links: bool,
    /// Include the title/contents view in the report
    pub include_contents: bool,
    pub source_language: String,
    /// Produce a brochure in this language
    pub target_language: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            classify_links: true,
            include_contents: false,
            source_language: "English".to_string(),
            target_language: None,
        }
    }
}

/// Runs fetch, extraction, link classification and translation for a URL
pub struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    extractor: PageExtractor,
    classifier: LinkClassifier,
    translator: BrochureTranslator,
    options: RunOptions,
}

impl Pipeline {
    /// Assemble a pipeline from explicit capabilities
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        completion: Arc<dyn CompletionClient>,
        extractor: PageExtractor,
        model: &str,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            classifier: LinkClassifier::new(completion.clone(), model),
            translator: BrochureTranslator::new(completion, model),
            options: RunOptions::default(),
        }
    }

    /// Build the HTTP fetcher and OpenAI client described by a config
    pub fn from_config(config: &BrochureConfig, api_key: &str) -> Result<Self, ConfigError> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        let completion = OpenAiClient::new(config.api_base.as_str(), api_key)?;
        let extractor = PageExtractor::new(config.extract.clone())?;

        Ok(Self::new(
            Arc::new(fetcher),
            Arc::new(completion),
            extractor,
            &config.model,
        )
        .with_options(RunOptions {
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
            ..RunOptions::default()
        }))
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Fetch and extract a page without any model calls
    pub async fn load_page(&self, url: &str) -> Page {
        transition(url, RunState::Start, RunState::Fetching);
        match self.fetcher.fetch(url).await {
            Ok(raw) => self.extractor.extract(url, raw),
            Err(e) => {
                ::log::error!("Error fetching URL {}: {}", url, e);
                Page::failed(url, e)
            }
        }
    }

    /// Produce the report for one URL
    pub async fn run(&self, url: &str) -> Result<BrochureReport, PipelineError> {
        let page = self.load_page(url).await;

        let loaded = match &page {
            Page::Loaded(loaded) => loaded,
            Page::Failed { reason, .. } => {
                transition(url, RunState::Fetching, RunState::Failed);
                return Err(PipelineError::PageUnavailable {
                    url: url.to_string(),
                    reason: reason.clone(),
                });
            }
        };
        transition(url, RunState::Fetching, RunState::Extracted);

        let mut report = BrochureReport {
            url: loaded.url.clone(),
            title: loaded.title.clone(),
            contents: self.options.include_contents.then(|| loaded.contents()),
            relevant_links: None,
            brochure: None,
        };

        let mut state = RunState::Extracted;

        if self.options.classify_links {
            transition(url, state, RunState::ClassifyingLinks);
            state = RunState::ClassifyingLinks;
            report.relevant_links = Some(self.classifier.classify(&page).await);
        }

        if let Some(target) = &self.options.target_language {
            transition(url, state, RunState::Translating);
            state = RunState::Translating;

            let source_text = loaded.contents().to_prompt_text();
            let source = &self.options.source_language;
            report.brochure = Some(
                match self.translator.translate(&source_text, source, target).await {
                    Ok(text) => BrochureOutcome::Translated {
                        source_language: source.clone(),
                        target_language: target.clone(),
                        text,
                    },
                    Err(e) => BrochureOutcome::Failed {
                        error: "Translation failed".to_string(),
                        details: e.to_string(),
                    },
                },
            );
        }

        transition(url, state, RunState::Done);
        Ok(report)
    }

    /// Run several independent URLs, at most `concurrency` at a time.
    ///
    /// Results come back in input order.
    pub async fn run_many(
        &self,
        urls: &[String],
        concurrency: usize,
    ) -> Vec<Result<BrochureReport, PipelineError>> {
        stream::iter(urls)
            .map(|url| self.run(url))
            .buffered(concurrency.max(1))
            .collect()
            .await
    }
}

fn transition(url: &str, from: RunState, to: RunState) {
    ::log::debug!("{}: {} -> {}", url, from, to);
}
