//! Brochure translation.

use crate::llm::{ChatMessage, CompletionClient, CompletionError, CompletionRequest};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation request failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("translation came back empty")]
    EmptyResponse,
}

/// Input of a single translation call
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest<'a> {
    pub source_language: &'a str,
    pub target_language: &'a str,
    pub source_text: &'a str,
}

impl TranslationRequest<'_> {
    /// Whether both sides name the same language.
    ///
    /// Names are compared trimmed and ASCII case-insensitively, so "english"
    /// and " English" are the same language.
    pub fn is_identity(&self) -> bool {
        self.source_language
            .trim()
            .eq_ignore_ascii_case(self.target_language.trim())
    }

    fn system_prompt(&self) -> String {
        format!(
            "You are a translator from {} to {}. Translate the page content you are given \
             into {} and reply with the translation only.",
            self.source_language, self.target_language, self.target_language
        )
    }
}

pub struct BrochureTranslator {
    client: Arc<dyn CompletionClient>,
    model: String,
}

impl BrochureTranslator {
    pub fn new(client: Arc<dyn CompletionClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Translate `content`; identical languages return it untouched without
    /// calling the model.
    pub async fn translate(
        &self,
        content: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let request = TranslationRequest {
            source_language,
            target_language,
            source_text: content,
        };

        if request.is_identity() {
            ::log::debug!(
                "Source and target language are both {}, skipping translation",
                source_language
            );
            return Ok(content.to_string());
        }

        ::log::info!(
            "Translating {} chars from {} to {}",
            content.len(),
            source_language,
            target_language
        );

        let completion = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(request.system_prompt()),
                ChatMessage::user(request.source_text),
            ],
            json_mode: false,
        };

        let text = self.client.complete(completion).await.map_err(|e| {
            ::log::error!("Error during translation: {}", e);
            TranslationError::from(e)
        })?;

        if text.trim().is_empty() {
            return Err(TranslationError::EmptyResponse);
        }

        ::log::info!("Translation completed");
        Ok(text)
    }
}
