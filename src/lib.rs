//! Fetch a web page, extract its text and outbound links, ask a language
//! model which links matter for a company brochure, and optionally turn the
//! page content into a translated brochure.

pub mod classify;
pub mod config;
pub mod fetch;
pub mod filter;
pub mod llm;
pub mod parsers;
pub mod pipeline;
pub mod results;
pub mod translate;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export commonly used types for convenience
pub use config::BrochureConfig;
pub use pipeline::{Pipeline, PipelineError, RunOptions};
pub use results::{BrochureReport, LinkClassification, Page};
