use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-brochure")]
#[command(about = "Classify a page's business-relevant links and build a translated brochure")]
#[command(version)]
pub struct Args {
    /// Page URL(s) to analyze
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Completion model (overrides the config file)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Language the page is written in
    #[arg(long = "from")]
    pub source_language: Option<String>,

    /// Produce a brochure translated into this language
    #[arg(long = "to")]
    pub target_language: Option<String>,

    /// Do not classify links
    #[arg(long)]
    pub skip_links: bool,

    /// Include the page title and text in the output
    #[arg(long)]
    pub show_contents: bool,

    /// Number of URLs processed concurrently
    #[arg(short, long, default_value_t = 4)]
    pub concurrency: usize,

    /// Also write the JSON result to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
