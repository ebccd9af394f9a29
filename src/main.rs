use clap::Parser;
use page_brochure::{BrochureConfig, Pipeline, RunOptions, utils};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging; everything goes to stderr so stdout stays JSON
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Pick up OPENAI_API_KEY from a local .env file if present
    dotenv::dotenv().ok();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match BrochureConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => BrochureConfig::default(),
    };
    config.apply_env_overrides();
    apply_args(&mut config, &args);

    // The credential is checked before any network activity
    let api_key = match config.api_key() {
        Ok(key) => key,
        Err(e) => {
            ::log::error!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let pipeline = match Pipeline::from_config(&config, &api_key) {
        Ok(pipeline) => {
            // Languages come from the config; the switches from the command line
            let options = RunOptions {
                classify_links: !args.skip_links,
                include_contents: args.show_contents,
                ..pipeline.options().clone()
            };
            pipeline.with_options(options)
        }
        Err(e) => {
            ::log::error!("Failed to start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    ::log::info!("Fetching and analyzing {} URL(s)", args.urls.len());

    let results = pipeline.run_many(&args.urls, args.concurrency).await;

    let mut failed = false;
    let mut reports = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                ::log::error!("{}", e);
                failed = true;
            }
        }
    }

    if !reports.is_empty() {
        let output = if args.urls.len() == 1 {
            serde_json::to_value(&reports[0])
        } else {
            serde_json::to_value(&reports)
        };

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                ::log::error!("Failed to serialize result: {}", e);
                return ExitCode::FAILURE;
            }
        };

        match utils::to_pretty_json(&output) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                ::log::error!("Failed to serialize result: {}", e);
                return ExitCode::FAILURE;
            }
        }

        if let Some(path) = &args.output {
            if let Err(e) = utils::save_json(&output, path) {
                ::log::error!("Failed to write {}: {}", path.display(), e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Command-line flags win over the config file
fn apply_args(config: &mut BrochureConfig, args: &Args) {
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(source) = &args.source_language {
        config.source_language = source.clone();
    }
    if let Some(target) = &args.target_language {
        config.target_language = Some(target.clone());
    }
}
