//! Application startup
//!
//! Parses arguments, installs logging, loads configuration and runs one scan.
//! Returns the process exit code.

use crate::app::cli::args::Args;
use crate::app::cli::inputs::{build_request, save_target};
use crate::app::output::{render, OutputFormat};
use crate::config::ScanConfig;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::scanner::{ArtifactScanner, FrontmatterMetadataExtractor, JsonTreeSource};
use clap::Parser;
use std::sync::Arc;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
/// The scan ran but reported an error status
pub const EXIT_SCAN_ERROR: i32 = 2;

pub async fn startup() -> i32 {
    let args = Args::parse();
    let use_color = args.use_color();
    let log_file = args.log_file.as_ref().map(|p| p.to_string_lossy().to_string());

    if let Err(e) = init_logging(
        args.log_level.as_deref(),
        args.log_format.as_deref(),
        log_file.as_deref(),
        use_color,
    ) {
        eprintln!("Error: {}", e);
        return EXIT_FAILURE;
    }
    log::debug!("Arguments: {:?}", args);

    run(args, use_color).await
}

pub async fn run(args: Args, use_color: bool) -> i32 {
    let mut config = match ScanConfig::load(args.config_file.clone()).await {
        Ok(config) => config,
        Err(e) => {
            log_error_with_context(&e, "Loading configuration");
            return EXIT_FAILURE;
        }
    };
    if let Err(e) = args.apply_to_config(&mut config) {
        log_error_with_context(&e, "Applying command line options");
        return EXIT_FAILURE;
    }

    let source = match JsonTreeSource::from_file(&args.tree).await {
        Ok(source) => source,
        Err(e) => {
            log_error_with_context(&e, "Loading tree listing");
            return EXIT_FAILURE;
        }
    };
    let request = match build_request(&args).await {
        Ok(request) => request,
        Err(e) => {
            log_error_with_context(&e, "Loading scan inputs");
            return EXIT_FAILURE;
        }
    };

    let mut builder = ArtifactScanner::builder(Arc::new(source)).with_config(config);
    if let Some(contents) = &request.contents {
        builder = builder
            .with_metadata_extractor(Arc::new(FrontmatterMetadataExtractor::new(contents.clone())));
    }
    let result = builder.build().scan(&request).await;

    if let (Some(path), Some(target)) = (&args.save_target, &result.clone_target) {
        if let Err(e) = save_target(path, target).await {
            log_error_with_context(&e, "Saving clone target");
            return EXIT_FAILURE;
        }
    }

    match render(&result, OutputFormat::parse(&args.format), use_color) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            log::error!("FATAL: Rendering scan result: {}", e);
            return EXIT_FAILURE;
        }
    }

    if result.is_success() {
        EXIT_SUCCESS
    } else {
        EXIT_SCAN_ERROR
    }
}
