//! Swagger Glue Generator - Command-line tool for generating Swagger documents and routing glue.
//!
//! This binary scans annotated handler sources, writes a Swagger 2.0 document with a Swagger UI
//! page, and renders one axum router module per handler directory.
//!
//! # Usage
//!
//! ```bash
//! swagger-glue-gen [OPTIONS]
//! ```
//!
//! # Examples
//!
//! Generate from the default `src/api` directory:
//! ```bash
//! swagger-glue-gen
//! ```
//!
//! Generate a YAML document from another directory without touching the glue:
//! ```bash
//! swagger-glue-gen -p ./handlers --doc-format yaml --no-glue
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! swagger-glue-gen -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use swagger_glue_gen::cli;

fn main() -> Result<()> {
    // Parse once to read the verbose flag before the logger exists
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Swagger Glue Generator starting...");

    let config = cli::parse_args_from_parsed(args)?;

    let summary = cli::run(&config)?;

    info!(
        "Generated {} with {} endpoints",
        summary.document_path.display(),
        summary.endpoints
    );

    Ok(())
}
