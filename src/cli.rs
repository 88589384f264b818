use crate::collector::UnitSummary;
use crate::config::{
    Config, DEFAULT_API_VERSION, DEFAULT_FORMATTER, DEFAULT_GEN_NAME, DEFAULT_SOURCE_PATH,
    DEFAULT_SWAGGER_DIR, DEFAULT_TITLE,
};
use crate::registry::Registry;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

/// Swagger Glue Generator - Swagger document and axum routing glue from annotated handlers
#[derive(Parser, Debug)]
#[command(name = "swagger-glue-gen")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// File or directory holding the annotated handlers
    #[arg(
        short = 'p',
        long = "source-path",
        value_name = "PATH",
        default_value = DEFAULT_SOURCE_PATH
    )]
    pub source_path: PathBuf,

    /// File name of the glue module written next to the handlers
    #[arg(
        short = 'f',
        long = "gen-name",
        value_name = "NAME",
        default_value = DEFAULT_GEN_NAME
    )]
    pub gen_name: String,

    /// Output directory of the Swagger document and UI
    #[arg(
        short = 'w',
        long = "swagger",
        value_name = "DIR",
        default_value = DEFAULT_SWAGGER_DIR
    )]
    pub swagger_dir: PathBuf,

    /// Document format (json or yaml)
    #[arg(long = "doc-format", value_enum, default_value = "json")]
    pub doc_format: OutputFormat,

    /// API title in the document info
    #[arg(long = "title", default_value = DEFAULT_TITLE)]
    pub title: String,

    /// API version in the document info
    #[arg(long = "api-version", default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    /// Base path of every route
    #[arg(long = "base-path")]
    pub base_path: Option<String>,

    /// Host serving the API
    #[arg(long = "host")]
    pub host: Option<String>,

    /// Write glue without running the formatter on it
    #[arg(long = "no-format")]
    pub no_format: bool,

    /// Formatter program used on the glue
    #[arg(long = "formatter", value_name = "PROGRAM", default_value = DEFAULT_FORMATTER)]
    pub formatter: String,

    /// Skip routing glue generation
    #[arg(long = "no-glue")]
    pub no_glue: bool,

    /// Skip writing the Swagger UI page
    #[arg(long = "no-assets")]
    pub no_assets: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// What a run produced
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Units visited
    pub units: usize,
    /// Units skipped because they were generated
    pub skipped: usize,
    /// Per-unit contributions, in collection order
    pub unit_summaries: Vec<UnitSummary>,
    pub constants: usize,
    pub records: usize,
    pub endpoints: usize,
    pub document_path: PathBuf,
    pub glue_files: Vec<PathBuf>,
    pub asset_files: Vec<PathBuf>,
    /// Glue problems that were logged instead of failing the run
    pub glue_warnings: Vec<String>,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<Config> {
    debug!("Parsed arguments: {:?}", args);

    if !args.source_path.exists() {
        anyhow::bail!("Source path does not exist: {}", args.source_path.display());
    }

    let config = Config {
        source_path: args.source_path,
        gen_name: args.gen_name,
        swagger_dir: args.swagger_dir,
        doc_format: args.doc_format,
        title: args.title,
        api_version: args.api_version,
        base_path: args.base_path,
        host: args.host,
        format_glue: !args.no_format,
        formatter: args.formatter,
        write_glue: !args.no_glue,
        write_assets: !args.no_assets,
    };
    config.validate()?;

    info!("Source path: {}", config.source_path.display());
    info!("Swagger directory: {}", config.swagger_dir.display());
    info!("Document format: {:?}", config.doc_format);
    if config.write_glue {
        info!("Glue file name: {}", config.gen_name);
    } else {
        info!("Glue: disabled");
    }

    Ok(config)
}

/// Run the main workflow
///
/// Only scanning and parsing failures, or failing to write the document, abort a run. Glue
/// problems are logged and reported in [`RunSummary::glue_warnings`].
pub fn run(config: &Config) -> Result<RunSummary> {
    use crate::assets::write_assets;
    use crate::collector::Collector;
    use crate::parser::AstParser;
    use crate::scanner::FileScanner;
    use crate::schema_generator::SchemaProjector;
    use crate::serializer::{document_file_name, serialize, write_to_file};
    use crate::swagger_builder::SwaggerBuilder;

    info!("Starting Swagger document generation...");

    // Step 1: Scan for source units
    info!("Scanning {}...", config.source_path.display());
    let scan_result = FileScanner::new(config.source_path.clone()).scan()?;

    info!(
        "Found {} source units ({} generated files skipped)",
        scan_result.rust_files.len(),
        scan_result.skipped.len()
    );
    for warning in &scan_result.warnings {
        warn!("{}", warning);
    }
    if scan_result.rust_files.is_empty() {
        warn!("No source units found, the document will have no paths");
    }

    // Step 2: Parse every unit, any failure aborts before output is written
    info!("Parsing source units...");
    let parsed_files = AstParser::parse_files(&scan_result.rust_files)?;

    // Step 3: Collect constants, records and handlers
    info!("Collecting declarations...");
    let mut registry = Registry::new();
    let unit_summaries = Collector::collect_all(&parsed_files, &mut registry);

    if registry.endpoints.is_empty() {
        warn!("No handlers found");
    }

    // Step 4: Build, serialize and write the document
    info!("Building Swagger document...");
    let projector = SchemaProjector::new(&registry.types);
    let mut builder = SwaggerBuilder::new()
        .with_info(config.title.clone(), config.api_version.clone(), None)
        .with_host(config.host.clone())
        .with_base_path(config.base_path.clone());
    builder.add_endpoints(&registry.endpoints, &projector);
    let document = builder.build();

    info!("Serializing to {:?} format...", config.doc_format);
    let content = serialize(&document, config.doc_format)?;

    let doc_file_name = document_file_name(config.doc_format);
    let document_path = config.swagger_dir.join(doc_file_name);
    write_to_file(&content, &document_path)?;
    info!("Wrote Swagger document to {}", document_path.display());

    let asset_files = if config.write_assets {
        write_assets(&config.swagger_dir, doc_file_name)?
    } else {
        Vec::new()
    };

    // Step 5: Render, format and write glue
    let mut glue_warnings = Vec::new();
    let glue_files = if config.write_glue {
        info!("Rendering routing glue...");
        write_glue(config, &registry, &scan_result.rust_files, &mut glue_warnings)
    } else {
        Vec::new()
    };

    let summary = RunSummary {
        units: scan_result.rust_files.len(),
        skipped: scan_result.skipped.len(),
        unit_summaries,
        constants: registry.constants.len(),
        records: registry.types.len(),
        endpoints: registry.endpoints.len(),
        document_path,
        glue_files,
        asset_files,
        glue_warnings,
    };

    // Step 6: Display summary
    info!("Generation complete!");
    info!("Summary:");
    info!("  - Units scanned: {}", summary.units);
    info!("  - Generated files skipped: {}", summary.skipped);
    for unit in summary.unit_summaries.iter().filter(|u| !u.handlers.is_empty()) {
        info!("  - {}: {}", unit.path.display(), unit.handlers.join(", "));
    }
    info!("  - Records: {}", summary.records);
    info!("  - Endpoints: {}", summary.endpoints);
    info!("  - Glue files: {}", summary.glue_files.len());
    if !summary.glue_warnings.is_empty() {
        warn!("  - Glue warnings: {}", summary.glue_warnings.len());
    }

    Ok(summary)
}

/// Writes one glue module per handler directory. Failures are collected into `warnings`.
fn write_glue(
    config: &Config,
    registry: &Registry,
    units: &[PathBuf],
    warnings: &mut Vec<String>,
) -> Vec<PathBuf> {
    use crate::glue::{formatter, GlueRenderer};
    use crate::serializer::write_to_file;

    let rendered = GlueRenderer::new(&registry.constants)
        .and_then(|renderer| renderer.render_all(&registry.endpoints, units));
    let files = match rendered {
        Ok(files) => files,
        Err(e) => {
            let warning = format!("Failed to render routing glue: {}", e);
            warn!("{}", warning);
            warnings.push(warning);
            return Vec::new();
        }
    };

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = config.glue_path(&file.directory);
        let content = if config.format_glue {
            match formatter::format_source(&config.formatter, &file.content) {
                Ok(formatted) => formatted,
                Err(e) => {
                    let warning = format!("Writing {} unformatted: {}", path.display(), e);
                    warn!("{}", warning);
                    warnings.push(warning);
                    file.content
                }
            }
        } else {
            file.content
        };

        match write_to_file(&content, &path)
            .with_context(|| format!("Failed to write glue for {}", file.package))
        {
            Ok(()) => {
                info!("File created: {}", path.display());
                written.push(path);
            }
            Err(e) => {
                let warning = format!("{:#}", e);
                warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }
    written
}
