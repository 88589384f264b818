use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE_PATH: &str = "src/api";
pub const DEFAULT_GEN_NAME: &str = "server.rs";
pub const DEFAULT_SWAGGER_DIR: &str = "swagger";
pub const DEFAULT_TITLE: &str = "Generated API";
pub const DEFAULT_API_VERSION: &str = "1.0.0";
pub const DEFAULT_FORMATTER: &str = "rustfmt";

/// Settings of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// File or directory holding the annotated handler sources
    pub source_path: PathBuf,
    /// File name of the routing glue written into every handler directory
    pub gen_name: String,
    /// Directory receiving the document and the Swagger UI page
    pub swagger_dir: PathBuf,
    pub doc_format: OutputFormat,
    pub title: String,
    pub api_version: String,
    pub base_path: Option<String>,
    pub host: Option<String>,
    /// Pipe rendered glue through `formatter`
    pub format_glue: bool,
    /// Formatter program reading source on stdin
    pub formatter: String,
    pub write_glue: bool,
    pub write_assets: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            gen_name: DEFAULT_GEN_NAME.to_string(),
            swagger_dir: PathBuf::from(DEFAULT_SWAGGER_DIR),
            doc_format: OutputFormat::Json,
            title: DEFAULT_TITLE.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            base_path: None,
            host: None,
            format_glue: true,
            formatter: DEFAULT_FORMATTER.to_string(),
            write_glue: true,
            write_assets: true,
        }
    }
}

impl Config {
    /// Checks values that clap cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        validate_gen_name(&self.gen_name)
    }

    /// Path of the glue file for a handler directory
    pub fn glue_path(&self, directory: &Path) -> PathBuf {
        directory.join(&self.gen_name)
    }
}

/// The glue name is a file name only; it must not point into another folder.
pub fn validate_gen_name(gen_name: &str) -> Result<()> {
    let bare = Path::new(gen_name)
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name == gen_name);

    if bare {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "--gen-name expects a file name, got '{}'",
            gen_name
        )))
    }
}
