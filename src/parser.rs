use crate::error::Error;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// AST (Abstract Syntax Tree) parser for Rust source units.
///
/// The `AstParser` uses the `syn` crate to parse source code into a syntax tree from which
/// constants, records and handlers are collected.
///
/// # Example
///
/// ```no_run
/// use swagger_glue_gen::parser::AstParser;
/// use std::path::Path;
///
/// let parsed = AstParser::parse_file(Path::new("src/api/users.rs")).unwrap();
/// println!("Parsed {} items", parsed.syntax_tree.items.len());
/// ```
pub struct AstParser;

/// A successfully parsed source unit with its abstract syntax tree.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// The parsed abstract syntax tree
    pub syntax_tree: syn::File,
}

impl AstParser {
    /// Parses a single source file into an AST.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file contains invalid Rust syntax ([`Error::ParseError`])
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let syntax_tree = Self::parse_source(path, &content)?;

        debug!("Successfully parsed file: {}", path.display());

        Ok(ParsedFile {
            path: path.to_path_buf(),
            syntax_tree,
        })
    }

    /// Parses source text that was already read from `path`.
    pub fn parse_source(path: &Path, content: &str) -> std::result::Result<syn::File, Error> {
        syn::parse_file(content).map_err(|err| Error::ParseError {
            file: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Parses every unit in order, stopping at the first failure.
    ///
    /// A unit that cannot be parsed aborts the whole run: no partial output is produced
    /// from a source tree that is only partly understood.
    pub fn parse_files(paths: &[PathBuf]) -> Result<Vec<ParsedFile>> {
        debug!("Parsing {} files", paths.len());

        let parsed: Vec<ParsedFile> = paths
            .iter()
            .map(|path| Self::parse_file(path))
            .collect::<Result<_>>()?;

        debug!("Parsing complete: {} files", parsed.len());

        Ok(parsed)
    }
}
