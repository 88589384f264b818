use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Marker line written at the top of every generated file. Files containing a line that
/// starts with it are never scanned.
pub const GENERATED_MARKER: &str = "// @swagger-glue-generated";

/// File scanner for collecting the source units of one run.
///
/// The `FileScanner` accepts either a single file or a directory. Directories are walked
/// recursively in file-name order, skipping `target` and hidden directories (those starting
/// with `.`). Files carrying the [`GENERATED_MARKER`] are skipped so that glue produced by an
/// earlier run is not read back as input.
///
/// # Example
///
/// ```no_run
/// use swagger_glue_gen::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./src/api"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} source units", result.rust_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// Result of a scanning operation.
pub struct ScanResult {
    /// Source units to visit, in traversal order
    pub rust_files: Vec<PathBuf>,
    /// Files skipped because they carry the generated marker
    pub skipped: Vec<PathBuf>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl FileScanner {
    /// Creates a new `FileScanner` for the specified file or directory.
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Collects all `.rs` source units under the root path.
    ///
    /// If any directories or files cannot be accessed, warnings are logged and added to
    /// the result, but scanning continues.
    ///
    /// # Errors
    ///
    /// Returns an error if the root path does not exist or a candidate file cannot be read
    /// for the generated-marker check.
    pub fn scan(&self) -> Result<ScanResult> {
        let metadata = fs::metadata(&self.root_path)
            .with_context(|| format!("Failed to access path: {}", self.root_path.display()))?;

        let mut result = ScanResult {
            rust_files: Vec::new(),
            skipped: Vec::new(),
            warnings: Vec::new(),
        };

        if !metadata.is_dir() {
            self.consider(&self.root_path, &mut result)?;
            return Ok(result);
        }

        for entry in WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.path() == self.root_path {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                let is_hidden = file_name.starts_with('.');
                let is_target = file_name == "target";

                !is_hidden && !is_target
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("rs") {
                        self.consider(path, &mut result)?;
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    result.warnings.push(warning);
                }
            }
        }

        Ok(result)
    }

    fn consider(&self, path: &Path, result: &mut ScanResult) -> Result<()> {
        if is_generated(path)? {
            debug!("Skipping generated file: {}", path.display());
            result.skipped.push(path.to_path_buf());
        } else {
            result.rust_files.push(path.to_path_buf());
        }
        Ok(())
    }
}

/// Whether the file carries the generated marker on any line.
pub fn is_generated(path: &Path) -> Result<bool> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    Ok(content.lines().any(|line| line.starts_with(GENERATED_MARKER)))
}
