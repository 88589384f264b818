use crate::error::{Error, Result};
use log::debug;
use std::io::Write;
use std::process::{Command, Stdio};

/// Formats generated source with a rustfmt-compatible `program`, reading stdin and writing
/// stdout.
pub fn format_source(program: &str, source: &str) -> Result<String> {
    debug!("Formatting {} bytes with {}", source.len(), program);

    let mut child = Command::new(program)
        .args(["--edition", "2021"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::FormatterError(format!("failed to start {}: {}", program, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(source.as_bytes())?;
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(Error::FormatterError(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    String::from_utf8(output.stdout)
        .map_err(|e| Error::FormatterError(format!("{} produced invalid UTF-8: {}", program, e)))
}
