//! @ai:module:intent Format source by piping it through an external gofmt binary
//! @ai:module:layer infrastructure
//! @ai:module:public_api Gofmt
//! @ai:module:stateless true

use super::Formatter;
use crate::error::{Error, Result};
use regex::Regex;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

/// @ai:intent The standard Go formatter, run as a child process
#[derive(Debug, Clone)]
pub struct Gofmt {
    program: PathBuf,
}

impl Default for Gofmt {
    fn default() -> Self {
        Self::new("gofmt")
    }
}

impl Gofmt {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// @ai:intent Check if the gofmt binary can be started
    /// @ai:effects process:spawn
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }

    fn failure(&self, message: String) -> Error {
        Error::Formatter {
            tool: self.program.display().to_string(),
            message,
        }
    }
}

impl Formatter for Gofmt {
    fn name(&self) -> &str {
        "gofmt"
    }

    /// @ai:intent Format source with gofmt
    /// @ai:post Err(Formatter) carries gofmt's first diagnostic with its position
    /// @ai:effects process:spawn
    fn format(&self, source: &str) -> Result<String> {
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.failure(format!("failed to start: {}", e)))?;

        // gofmt reads all of stdin before writing anything, so this cannot block
        // on a full stdout pipe.
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(source.as_bytes())
                .map_err(|e| self.failure(format!("failed to write input: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| self.failure(format!("failed to wait: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!("gofmt stderr: {}", stderr);
            return Err(self.failure(first_diagnostic(&stderr)));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| self.failure(format!("output is not UTF-8: {}", e)))
    }
}

fn diagnostic_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^<standard input>:(\d+):(\d+): (.+)$").expect("valid diagnostic regex")
    })
}

/// @ai:intent Reduce gofmt's stderr to its first diagnostic
/// @ai:example ("<standard input>:3:1: expected declaration") -> "line 3, column 1: expected declaration"
/// @ai:effects pure
fn first_diagnostic(stderr: &str) -> String {
    match diagnostic_pattern().captures(stderr) {
        Some(captures) => format!(
            "line {}, column {}: {}",
            &captures[1], &captures[2], &captures[3]
        ),
        None => stderr.trim().to_string(),
    }
}
