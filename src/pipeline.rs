//! @ai:module:intent Drive discovery, stripping, printing and writing for a whole tree
//! @ai:module:layer application
//! @ai:module:public_api run, process_file, RunSummary, FileReport, FileOutcome
//! @ai:module:depends_on config, discovery, format, matcher, mutator, printer, syntax
//!
//! Files are handled one at a time and independently: a failure is recorded
//! for that file and the run moves on. Only discovery and configuration
//! errors stop a run.

use crate::config::StripConfig;
use crate::discovery;
use crate::error::{Error, Result};
use crate::format::{self, Formatter};
use crate::matcher::Matcher;
use crate::mutator::{self, MutationReport};
use crate::printer;
use crate::syntax;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// @ai:intent What happened to one file
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    /// New content was written over the file.
    Rewritten { report: MutationReport },
    /// The processed text equals the original; the file was left alone.
    Unchanged,
    /// The file was skipped and left untouched.
    Failed { error: String },
}

/// @ai:intent Outcome of one discovered file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// @ai:intent Result of a complete run over a root path
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub root: PathBuf,
    pub formatter: String,
    pub files: Vec<FileReport>,
}

impl RunSummary {
    pub fn rewritten(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Rewritten { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Unchanged))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    /// @ai:intent Sum of the mutation reports of all rewritten files
    pub fn totals(&self) -> MutationReport {
        let mut total = MutationReport::default();
        for file in &self.files {
            if let FileOutcome::Rewritten { report } = &file.outcome {
                total.merge(*report);
            }
        }
        total
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }
}

/// @ai:intent Strip every Go file under root
/// @ai:pre root exists
/// @ai:post every discovered file has exactly one FileReport, in discovery order
/// @ai:post Err only for invalid configuration, an unusable formatter, or a discovery failure
/// @ai:effects fs:read, fs:write, process:spawn
pub fn run(root: &Path, config: &StripConfig) -> Result<RunSummary> {
    config.validate()?;
    let formatter = format::resolve(config.formatter)?;
    let matcher = Matcher::from_config(config);

    let files = discovery::discover(root)?;
    tracing::info!(
        "processing {} files under {} (marker `{}`, excluded key `{}`, formatter {})",
        files.len(),
        root.display(),
        matcher.marker(),
        matcher.excluded_key(),
        formatter.name()
    );

    let mut summary = RunSummary {
        root: root.to_path_buf(),
        formatter: formatter.name().to_string(),
        files: Vec::with_capacity(files.len()),
    };

    for path in files {
        let outcome = match process_file(&path, &matcher, formatter.as_ref()) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("skipping {}: {}", path.display(), e);
                FileOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        summary.files.push(FileReport { path, outcome });
    }

    tracing::info!(
        "done: {} rewritten, {} unchanged, {} failed",
        summary.rewritten(),
        summary.unchanged(),
        summary.failed()
    );
    Ok(summary)
}

/// @ai:intent Read, strip, print and write back a single file
/// @ai:post on Err the file on disk is untouched
/// @ai:post Unchanged when the printed text equals the original
/// @ai:effects fs:read, fs:write
pub fn process_file(
    path: &Path,
    matcher: &Matcher,
    formatter: &dyn Formatter,
) -> Result<FileOutcome> {
    let source = fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut file = syntax::parse(&source).map_err(|e| e.with_file(path))?;
    let report = mutator::strip(&mut file, matcher);
    let output = printer::print(&file, formatter).map_err(|e| e.with_file(path))?;

    if output == source {
        tracing::debug!("{} unchanged", path.display());
        return Ok(FileOutcome::Unchanged);
    }

    write_atomically(path, &output)?;
    tracing::debug!(
        "rewrote {} ({} comments, {} docs, {} tags rewritten, {} tags cleared)",
        path.display(),
        report.comments_removed,
        report.docs_cleared,
        report.tags_rewritten,
        report.tags_cleared
    );
    Ok(FileOutcome::Rewritten { report })
}

/// @ai:intent Replace a file's content through a sibling temp file and rename
/// @ai:post the original keeps its permissions; a failed write leaves it untouched
/// @ai:post a symlink stays a symlink; its target receives the new content
/// @ai:effects fs:write
fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let write_error = |source: std::io::Error| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    let is_link = fs::symlink_metadata(path)
        .map_err(write_error)?
        .file_type()
        .is_symlink();
    let target = if is_link {
        fs::canonicalize(path).map_err(write_error)?
    } else {
        path.to_path_buf()
    };
    let path = target.as_path();

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path).map_err(write_error)?.permissions();

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_error)?;
    tmp.write_all(content.as_bytes()).map_err(write_error)?;
    tmp.as_file().sync_all().map_err(write_error)?;
    fs::set_permissions(tmp.path(), permissions).map_err(write_error)?;
    tmp.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatterKind;
    use crate::format::Builtin;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn builtin_config() -> StripConfig {
        StripConfig {
            formatter: FormatterKind::Builtin,
            ..StripConfig::default()
        }
    }

    #[test]
    fn test_process_file_rewrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("types.go");
        fs::write(
            &path,
            "package v1\n\n// +kubebuilder:object:root=true\ntype Foo struct {\n\tName string `json:\"name\"`\n}\n",
        )
        .unwrap();

        let outcome = process_file(&path, &Matcher::default(), &Builtin).unwrap();

        assert!(matches!(outcome, FileOutcome::Rewritten { report } if report.tags_cleared == 1));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "package v1\n\ntype Foo struct {\n\tName string\n}\n"
        );
    }

    #[test]
    fn test_process_file_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.go");
        let src = "package p\n\nfunc F() {}\n";
        fs::write(&path, src).unwrap();

        let outcome = process_file(&path, &Matcher::default(), &Builtin).unwrap();

        assert!(matches!(outcome, FileOutcome::Unchanged));
        assert_eq!(fs::read_to_string(&path).unwrap(), src);
    }

    #[test]
    fn test_parse_failure_leaves_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.go");
        let src = "package p\n\n// +kubebuilder:x\nfunc (\n";
        fs::write(&path, src).unwrap();

        let err = process_file(&path, &Matcher::default(), &Builtin).unwrap_err();

        assert!(matches!(err, Error::Parse { ref file, .. } if file == &path));
        assert_eq!(fs::read_to_string(&path).unwrap(), src);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mode.go");
        fs::write(&path, "package p\n\n// +kubebuilder:x\nvar X = 1\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        process_file(&path, &Matcher::default(), &Builtin).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_is_written_through() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("real.go");
        let link = dir.path().join("link.go");
        fs::write(&target, "package p\n\n// +kubebuilder:x\nvar X = 1\n").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        process_file(&link, &Matcher::default(), &Builtin).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&target).unwrap(), "package p\n\nvar X = 1\n");
    }

    #[test]
    fn test_invalid_utf8_is_skipped_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.go");
        let bytes = b"package p\n\n// +kubebuilder:x caf\xe9\nvar X = 1\n";
        fs::write(&path, bytes).unwrap();

        let err = process_file(&path, &Matcher::default(), &Builtin).unwrap_err();

        assert!(matches!(err, Error::FileRead { path: ref p, .. } if p == &path));
        assert_eq!(fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn test_run_records_failures_and_continues() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a_bad.go"), "package p\nfunc {\n").unwrap();
        fs::write(
            dir.path().join("b_good.go"),
            "package p\n\n// +kubebuilder:x\ntype T struct{}\n",
        )
        .unwrap();
        fs::write(dir.path().join("c_same.go"), "package p\n").unwrap();

        let summary = run(dir.path(), &builtin_config()).unwrap();

        assert_eq!(summary.files.len(), 3);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.rewritten(), 1);
        assert_eq!(summary.unchanged(), 1);
        assert_eq!(summary.totals().comments_removed, 1);
        assert_eq!(summary.formatter, "builtin");
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let dir = TempDir::new().unwrap();
        let config = StripConfig {
            marker: String::new(),
            ..builtin_config()
        };

        assert!(matches!(run(dir.path(), &config), Err(Error::Config(_))));
    }

    #[test]
    fn test_run_missing_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let result = run(&dir.path().join("nope"), &builtin_config());

        assert!(matches!(result, Err(Error::Walk { .. })));
    }
}
