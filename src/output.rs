//! @ai:module:intent Format run summaries for the terminal or as JSON
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, format_run_summary
//! @ai:module:depends_on pipeline
//! @ai:module:stateless true

use crate::pipeline::{FileOutcome, RunSummary};
use colored::Colorize;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// @ai:intent Format a run summary as a string
/// @ai:effects pure
pub fn format_run_summary(summary: &RunSummary, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(summary).unwrap_or_default(),
        OutputFormat::JsonPretty => serde_json::to_string_pretty(summary).unwrap_or_default(),
        OutputFormat::Text => format_run_summary_text(summary),
    }
}

/// @ai:intent Format a run summary as human-readable text
/// @ai:effects pure
fn format_run_summary_text(summary: &RunSummary) -> String {
    let mut output = String::new();

    for file in &summary.files {
        let path = file.path.display().to_string();
        match &file.outcome {
            FileOutcome::Rewritten { report } => {
                output.push_str(&format!(
                    "{} {} {}\n",
                    "STRIP".green().bold(),
                    path,
                    format!(
                        "({} comments, {} docs, {} tags rewritten, {} tags cleared)",
                        report.comments_removed,
                        report.docs_cleared,
                        report.tags_rewritten,
                        report.tags_cleared
                    )
                    .dimmed()
                ));
            }
            FileOutcome::Unchanged => {
                output.push_str(&format!("{} {}\n", "SAME".blue(), path.dimmed()));
            }
            FileOutcome::Failed { error } => {
                output.push_str(&format!("{} {} - {}\n", "FAIL".red().bold(), path, error));
            }
        }
    }

    output.push('\n');
    output.push_str(&format!(
        "Processed {} files with {} formatter\n",
        summary.files.len(),
        summary.formatter
    ));

    let totals = summary.totals();
    let counts = format!(
        "{} rewritten, {} unchanged, {} comment groups removed, {} tags changed",
        summary.rewritten(),
        summary.unchanged(),
        totals.comments_removed,
        totals.tags_rewritten + totals.tags_cleared
    );

    if summary.failed() > 0 {
        output.push_str(&format!(
            "{} {} failed, {}\n",
            "WARN".yellow().bold(),
            summary.failed().to_string().red().bold(),
            counts
        ));
    } else {
        output.push_str(&format!("{} {}\n", "OK".green().bold(), counts));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutator::MutationReport;
    use crate::pipeline::FileReport;
    use std::path::PathBuf;

    fn summary() -> RunSummary {
        RunSummary {
            root: PathBuf::from("api"),
            formatter: "builtin".to_string(),
            files: vec![
                FileReport {
                    path: PathBuf::from("api/a.go"),
                    outcome: FileOutcome::Rewritten {
                        report: MutationReport {
                            comments_removed: 2,
                            docs_cleared: 1,
                            tags_rewritten: 1,
                            tags_cleared: 0,
                        },
                    },
                },
                FileReport {
                    path: PathBuf::from("api/b.go"),
                    outcome: FileOutcome::Failed {
                        error: "Parse error at api/b.go:2:1: unexpected `{`".to_string(),
                    },
                },
            ],
        }
    }

    #[test]
    fn test_text_lists_every_file() {
        colored::control::set_override(false);
        let text = format_run_summary(&summary(), OutputFormat::Text);

        assert!(text.contains("STRIP api/a.go (2 comments, 1 docs, 1 tags rewritten, 0 tags cleared)"));
        assert!(text.contains("FAIL api/b.go - Parse error at api/b.go:2:1"));
        assert!(text.contains("Processed 2 files with builtin formatter"));
        assert!(text.contains("WARN 1 failed"));
    }

    #[test]
    fn test_json_shape() {
        let json = format_run_summary(&summary(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["formatter"], "builtin");
        assert_eq!(value["files"][0]["status"], "rewritten");
        assert_eq!(value["files"][0]["report"]["comments_removed"], 2);
        assert_eq!(value["files"][1]["status"], "failed");
        assert_eq!(value["files"][1]["path"], "api/b.go");
    }
}
