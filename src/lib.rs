//! @ai:module:intent Library for stripping marker comments and struct tag keys from Go sources
//! @ai:module:layer infrastructure
//! @ai:module:public_api config, discovery, error, format, language, matcher, mutator, output, pipeline, printer, syntax
//! @ai:module:stateless true
//!
//! # annostrip
//!
//! Rewrites Go source trees in place: comments containing a marker (by
//! default `kubebuilder`) are removed, struct tag fragments with an excluded
//! key (by default `json`) are dropped, and the result is written back in
//! canonical layout.
//!
//! ## Example
//!
//! ```rust,no_run
//! use annostrip::{output, pipeline, StripConfig};
//! use std::path::Path;
//!
//! let summary = pipeline::run(Path::new("api"), &StripConfig::default()).unwrap();
//! println!("{}", output::format_run_summary(&summary, output::OutputFormat::Text));
//! ```
//!
//! Single sources can be processed without touching the filesystem:
//!
//! ```rust
//! use annostrip::{format::Builtin, matcher::Matcher, mutator, printer, syntax};
//!
//! let mut file = syntax::parse("package p\n\n// +kubebuilder:x\nvar X = 1\n").unwrap();
//! mutator::strip(&mut file, &Matcher::default());
//! assert_eq!(printer::print(&file, &Builtin).unwrap(), "package p\n\nvar X = 1\n");
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod format;
pub mod language;
pub mod matcher;
pub mod mutator;
pub mod output;
pub mod pipeline;
pub mod printer;
pub mod syntax;

pub use config::{FormatterKind, StripConfig};
pub use error::{Error, Result};
pub use format::{Builtin, Formatter, Gofmt};
pub use matcher::Matcher;
pub use mutator::{strip, MutationReport};
pub use output::{format_run_summary, OutputFormat};
pub use pipeline::{process_file, run, FileOutcome, FileReport, RunSummary};
pub use syntax::{parse, SourceFile};
