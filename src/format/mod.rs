//! @ai:module:intent Canonical formatting backends applied to rendered source
//! @ai:module:layer infrastructure
//! @ai:module:public_api Formatter, Builtin, Gofmt, resolve
//! @ai:module:depends_on config, error
//! @ai:module:stateless true

mod align;
mod gofmt;
mod layout;

pub use gofmt::Gofmt;
pub use layout::Builtin;

use crate::config::FormatterKind;
use crate::error::{Error, Result};

/// @ai:intent Turns valid Go source into canonically formatted Go source
pub trait Formatter {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    fn format(&self, source: &str) -> Result<String>;
}

/// @ai:intent Pick the formatter backend for a configured kind
/// @ai:post Err(Config) when gofmt is requested explicitly but cannot be run
/// @ai:effects process:spawn
pub fn resolve(kind: FormatterKind) -> Result<Box<dyn Formatter>> {
    resolve_with(kind, Gofmt::default())
}

fn resolve_with(kind: FormatterKind, gofmt: Gofmt) -> Result<Box<dyn Formatter>> {
    match kind {
        FormatterKind::Builtin => Ok(Box::new(Builtin)),
        FormatterKind::Gofmt => {
            if gofmt.is_available() {
                Ok(Box::new(gofmt))
            } else {
                Err(Error::Config(format!(
                    "formatter `{}` was requested but is not on PATH",
                    gofmt.name()
                )))
            }
        }
        FormatterKind::Auto => {
            if gofmt.is_available() {
                Ok(Box::new(gofmt))
            } else {
                tracing::warn!(
                    "gofmt not found on PATH; using the builtin layout, which only realigns \
                     struct fields and normalises blank lines, so output may not be fully gofmt-canonical"
                );
                Ok(Box::new(Builtin))
            }
        }
    }
}
