use thiserror::Error;

/// Failures that abort a whole filter pass.
///
/// Per-entry problems (unparseable labels) are never errors; those entries
/// are simply left visible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unsupported display language: {0:?}")]
    UnsupportedLanguage(String),

    #[error("unrecognized page layout: neither a course list table nor a thumbnail container was found")]
    UnrecognizedLayout,

    #[error("invalid module code: {0:?}")]
    InvalidModuleCode(String),
}
