use thiserror::Error;

/// Errors surfaced by the library.
///
/// The text transform itself never fails; only catalog registration and
/// parsing of user-supplied option values do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypografError {
    #[error("rule name must not be empty")]
    EmptyRuleName,

    #[error("unknown mode '{0}' (expected none, name or digit)")]
    UnknownMode(String),
}
