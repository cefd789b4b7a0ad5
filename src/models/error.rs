//! Errors raised by lookups and registration.

use crate::models::competitor::Identifier;

/// Errors that can occur while building or resolving a bracket.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketError {
    /// No competitor is registered under this id, name or alias.
    NotFound(Identifier),
    /// A competitor with this id, name or alias is already registered.
    DuplicateRegistration(Identifier),
}

impl std::fmt::Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::NotFound(key) => {
                write!(f, "Competitor with name, id or alias {} does not exist", key)
            }
            BracketError::DuplicateRegistration(key) => {
                write!(f, "Competitor with name, id or alias {} already exists", key)
            }
        }
    }
}

impl std::error::Error for BracketError {}
