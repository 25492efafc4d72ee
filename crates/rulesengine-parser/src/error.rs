//! Parser error types

use rulesengine_core::RulesError;
use thiserror::Error;

/// Parser error
#[derive(Error, Debug)]
pub enum ParseError {
    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A factory could not create the named function
    #[error("Cannot create function '{name}': {message}")]
    Function { name: String, message: String },

    /// A rule has more conditions than the schema has levels
    #[error("Rule {index} has {actual} conditions but the schema defines {expected} levels")]
    TooManyConditions {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// Two rules share the same conditions
    #[error("Rule {index} repeats conditions {conditions:?}")]
    DuplicateConditions {
        index: usize,
        conditions: Vec<String>,
    },

    /// A rule ends where another rule continues deeper
    #[error("Rule {index} with conditions {conditions:?} overlaps a rule at a different depth")]
    OverlappingRule {
        index: usize,
        conditions: Vec<String>,
    },
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;

impl From<ParseError> for RulesError {
    fn from(err: ParseError) -> Self {
        RulesError::Build(err.to_string())
    }
}
