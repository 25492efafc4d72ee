//! Error types for the rules engine core

use thiserror::Error;

/// Error returned by user supplied step and result functions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct FunctionError {
    message: String,
}

impl FunctionError {
    /// Create a new function error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for FunctionError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for FunctionError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Core error type
#[derive(Error, Debug)]
pub enum RulesError {
    /// A step function failed while classifying the payload
    #[error("Step function '{function}' failed: {source}")]
    StepFailure {
        function: String,
        #[source]
        source: FunctionError,
    },

    /// A result function failed; remaining result functions were skipped
    #[error("Result function failed: {0}")]
    ResultFailure(#[source] FunctionError),

    /// Traversal reached a node with children but no step function
    #[error("Node at depth {depth} has children but no step function")]
    MissingStepFunction { depth: usize },

    /// Tree could not be built from configuration
    #[error("Build error: {0}")]
    Build(String),

    /// Built tree is not well-formed
    #[error("Validation error: {0}")]
    Validation(String),
}

impl RulesError {
    /// Whether this error was raised by tree validation
    pub fn is_validation(&self) -> bool {
        matches!(self, RulesError::Validation(_))
    }

    /// Whether this error was raised while building a tree
    pub fn is_build(&self) -> bool {
        matches!(self, RulesError::Build(_))
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, RulesError>;
