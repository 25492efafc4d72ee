//! Rules Engine Core - decision trees for the rules engine
//!
//! This crate provides the building blocks shared by the rest of the workspace:
//! - Step and result function contracts, plus the factories that create them
//! - `Node` / `Tree` with traversal (`Tree::run`)
//! - Tree builders and structural validation
//! - Rule sets and model groups compiled from configuration
//! - Error types

pub mod error;
pub mod function;
pub mod ruleset;
pub mod tree;
pub mod validator;

// Re-export commonly used types
pub use error::{FunctionError, Result, RulesError};
pub use function::{
    FnResultFunction, FnStepFunction, ResultFunction, ResultFunctionFactory, ResultFunctionMeta,
    StepFunction, StepFunctionFactory, StepFunctionStep,
};
pub use ruleset::{ModelGroup, RuleSet, RuleSetBuilder};
pub use tree::{Node, Tree, TreeBuilder};
pub use validator::TreeValidator;

// Raw JSON arguments handed to function factories
pub use serde_json::value::RawValue;
