//! Rules Engine Parser - JSON configuration to decision trees
//!
//! This crate turns the raw JSON configuration fetched for an identifier into
//! validated [`RuleSet`](rulesengine_core::RuleSet)s. Functions named in the
//! configuration are created through caller supplied factories.

pub mod builder;
pub mod config;
pub mod error;

// Re-export main parser types
pub use builder::{JsonRuleSetBuilder, ModelGroupTreeBuilder};
pub use config::{
    ConfigParser, FunctionConfig, ModelGroupConfig, RuleConfig, RuleSetConfig, RulesConfig,
};
pub use error::{ParseError, Result};
