//! Rule sets and model groups
//!
//! A [`RuleSet`] groups model variants that share a stage and name. Each
//! [`ModelGroup`] is an independently traversable [`Tree`] plus the metadata an
//! external selector uses to pick one (weight, version, analytics key).

use std::fmt;

use crate::error::Result;
use crate::tree::Tree;

/// Compiled model variant
pub struct ModelGroup<P, R> {
    /// Relative selection weight
    pub weight: i32,

    /// Model version
    pub version: String,

    /// Key reported to analytics when this group is selected
    pub analytics_key: String,

    /// Decision tree, including the group's default result functions
    pub tree: Tree<P, R>,
}

impl<P, R> ModelGroup<P, R> {
    /// Run this group's tree
    pub fn run(&self, payload: &P, result: &mut R) -> Result<()> {
        self.tree.run(payload, result)
    }
}

impl<P, R> fmt::Debug for ModelGroup<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelGroup")
            .field("weight", &self.weight)
            .field("version", &self.version)
            .field("analytics_key", &self.analytics_key)
            .field("tree", &self.tree)
            .finish()
    }
}

/// Model groups sharing a stage and name
pub struct RuleSet<P, R> {
    pub stage: String,
    pub name: String,
    pub model_groups: Vec<ModelGroup<P, R>>,
}

impl<P, R> RuleSet<P, R> {
    /// Sum of all model group weights
    pub fn total_weight(&self) -> i64 {
        self.model_groups.iter().map(|g| i64::from(g.weight)).sum()
    }

    /// Find a model group by version
    pub fn model_group(&self, version: &str) -> Option<&ModelGroup<P, R>> {
        self.model_groups.iter().find(|g| g.version == version)
    }
}

impl<P, R> fmt::Debug for RuleSet<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("stage", &self.stage)
            .field("name", &self.name)
            .field("model_groups", &self.model_groups)
            .finish()
    }
}

/// Compiles raw configuration bytes into validated rule sets
///
/// Implementations must validate every tree they produce; a failure for any
/// tree fails the whole build.
pub trait RuleSetBuilder<P, R>: Send + Sync {
    fn build(&self, raw: &[u8]) -> Result<Vec<RuleSet<P, R>>>;
}
