//! Decision tree and traversal
//!
//! A [`Tree`] routes a payload from its root through one step function per
//! level until it reaches a terminal node, then executes that node's result
//! functions. When a classification has no matching child the walk stops and
//! the tree's default result functions run instead.
//!
//! ```text
//!                 root: deviceCountry
//!                /         \
//!            "USA"         "JPN"
//!          [excludeA]    [excludeB]
//!
//!   payload from "FRA" -> miss -> default functions
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, RulesError};
use crate::function::{ResultFunction, ResultFunctionMeta, StepFunction, StepFunctionStep};
use crate::validator::TreeValidator;

/// A single tree node
///
/// Nodes with children classify the payload with their step function; nodes
/// without children are terminal and hold the result functions to execute.
pub struct Node<P, R> {
    /// Step function used to pick a child (required when `children` is non-empty)
    pub step_function: Option<Box<dyn StepFunction<P>>>,

    /// Result functions executed when traversal ends on this node
    pub result_functions: Vec<Box<dyn ResultFunction<P, R>>>,

    /// Children keyed by classification
    pub children: HashMap<String, Node<P, R>>,
}

impl<P, R> Node<P, R> {
    /// Create an empty node
    pub fn new() -> Self {
        Self {
            step_function: None,
            result_functions: Vec::new(),
            children: HashMap::new(),
        }
    }

    /// Create a node that classifies with the given step function
    pub fn with_step_function(step_function: Box<dyn StepFunction<P>>) -> Self {
        Self {
            step_function: Some(step_function),
            ..Self::new()
        }
    }

    /// Create a terminal node with the given result functions
    pub fn terminal(result_functions: Vec<Box<dyn ResultFunction<P, R>>>) -> Self {
        Self {
            result_functions,
            ..Self::new()
        }
    }

    /// Whether this node has no children
    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }

    /// Insert a child under `key`, returning the previous child if any
    pub fn insert_child(&mut self, key: impl Into<String>, child: Node<P, R>) -> Option<Node<P, R>> {
        self.children.insert(key.into(), child)
    }

    /// Get the child for a classification
    pub fn child(&self, key: &str) -> Option<&Node<P, R>> {
        self.children.get(key)
    }

    /// Get the child for a classification, creating an empty one if missing
    pub fn child_or_insert(&mut self, key: &str) -> &mut Node<P, R> {
        self.children
            .entry(key.to_string())
            .or_insert_with(Node::new)
    }
}

impl<P, R> Default for Node<P, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, R> fmt::Debug for Node<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.children.keys().collect();
        keys.sort();
        f.debug_struct("Node")
            .field("step_function", &self.step_function.as_ref().map(|s| s.name()))
            .field("result_functions", &self.result_functions.len())
            .field("children", &keys)
            .finish()
    }
}

/// Populates an empty tree from external configuration
pub trait TreeBuilder<P, R> {
    fn build(&self, tree: &mut Tree<P, R>) -> Result<()>;
}

impl<P, R, F> TreeBuilder<P, R> for F
where
    F: Fn(&mut Tree<P, R>) -> Result<()>,
{
    fn build(&self, tree: &mut Tree<P, R>) -> Result<()> {
        self(tree)
    }
}

/// Decision tree
pub struct Tree<P, R> {
    /// Root node
    pub root: Node<P, R>,

    /// Result functions used when traversal falls off the tree
    pub default_functions: Vec<Box<dyn ResultFunction<P, R>>>,
}

impl<P, R> Tree<P, R> {
    /// Create an empty tree (terminal root, no defaults)
    pub fn new() -> Self {
        Self {
            root: Node::new(),
            default_functions: Vec::new(),
        }
    }

    /// Build a tree with `builder` and validate the result
    ///
    /// The partially built tree is dropped if the builder or validation fails.
    pub fn build<B>(builder: &B) -> Result<Self>
    where
        B: TreeBuilder<P, R> + ?Sized,
    {
        let mut tree = Self::new();
        builder.build(&mut tree).map_err(|e| match e {
            RulesError::Validation(_) | RulesError::Build(_) => e,
            other => RulesError::Build(other.to_string()),
        })?;
        tree.validate()?;
        Ok(tree)
    }

    /// Check that the tree is well-formed
    ///
    /// Every leaf must sit at the same depth and every non-terminal node must
    /// have a step function.
    pub fn validate(&self) -> Result<()> {
        TreeValidator::validate(self).map(|_| ())
    }

    /// Maximum number of levels between the root and a leaf
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(&self.root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(node.children.values().map(|child| (child, depth + 1)));
        }
        max_depth
    }

    /// Walk the tree for `payload` and apply the selected result functions to `result`
    ///
    /// A step function failure aborts before any result function runs. The
    /// first failing result function aborts the rest; earlier mutations to
    /// `result` are kept.
    pub fn run(&self, payload: &P, result: &mut R) -> Result<()> {
        let mut current = Some(&self.root);
        let mut meta = ResultFunctionMeta::default();

        while let Some(node) = current {
            if node.is_terminal() {
                break;
            }

            let step = node
                .step_function
                .as_deref()
                .ok_or(RulesError::MissingStepFunction { depth: meta.depth() })?;

            let classification = step.call(payload).map_err(|source| RulesError::StepFailure {
                function: step.name().to_string(),
                source,
            })?;

            current = node.children.get(&classification);
            if current.is_none() {
                tracing::trace!(
                    function = step.name(),
                    classification = %classification,
                    "no branch for classification, using default functions"
                );
            }

            meta.schema_function_results.push(StepFunctionStep {
                func_name: step.name().to_string(),
                func_result: classification,
            });
        }

        let functions = match current {
            Some(node) => &node.result_functions,
            None => &self.default_functions,
        };

        for function in functions {
            function
                .call(payload, result, &meta)
                .map_err(RulesError::ResultFailure)?;
        }

        Ok(())
    }
}

impl<P, R> Default for Tree<P, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, R> fmt::Debug for Tree<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root)
            .field("default_functions", &self.default_functions.len())
            .finish()
    }
}
