//! Structural validation for decision trees

use crate::error::{Result, RulesError};
use crate::tree::{Node, Tree};

/// Validates tree structure before a tree is handed out
pub struct TreeValidator;

impl TreeValidator {
    /// Validate `tree` and return its uniform depth
    ///
    /// Fails when leaves sit at different depths or when a node with children
    /// lacks a step function.
    pub fn validate<P, R>(tree: &Tree<P, R>) -> Result<usize> {
        let mut leaf_depth: Option<usize> = None;
        let mut stack: Vec<(&Node<P, R>, usize, String)> = vec![(&tree.root, 0, String::new())];

        while let Some((node, depth, path)) = stack.pop() {
            if node.is_terminal() {
                match leaf_depth {
                    None => leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(RulesError::Validation(format!(
                            "leaf '{}' is at depth {} but other leaves are at depth {}",
                            display_path(&path),
                            depth,
                            expected
                        )));
                    }
                    Some(_) => {}
                }
                continue;
            }

            if node.step_function.is_none() {
                return Err(RulesError::Validation(format!(
                    "node '{}' has {} children but no step function",
                    display_path(&path),
                    node.children.len()
                )));
            }

            for (key, child) in &node.children {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}/{}", path, key)
                };
                stack.push((child, depth + 1, child_path));
            }
        }

        Ok(leaf_depth.unwrap_or(0))
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FunctionError;
    use crate::function::{FnStepFunction, StepFunction};

    fn constant(value: &'static str) -> Box<dyn StepFunction<()>> {
        Box::new(FnStepFunction::new(
            "constant",
            move |_: &()| -> std::result::Result<String, FunctionError> { Ok(value.to_string()) },
        ))
    }

    #[test]
    fn test_single_node_tree_is_valid() {
        let tree: Tree<(), ()> = Tree::new();
        assert_eq!(TreeValidator::validate(&tree).unwrap(), 0);
    }

    #[test]
    fn test_uniform_tree_reports_depth() {
        let mut tree: Tree<(), ()> = Tree::new();
        tree.root.step_function = Some(constant("a"));
        for key in ["a", "b"] {
            let child = tree.root.child_or_insert(key);
            child.step_function = Some(constant("x"));
            child.insert_child("x", Node::new());
            child.insert_child("y", Node::new());
        }
        assert_eq!(TreeValidator::validate(&tree).unwrap(), 2);
    }

    #[test]
    fn test_uneven_leaves_rejected() {
        let mut tree: Tree<(), ()> = Tree::new();
        tree.root.step_function = Some(constant("a"));
        tree.root.insert_child("a", Node::new());
        let deep = tree.root.child_or_insert("b");
        deep.step_function = Some(constant("x"));
        deep.insert_child("x", Node::new());

        let err = TreeValidator::validate(&tree).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("depth"));
    }

    #[test]
    fn test_missing_step_function_rejected() {
        let mut tree: Tree<(), ()> = Tree::new();
        tree.root.insert_child("a", Node::new());

        let err = TreeValidator::validate(&tree).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("<root>"));
    }
}
