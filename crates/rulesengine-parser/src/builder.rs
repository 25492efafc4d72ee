//! Tree and rule set builders driven by JSON configuration

use std::collections::HashSet;
use std::sync::Arc;

use rulesengine_core::{
    ModelGroup, RawValue, ResultFunction, ResultFunctionFactory, RuleSet, RuleSetBuilder,
    RulesError, StepFunctionFactory, Tree, TreeBuilder,
};

use crate::config::{ConfigParser, FunctionConfig, ModelGroupConfig};
use crate::error::ParseError;

/// Builds one model group tree from its configuration
///
/// `schema[i]` supplies the step function for every node at depth `i`; each
/// rule's conditions spell out the path to its terminal node.
pub struct ModelGroupTreeBuilder<'a, P, R> {
    config: &'a ModelGroupConfig,
    step_factory: &'a dyn StepFunctionFactory<P>,
    result_factory: &'a dyn ResultFunctionFactory<P, R>,
}

impl<'a, P, R> ModelGroupTreeBuilder<'a, P, R> {
    pub fn new(
        config: &'a ModelGroupConfig,
        step_factory: &'a dyn StepFunctionFactory<P>,
        result_factory: &'a dyn ResultFunctionFactory<P, R>,
    ) -> Self {
        Self {
            config,
            step_factory,
            result_factory,
        }
    }

    fn result_functions(
        &self,
        functions: &[FunctionConfig],
        empty_args: &RawValue,
    ) -> Result<Vec<Box<dyn ResultFunction<P, R>>>, ParseError> {
        functions
            .iter()
            .map(|f| {
                let args = f.args.as_deref().unwrap_or(empty_args);
                self.result_factory
                    .create(&f.function, args)
                    .map_err(|e| ParseError::Function {
                        name: f.function.clone(),
                        message: e.to_string(),
                    })
            })
            .collect()
    }
}

impl<P, R> TreeBuilder<P, R> for ModelGroupTreeBuilder<'_, P, R> {
    fn build(&self, tree: &mut Tree<P, R>) -> rulesengine_core::Result<()> {
        let empty_args = RawValue::from_string("{}".to_string()).map_err(ParseError::Json)?;
        let schema = &self.config.schema;

        tree.default_functions = self.result_functions(&self.config.default, &empty_args)?;

        let mut endpoints: HashSet<&[String]> = HashSet::new();

        for (index, rule) in self.config.rules.iter().enumerate() {
            let conditions = rule.conditions.as_slice();
            if conditions.len() > schema.len() {
                return Err(ParseError::TooManyConditions {
                    index,
                    expected: schema.len(),
                    actual: conditions.len(),
                }
                .into());
            }
            if endpoints.contains(conditions) {
                return Err(ParseError::DuplicateConditions {
                    index,
                    conditions: conditions.to_vec(),
                }
                .into());
            }
            if (0..conditions.len()).any(|depth| endpoints.contains(&conditions[..depth])) {
                return Err(ParseError::OverlappingRule {
                    index,
                    conditions: conditions.to_vec(),
                }
                .into());
            }

            let mut node = &mut tree.root;
            for (depth, condition) in conditions.iter().enumerate() {
                if node.step_function.is_none() {
                    let step = &schema[depth];
                    let args = step.args.as_deref().unwrap_or(&empty_args);
                    let function = self.step_factory.create(&step.function, args).map_err(|e| {
                        ParseError::Function {
                            name: step.function.clone(),
                            message: e.to_string(),
                        }
                    })?;
                    node.step_function = Some(function);
                }
                node = node.child_or_insert(condition);
            }

            if !node.is_terminal() {
                return Err(ParseError::OverlappingRule {
                    index,
                    conditions: conditions.to_vec(),
                }
                .into());
            }

            node.result_functions = self.result_functions(&rule.results, &empty_args)?;
            endpoints.insert(conditions);
        }

        Ok(())
    }
}

/// Compiles raw JSON configuration into validated rule sets
pub struct JsonRuleSetBuilder<P, R> {
    step_factory: Arc<dyn StepFunctionFactory<P>>,
    result_factory: Arc<dyn ResultFunctionFactory<P, R>>,
}

impl<P, R> JsonRuleSetBuilder<P, R> {
    /// Create a builder that materialises functions with the given factories
    pub fn new(
        step_factory: Arc<dyn StepFunctionFactory<P>>,
        result_factory: Arc<dyn ResultFunctionFactory<P, R>>,
    ) -> Self {
        Self {
            step_factory,
            result_factory,
        }
    }

    fn build_model_group(
        &self,
        rule_set: &str,
        config: &ModelGroupConfig,
    ) -> rulesengine_core::Result<ModelGroup<P, R>> {
        let builder = ModelGroupTreeBuilder::new(
            config,
            self.step_factory.as_ref(),
            self.result_factory.as_ref(),
        );

        let tree = Tree::build(&builder).map_err(|e| {
            let context = format!(
                "rule set '{}', model group '{}': {}",
                rule_set, config.version, e
            );
            match e {
                RulesError::Validation(_) => RulesError::Validation(context),
                _ => RulesError::Build(context),
            }
        })?;

        Ok(ModelGroup {
            weight: config.weight,
            version: config.version.clone(),
            analytics_key: config.analytics_key.clone(),
            tree,
        })
    }
}

impl<P, R> RuleSetBuilder<P, R> for JsonRuleSetBuilder<P, R> {
    fn build(&self, raw: &[u8]) -> rulesengine_core::Result<Vec<RuleSet<P, R>>> {
        let config = ConfigParser::parse(raw)?;

        if !config.enabled {
            tracing::debug!("configuration disabled, no rule sets built");
            return Ok(Vec::new());
        }

        let mut rule_sets = Vec::with_capacity(config.rule_sets.len());
        for rule_set in &config.rule_sets {
            let model_groups = rule_set
                .model_groups
                .iter()
                .map(|group| self.build_model_group(&rule_set.name, group))
                .collect::<rulesengine_core::Result<Vec<_>>>()?;

            tracing::debug!(
                stage = %rule_set.stage,
                name = %rule_set.name,
                model_groups = model_groups.len(),
                "built rule set"
            );

            rule_sets.push(RuleSet {
                stage: rule_set.stage.clone(),
                name: rule_set.name.clone(),
                model_groups,
            });
        }

        Ok(rule_sets)
    }
}
