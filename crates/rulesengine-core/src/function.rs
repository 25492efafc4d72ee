//! Step and result function contracts
//!
//! A [`StepFunction`] classifies a payload into a string that selects the next
//! child while walking a tree. A [`ResultFunction`] runs once a terminal node
//! (or the tree defaults) has been selected and mutates the result.
//!
//! Both are materialised from configuration through factories that take a
//! function name and its raw JSON arguments.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::FunctionError;

/// Classifies a payload during traversal
pub trait StepFunction<P>: Send + Sync {
    /// Function name, recorded in the traversal trace
    fn name(&self) -> &str;

    /// Classify the payload
    fn call(&self, payload: &P) -> Result<String, FunctionError>;
}

/// Mutates the result once traversal has finished
pub trait ResultFunction<P, R>: Send + Sync {
    fn call(
        &self,
        payload: &P,
        result: &mut R,
        meta: &ResultFunctionMeta,
    ) -> Result<(), FunctionError>;
}

/// One level descended during traversal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFunctionStep {
    /// Name of the step function evaluated at this level
    pub func_name: String,

    /// Classification it returned
    pub func_result: String,
}

/// Traversal provenance handed to result functions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultFunctionMeta {
    /// Ordered steps from the root downwards
    pub schema_function_results: Vec<StepFunctionStep>,
}

impl ResultFunctionMeta {
    /// Number of levels descended
    pub fn depth(&self) -> usize {
        self.schema_function_results.len()
    }
}

/// Creates step functions from a name and raw JSON arguments
pub trait StepFunctionFactory<P>: Send + Sync {
    fn create(&self, name: &str, args: &RawValue)
        -> Result<Box<dyn StepFunction<P>>, FunctionError>;
}

impl<P, F> StepFunctionFactory<P> for F
where
    F: Fn(&str, &RawValue) -> Result<Box<dyn StepFunction<P>>, FunctionError> + Send + Sync,
{
    fn create(
        &self,
        name: &str,
        args: &RawValue,
    ) -> Result<Box<dyn StepFunction<P>>, FunctionError> {
        self(name, args)
    }
}

/// Creates result functions from a name and raw JSON arguments
pub trait ResultFunctionFactory<P, R>: Send + Sync {
    fn create(
        &self,
        name: &str,
        args: &RawValue,
    ) -> Result<Box<dyn ResultFunction<P, R>>, FunctionError>;
}

impl<P, R, F> ResultFunctionFactory<P, R> for F
where
    F: Fn(&str, &RawValue) -> Result<Box<dyn ResultFunction<P, R>>, FunctionError> + Send + Sync,
{
    fn create(
        &self,
        name: &str,
        args: &RawValue,
    ) -> Result<Box<dyn ResultFunction<P, R>>, FunctionError> {
        self(name, args)
    }
}

/// Step function backed by a closure
pub struct FnStepFunction<F> {
    name: String,
    func: F,
}

impl<F> FnStepFunction<F> {
    /// Wrap a closure under the given name
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<P, F> StepFunction<P> for FnStepFunction<F>
where
    F: Fn(&P) -> Result<String, FunctionError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, payload: &P) -> Result<String, FunctionError> {
        (self.func)(payload)
    }
}

/// Result function backed by a closure
pub struct FnResultFunction<F> {
    func: F,
}

impl<F> FnResultFunction<F> {
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<P, R, F> ResultFunction<P, R> for FnResultFunction<F>
where
    F: Fn(&P, &mut R, &ResultFunctionMeta) -> Result<(), FunctionError> + Send + Sync,
{
    fn call(
        &self,
        payload: &P,
        result: &mut R,
        meta: &ResultFunctionMeta,
    ) -> Result<(), FunctionError> {
        (self.func)(payload, result, meta)
    }
}
