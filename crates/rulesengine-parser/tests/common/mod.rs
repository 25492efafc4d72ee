//! Shared payloads and function factories for parser tests

use std::sync::Arc;

use rulesengine_core::{
    FnResultFunction, FnStepFunction, FunctionError, RawValue, ResultFunction,
    ResultFunctionFactory, ResultFunctionMeta, StepFunction, StepFunctionFactory,
};
use rulesengine_parser::JsonRuleSetBuilder;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct AuctionRequest {
    pub country: String,
    pub device: String,
}

impl AuctionRequest {
    pub fn new(country: &str, device: &str) -> Self {
        Self {
            country: country.to_string(),
            device: device.to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Decision {
    pub excluded: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
struct ExcludeArgs {
    bidders: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TagArgs {
    analytics_value: String,
}

fn parse_args<T: for<'de> Deserialize<'de>>(args: &RawValue) -> Result<T, FunctionError> {
    serde_json::from_str(args.get()).map_err(|e| FunctionError::new(e.to_string()))
}

pub fn step_factory(
    name: &str,
    _args: &RawValue,
) -> Result<Box<dyn StepFunction<AuctionRequest>>, FunctionError> {
    match name {
        "deviceCountry" => Ok(Box::new(FnStepFunction::new(
            "deviceCountry",
            |req: &AuctionRequest| -> Result<String, FunctionError> { Ok(req.country.clone()) },
        ))),
        "deviceType" => Ok(Box::new(FnStepFunction::new(
            "deviceType",
            |req: &AuctionRequest| -> Result<String, FunctionError> { Ok(req.device.clone()) },
        ))),
        other => Err(FunctionError::new(format!("unknown step function: {}", other))),
    }
}

pub fn result_factory(
    name: &str,
    args: &RawValue,
) -> Result<Box<dyn ResultFunction<AuctionRequest, Decision>>, FunctionError> {
    match name {
        "excludeBidders" => {
            let ExcludeArgs { bidders } = parse_args(args)?;
            Ok(Box::new(FnResultFunction::new(
                move |_: &AuctionRequest,
                      decision: &mut Decision,
                      _: &ResultFunctionMeta|
                      -> Result<(), FunctionError> {
                    decision.excluded.extend(bidders.iter().cloned());
                    Ok(())
                },
            )))
        }
        "logATag" => {
            let TagArgs { analytics_value } = parse_args(args)?;
            Ok(Box::new(FnResultFunction::new(
                move |_: &AuctionRequest,
                      decision: &mut Decision,
                      _: &ResultFunctionMeta|
                      -> Result<(), FunctionError> {
                    decision.tags.push(analytics_value.clone());
                    Ok(())
                },
            )))
        }
        other => Err(FunctionError::new(format!("unknown result function: {}", other))),
    }
}

pub fn json_builder() -> JsonRuleSetBuilder<AuctionRequest, Decision> {
    let steps: Arc<dyn StepFunctionFactory<AuctionRequest>> = Arc::new(step_factory);
    let results: Arc<dyn ResultFunctionFactory<AuctionRequest, Decision>> = Arc::new(result_factory);
    JsonRuleSetBuilder::new(steps, results)
}
