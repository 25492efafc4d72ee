//! Shared fixtures for cache tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rulesengine_core::{
    FnResultFunction, FnStepFunction, FunctionError, RawValue, ResultFunction,
    ResultFunctionFactory, ResultFunctionMeta, StepFunction, StepFunctionFactory,
};
use rulesengine_parser::JsonRuleSetBuilder;
use rulesengine_repository::{
    ConfigSource, FetchedConfig, MemoryConfigSource, RepositoryError, RepositoryResult,
};
use rulesengine_runtime::{CacheError, SweepObserver};
use serde::Deserialize;

pub const STAGE: &str = "processed-auction-request";
pub const RULE_SET: &str = "exclude-by-country";

/// Payload: the device country
pub type Country = String;

/// Result: excluded bidders
pub type Excluded = Vec<String>;

/// Configuration excluding `bidder` for requests from `country`
pub fn exclusion_config(country: &str, bidder: &str) -> String {
    format!(
        r#"{{
            "enabled": true,
            "ruleSets": [{{
                "stage": "{stage}",
                "name": "{name}",
                "modelGroups": [{{
                    "version": "1.0",
                    "analyticsKey": "exclusions",
                    "schema": [{{"function": "deviceCountry"}}],
                    "default": [{{"function": "excludeBidders", "args": {{"bidders": ["fallback"]}}}}],
                    "rules": [{{
                        "conditions": ["{country}"],
                        "results": [{{"function": "excludeBidders", "args": {{"bidders": ["{bidder}"]}}}}]
                    }}]
                }}]
            }}]
        }}"#,
        stage = STAGE,
        name = RULE_SET,
        country = country,
        bidder = bidder
    )
}

/// Configuration whose rules have uneven depths
pub fn uneven_config() -> String {
    format!(
        r#"{{"ruleSets": [{{"stage": "{}", "name": "{}", "modelGroups": [{{
            "schema": [{{"function": "deviceCountry"}}, {{"function": "deviceCountry"}}],
            "rules": [
                {{"conditions": ["JPN", "JPN"], "results": []}},
                {{"conditions": ["USA"], "results": []}}
            ]
        }}]}}]}}"#,
        STAGE, RULE_SET
    )
}

#[derive(Deserialize)]
struct ExcludeArgs {
    bidders: Vec<String>,
}

fn step_factory(
    name: &str,
    _args: &RawValue,
) -> Result<Box<dyn StepFunction<Country>>, FunctionError> {
    match name {
        "deviceCountry" => Ok(Box::new(FnStepFunction::new(
            "deviceCountry",
            |country: &Country| -> Result<String, FunctionError> { Ok(country.clone()) },
        ))),
        other => Err(FunctionError::new(format!("unknown step function: {}", other))),
    }
}

fn result_factory(
    name: &str,
    args: &RawValue,
) -> Result<Box<dyn ResultFunction<Country, Excluded>>, FunctionError> {
    match name {
        "excludeBidders" => {
            let ExcludeArgs { bidders } = serde_json::from_str(args.get())
                .map_err(|e| FunctionError::new(e.to_string()))?;
            Ok(Box::new(FnResultFunction::new(
                move |_: &Country,
                      excluded: &mut Excluded,
                      _: &ResultFunctionMeta|
                      -> Result<(), FunctionError> {
                    excluded.extend(bidders.iter().cloned());
                    Ok(())
                },
            )))
        }
        other => Err(FunctionError::new(format!("unknown result function: {}", other))),
    }
}

pub fn json_builder() -> Arc<JsonRuleSetBuilder<Country, Excluded>> {
    let steps: Arc<dyn StepFunctionFactory<Country>> = Arc::new(step_factory);
    let results: Arc<dyn ResultFunctionFactory<Country, Excluded>> = Arc::new(result_factory);
    Arc::new(JsonRuleSetBuilder::new(steps, results))
}

/// In-memory source that counts fetches and can be made to fail, stall or
/// block
#[derive(Default)]
pub struct TestSource {
    inner: MemoryConfigSource,
    fetches: AtomicUsize,
    failing: AtomicBool,
    delay: Mutex<Option<Duration>>,
    pub hold: tokio::sync::Mutex<()>,
}

impl TestSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn put(&self, id: &str, config: impl Into<Vec<u8>>) {
        self.inner.insert(id, config).await;
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }
}

#[async_trait]
impl ConfigSource for TestSource {
    async fn fetch(&self, id: &str) -> RepositoryResult<FetchedConfig> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let _held = self.hold.lock().await;

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Other("source unavailable".to_string()));
        }
        self.inner.fetch(id).await
    }
}

/// Observed sweep event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Refreshed(String),
    Rebuilt(String),
    Failed { id: String, kind: &'static str },
}

/// Observer that records every event
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl SweepObserver for RecordingObserver {
    fn on_refreshed(&self, id: &str) {
        self.events.lock().unwrap().push(Event::Refreshed(id.to_string()));
    }

    fn on_rebuilt(&self, id: &str) {
        self.events.lock().unwrap().push(Event::Rebuilt(id.to_string()));
    }

    fn on_failure(&self, id: &str, error: &CacheError) {
        self.events.lock().unwrap().push(Event::Failed {
            id: id.to_string(),
            kind: error.kind(),
        });
    }
}
