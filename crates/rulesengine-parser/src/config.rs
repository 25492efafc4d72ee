//! JSON configuration model
//!
//! ```json
//! {
//!   "enabled": true,
//!   "ruleSets": [{
//!     "stage": "processed-auction-request",
//!     "name": "exclude-in-jpn",
//!     "modelGroups": [{
//!       "weight": 100,
//!       "version": "1.0",
//!       "analyticsKey": "experiment-name",
//!       "schema": [{ "function": "deviceCountry" }],
//!       "default": [{ "function": "logATag", "args": { "analyticsValue": "default" } }],
//!       "rules": [{
//!         "conditions": ["JPN"],
//!         "results": [{ "function": "excludeBidders", "args": { "bidders": ["bidderA"] } }]
//!       }]
//!     }]
//!   }]
//! }
//! ```

use serde::Deserialize;
use serde_json::value::RawValue;

use crate::error::Result;

/// Top level configuration for one identifier
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesConfig {
    /// Disabled configurations compile to no rule sets
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub rule_sets: Vec<RuleSetConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSetConfig {
    pub stage: String,
    pub name: String,

    #[serde(default)]
    pub model_groups: Vec<ModelGroupConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelGroupConfig {
    #[serde(default = "default_weight")]
    pub weight: i32,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub analytics_key: String,

    /// Step function per tree level
    #[serde(default)]
    pub schema: Vec<FunctionConfig>,

    /// Result functions used when traversal misses
    #[serde(default)]
    pub default: Vec<FunctionConfig>,

    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// A function reference: factory name plus raw JSON arguments
#[derive(Debug, Deserialize)]
pub struct FunctionConfig {
    pub function: String,

    #[serde(default)]
    pub args: Option<Box<RawValue>>,
}

/// One root-to-leaf path and the result functions at its end
#[derive(Debug, Deserialize)]
pub struct RuleConfig {
    pub conditions: Vec<String>,

    #[serde(default)]
    pub results: Vec<FunctionConfig>,
}

/// Parses raw configuration bytes
pub struct ConfigParser;

impl ConfigParser {
    /// Parse configuration from raw JSON bytes
    pub fn parse(raw: &[u8]) -> Result<RulesConfig> {
        Ok(serde_json::from_slice(raw)?)
    }

    /// Parse configuration from a JSON string
    pub fn parse_str(json: &str) -> Result<RulesConfig> {
        Self::parse(json.as_bytes())
    }
}

fn default_true() -> bool {
    true
}

fn default_weight() -> i32 {
    100
}
