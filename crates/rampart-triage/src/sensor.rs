//! Sensor parser configuration model
//!
//! The parser config wire shape the platform stores per sensor topic, plus
//! the threat-triage scoring rules the console's rule editor maintains.

use crate::error::TriageResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parser configuration for one sensor topic.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SensorParserConfig {
    pub parser_class_name: String,
    pub sensor_topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writer_class_name: Option<String>,
    #[serde(default)]
    pub parser_config: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threat_triage: Option<ThreatTriageConfig>,
}

impl SensorParserConfig {
    pub fn from_json(json: &str) -> TriageResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> TriageResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Threat-triage scoring attached to a sensor: each rule contributes its
/// score when its expression matches, combined by the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThreatTriageConfig {
    #[serde(default)]
    pub risk_level_rules: Vec<RiskLevelRule>,
    pub aggregator: String,
}

impl Default for ThreatTriageConfig {
    fn default() -> Self {
        Self {
            risk_level_rules: Vec::new(),
            aggregator: "MAX".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskLevelRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub rule: String,
    pub score: f64,
}

impl ThreatTriageConfig {
    /// Identity is the rule expression: re-submitting an expression
    /// replaces its score (and name/comment) in place.
    pub fn add_or_update_rule(&mut self, rule: RiskLevelRule) {
        match self.risk_level_rules.iter_mut().find(|r| r.rule == rule.rule) {
            Some(existing) => *existing = rule,
            None => self.risk_level_rules.push(rule),
        }
    }

    /// Removes the rule with the given expression; no-op when absent.
    pub fn remove_rule(&mut self, rule_expression: &str) {
        self.risk_level_rules.retain(|r| r.rule != rule_expression);
    }
}
