//! Configuration management for `logpub-core`.
//!
//! This module defines the redaction rule model and the runtime options that
//! control the pipeline. Rules are an *ordered* list: they are applied in
//! declaration order, because later rules may rely on earlier redactions
//! having already happened. The built-in set ships as an embedded YAML file.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Upper bound on `max_passes` for delimited-range rules.
pub const MAX_DELIMITED_PASSES: usize = 16;

/// The transform a rule performs, tagged by `kind` in the YAML file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleKind {
    /// A regex applied globally with a literal replacement.
    Pattern {
        pattern: String,
        replace_with: String,
        #[serde(default)]
        case_insensitive: bool,
    },
    /// Literal redaction of the host-supplied installation directory,
    /// resolved when the rule set is compiled. On platforms whose native
    /// separator is not `/`, the forward-slash spelling of the same path is
    /// redacted as well, since logs mix separator styles.
    InstallPath { replace_with: String },
    /// Case-insensitive literal redaction of the host-supplied home
    /// directory, resolved when the rule set is compiled.
    HomePath { replace_with: String },
    /// Replaces everything between the first occurrence of `start_marker`
    /// (which is kept) and the first occurrence of `end_marker` (also kept).
    /// A no-op when either marker is absent or the end precedes the start.
    /// Applied up to `max_passes` times; a pass that changes nothing stops
    /// the loop early.
    Delimited {
        start_marker: String,
        end_marker: String,
        replace_with: String,
        #[serde(default = "default_max_passes")]
        max_passes: usize,
    },
}

fn default_max_passes() -> usize {
    1
}

/// A single redaction rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct RedactionRule {
    /// Unique identifier for the rule (e.g., "steam_id").
    pub name: String,
    /// Human-readable description of what the rule targets.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub kind: RuleKind,
    /// If true, the rule is skipped when the run opts to include platform
    /// information in the report.
    #[serde(default)]
    pub platform_gated: bool,
}

/// The ordered rule set for one pipeline run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct RedactionConfig {
    pub rules: Vec<RedactionRule>,
}

impl RedactionConfig {
    /// Loads redaction rules from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading custom rules from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: RedactionConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_rules(&config.rules)?;
        info!("Loaded {} rules from file {}.", config.rules.len(), path.display());

        Ok(config)
    }

    /// Loads the built-in rule set from the embedded configuration.
    pub fn load_default_rules() -> Result<Self> {
        debug!("Loading default rules from embedded string...");
        let default_yaml = include_str!("../config/default_rules.yaml");
        let config: RedactionConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default rules")?;

        debug!("Loaded {} default rules.", config.rules.len());
        Ok(config)
    }
}

/// Validates rule integrity (names, regex compilation, marker sanity).
pub fn validate_rules(rules: &[RedactionRule]) -> Result<()> {
    let mut rule_names = HashSet::new();
    let mut errors = Vec::new();

    for rule in rules {
        if rule.name.is_empty() {
            errors.push("A rule has an empty `name` field.".to_string());
        } else if !rule_names.insert(rule.name.clone()) {
            errors.push(format!("Duplicate rule name found: '{}'.", rule.name));
        }

        match &rule.kind {
            RuleKind::Pattern { pattern, .. } => {
                if pattern.is_empty() {
                    errors.push(format!("Rule '{}' has an empty `pattern` field.", rule.name));
                    continue;
                }
                if pattern.len() > MAX_PATTERN_LENGTH {
                    errors.push(format!(
                        "Rule '{}': pattern length ({}) exceeds maximum allowed ({}).",
                        rule.name,
                        pattern.len(),
                        MAX_PATTERN_LENGTH
                    ));
                    continue;
                }
                if let Err(e) = Regex::new(pattern) {
                    errors.push(format!(
                        "Rule '{}' has an invalid regex pattern: {}",
                        rule.name, e
                    ));
                }
            }
            RuleKind::Delimited {
                start_marker,
                end_marker,
                max_passes,
                ..
            } => {
                if start_marker.is_empty() || end_marker.is_empty() {
                    errors.push(format!(
                        "Rule '{}' has an empty delimiter marker.",
                        rule.name
                    ));
                }
                if *max_passes == 0 || *max_passes > MAX_DELIMITED_PASSES {
                    errors.push(format!(
                        "Rule '{}': `max_passes` must be between 1 and {}.",
                        rule.name, MAX_DELIMITED_PASSES
                    ));
                }
            }
            RuleKind::InstallPath { replace_with } | RuleKind::HomePath { replace_with } => {
                if replace_with.is_empty() {
                    errors.push(format!(
                        "Rule '{}' has an empty `replace_with` field.",
                        rule.name
                    ));
                }
            }
        }
    }

    if !errors.is_empty() {
        Err(anyhow!("Rule validation failed:\n{}", errors.join("\n")))
    } else {
        Ok(())
    }
}

/// Transport that will ultimately receive the report payload.
///
/// The pipeline itself never performs the transfer; the choice only matters
/// because some transports hard-cap the payload size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    #[default]
    Gist,
    Paste,
}

impl Transport {
    /// The paste transport enforces the line limit regardless of options.
    pub fn enforces_line_limit(&self) -> bool {
        matches!(self, Transport::Paste)
    }
}

/// Options controlling one report-preparation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct PublishOptions {
    /// Keep renderer/platform details in the report instead of redacting them.
    pub include_platform_info: bool,
    /// Skip the line-count bound, if the transport permits it.
    pub allow_unlimited_log_size: bool,
    /// The input is the log of the previous launch rather than the current one.
    pub use_previous_log: bool,
    /// Transport the payload is destined for.
    pub transport: Transport,
}

impl PublishOptions {
    /// Whether the size bounder should run for these options.
    pub fn enforce_line_limit(&self) -> bool {
        !self.allow_unlimited_log_size || self.transport.enforces_line_limit()
    }
}
