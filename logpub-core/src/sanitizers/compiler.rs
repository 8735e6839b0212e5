//! compiler.rs - Manages the compilation and caching of redaction rules.
//!
//! Turns a `RedactionConfig` plus the host environment into `CompiledRules`
//! ready for application. Path rules are resolved against the host here, and
//! platform-gated rules are dropped when the run keeps platform information.
//! A global, shared cache avoids redundant compilation.
//!
//! License: MIT OR Apache-2.0

use anyhow::Result;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::config::{PublishOptions, RedactionConfig, RuleKind, MAX_PATTERN_LENGTH};
use crate::errors::PublishError;
use crate::host::HostEnvironment;

/// Shortest path string the path rules will redact. Anything shorter (e.g.
/// a bare `/`) would shred the whole log.
const MIN_PATH_LENGTH: usize = 2;

/// The compiled form of a single rule's transform.
#[derive(Debug)]
pub enum CompiledAction {
    /// Global regex replacement.
    Replace { regex: Regex, replace_with: String },
    /// Bounded delimited-range replacement between two literal markers.
    Delimited {
        start_marker: String,
        end_marker: String,
        replace_with: String,
        max_passes: usize,
    },
}

/// A single compiled redaction rule.
#[derive(Debug)]
pub struct CompiledRule {
    /// The unique name of the redaction rule.
    pub name: String,
    pub action: CompiledAction,
}

/// All compiled rules for one run, in application order.
#[derive(Debug)]
pub struct CompiledRules {
    pub rules: Vec<CompiledRule>,
}

lazy_static! {
    /// A thread-safe, global cache for compiled rules, keyed by a hash of
    /// the config, host paths and gating options.
    static ref COMPILED_RULES_CACHE: RwLock<HashMap<u64, Arc<CompiledRules>>> =
        RwLock::new(HashMap::new());
}

fn cache_key(config: &RedactionConfig, host: &HostEnvironment, options: &PublishOptions) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.hash(&mut hasher);
    host.install_dir.hash(&mut hasher);
    host.home_dir.hash(&mut hasher);
    options.include_platform_info.hash(&mut hasher);
    hasher.finish()
}

fn build_literal_regex(literal: &str, case_insensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(literal))
        .case_insensitive(case_insensitive)
        .size_limit(10 * (1 << 20))
        .build()
}

fn compile_pattern(
    name: &str,
    pattern: &str,
    case_insensitive: bool,
) -> Result<Regex, PublishError> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(PublishError::PatternLengthExceeded(
            name.to_string(),
            pattern.len(),
            MAX_PATTERN_LENGTH,
        ));
    }
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
        .build()
        .map_err(|e| PublishError::RuleCompilationError(name.to_string(), e))
}

/// Expands a path rule into literal replacement rules for the given path.
///
/// Returns no rules when the path is too short to redact safely. On
/// platforms whose native separator is not `/`, a forward-slash variant is
/// added as well, since logs mix separator styles.
fn compile_path_rule(
    name: &str,
    path: &std::path::Path,
    replace_with: &str,
    case_insensitive: bool,
) -> Result<Vec<CompiledRule>, PublishError> {
    let native = path.to_string_lossy();
    if native.len() < MIN_PATH_LENGTH {
        warn!(
            "Skipping rule '{}': path '{}' is too short to redact safely.",
            name, native
        );
        return Ok(Vec::new());
    }

    let mut compiled = Vec::new();
    let regex = build_literal_regex(&native, case_insensitive)
        .map_err(|e| PublishError::RuleCompilationError(name.to_string(), e))?;
    compiled.push(CompiledRule {
        name: name.to_string(),
        action: CompiledAction::Replace {
            regex,
            replace_with: replace_with.to_string(),
        },
    });

    if std::path::MAIN_SEPARATOR != '/' {
        let forward = native.replace(std::path::MAIN_SEPARATOR, "/");
        if forward != native {
            let regex = build_literal_regex(&forward, case_insensitive)
                .map_err(|e| PublishError::RuleCompilationError(name.to_string(), e))?;
            compiled.push(CompiledRule {
                name: name.to_string(),
                action: CompiledAction::Replace {
                    regex,
                    replace_with: replace_with.to_string(),
                },
            });
        }
    }

    Ok(compiled)
}

/// Compiles a rule set against the host environment.
///
/// This is the low-level function that performs the actual compilation;
/// `get_or_compile_rules` is the cached entry point.
pub fn compile_rules(
    config: &RedactionConfig,
    host: &HostEnvironment,
    options: &PublishOptions,
) -> Result<CompiledRules, PublishError> {
    debug!("Starting compilation of {} rules.", config.rules.len());

    let mut compiled_rules = Vec::new();

    for rule in &config.rules {
        if rule.platform_gated && options.include_platform_info {
            debug!(
                "Skipping platform-gated rule '{}': platform info is included.",
                rule.name
            );
            continue;
        }

        match &rule.kind {
            RuleKind::Pattern {
                pattern,
                replace_with,
                case_insensitive,
            } => {
                let regex = compile_pattern(&rule.name, pattern, *case_insensitive)?;
                compiled_rules.push(CompiledRule {
                    name: rule.name.clone(),
                    action: CompiledAction::Replace {
                        regex,
                        replace_with: replace_with.clone(),
                    },
                });
            }
            RuleKind::InstallPath { replace_with } => {
                compiled_rules.extend(compile_path_rule(
                    &rule.name,
                    &host.install_dir,
                    replace_with,
                    false,
                )?);
            }
            RuleKind::HomePath { replace_with } => {
                compiled_rules.extend(compile_path_rule(
                    &rule.name,
                    &host.home_dir,
                    replace_with,
                    true,
                )?);
            }
            RuleKind::Delimited {
                start_marker,
                end_marker,
                replace_with,
                max_passes,
            } => {
                compiled_rules.push(CompiledRule {
                    name: rule.name.clone(),
                    action: CompiledAction::Delimited {
                        start_marker: start_marker.clone(),
                        end_marker: end_marker.clone(),
                        replace_with: replace_with.clone(),
                        max_passes: *max_passes,
                    },
                });
            }
        }
    }

    debug!(
        "Finished compiling rules. Total compiled: {}.",
        compiled_rules.len()
    );
    Ok(CompiledRules {
        rules: compiled_rules,
    })
}

/// Gets a `CompiledRules` instance from the cache or compiles it if missing.
///
/// Returns an `Arc`, allowing cheap sharing between pipeline stages.
pub fn get_or_compile_rules(
    config: &RedactionConfig,
    host: &HostEnvironment,
    options: &PublishOptions,
) -> Result<Arc<CompiledRules>> {
    let key = cache_key(config, host, options);

    {
        let cache = COMPILED_RULES_CACHE.read().unwrap();
        if let Some(rules) = cache.get(&key) {
            debug!("Serving compiled rules from cache for key: {}", key);
            return Ok(Arc::clone(rules));
        }
    }

    debug!("Compiled rules not found in cache. Compiling now.");
    let compiled = Arc::new(compile_rules(config, host, options)?);

    COMPILED_RULES_CACHE
        .write()
        .unwrap()
        .insert(key, Arc::clone(&compiled));

    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn host() -> HostEnvironment {
        HostEnvironment::new(PathBuf::from("/opt/game"), PathBuf::from("/home/player"))
    }

    #[test]
    fn platform_gated_rules_are_dropped_when_platform_info_is_kept() {
        let config = RedactionConfig::load_default_rules().unwrap();
        let options = PublishOptions {
            include_platform_info: true,
            ..Default::default()
        };
        let compiled = compile_rules(&config, &host(), &options).unwrap();
        assert!(!compiled.rules.iter().any(|r| r.name == "renderer_info"));

        let compiled = compile_rules(&config, &host(), &PublishOptions::default()).unwrap();
        assert!(compiled.rules.iter().any(|r| r.name == "renderer_info"));
    }

    #[test]
    fn too_short_paths_are_skipped() {
        let env = HostEnvironment::new(PathBuf::from("/"), PathBuf::from("/home/player"));
        let config = RedactionConfig::load_default_rules().unwrap();
        let compiled = compile_rules(&config, &env, &PublishOptions::default()).unwrap();
        assert!(!compiled.rules.iter().any(|r| r.name == "install_path"));
        assert!(compiled.rules.iter().any(|r| r.name == "home_path"));
    }

    #[test]
    fn overlong_patterns_fail_compilation() {
        let pattern = "a".repeat(MAX_PATTERN_LENGTH + 1);
        let err = compile_pattern("huge", &pattern, false).unwrap_err();
        assert!(matches!(err, PublishError::PatternLengthExceeded(..)));

        let err = compile_pattern("broken", "(unclosed", false).unwrap_err();
        assert!(matches!(err, PublishError::RuleCompilationError(..)));
    }

    #[test]
    fn cache_returns_shared_instances() {
        let config = RedactionConfig::load_default_rules().unwrap();
        let options = PublishOptions::default();
        let a = get_or_compile_rules(&config, &host(), &options).unwrap();
        let b = get_or_compile_rules(&config, &host(), &options).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
