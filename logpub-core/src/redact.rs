//! The redaction stage: applies the compiled rule set in order.
//!
//! Every rule is idempotent on text it has already redacted, so the stage
//! may safely be exercised on partially processed input.
//!
//! License: MIT OR Apache-2.0

use anyhow::Result;
use log::debug;
use std::sync::Arc;

use crate::engine::{RunSummary, TextTransform};
use crate::sanitizers::compiler::{CompiledAction, CompiledRule, CompiledRules};

/// Applies the compiled redaction rules, counting hits per rule.
pub struct Redactor {
    rules: Arc<CompiledRules>,
}

impl Redactor {
    pub fn new(rules: Arc<CompiledRules>) -> Self {
        Self { rules }
    }
}

impl TextTransform for Redactor {
    fn name(&self) -> &'static str {
        "redact"
    }

    fn apply(&self, input: &str, summary: &mut RunSummary) -> Result<String> {
        let mut text = input.to_string();
        for rule in &self.rules.rules {
            if let Some((next, hits)) = apply_rule(rule, &text) {
                debug!("Rule '{}' redacted {} occurrence(s).", rule.name, hits);
                summary.record(&rule.name, hits);
                text = next;
            }
        }
        Ok(text)
    }
}

/// Applies one rule, returning the rewritten text and the hit count, or
/// `None` when the rule matched nothing.
fn apply_rule(rule: &CompiledRule, text: &str) -> Option<(String, usize)> {
    match &rule.action {
        CompiledAction::Replace {
            regex,
            replace_with,
        } => {
            let hits = regex.find_iter(text).count();
            if hits == 0 {
                return None;
            }
            Some((
                regex.replace_all(text, replace_with.as_str()).into_owned(),
                hits,
            ))
        }
        CompiledAction::Delimited {
            start_marker,
            end_marker,
            replace_with,
            max_passes,
        } => {
            let mut current = text.to_string();
            let mut hits = 0;
            // The block can legitimately recur; a pass that leaves the
            // length unchanged means there is nothing further to redact.
            for _ in 0..*max_passes {
                let redacted = redact_between(&current, start_marker, end_marker, replace_with);
                if redacted.len() == current.len() {
                    break;
                }
                current = redacted;
                hits += 1;
            }
            if hits == 0 {
                return None;
            }
            Some((current, hits))
        }
    }
}

/// Replaces everything strictly between the first occurrence of
/// `start_marker` and the first occurrence of `end_marker`, keeping both
/// markers. A no-op when either marker is absent or the end does not follow
/// the start.
pub fn redact_between(
    text: &str,
    start_marker: &str,
    end_marker: &str,
    replacement: &str,
) -> String {
    let (Some(start), Some(end)) = (text.find(start_marker), text.find(end_marker)) else {
        return text.to_string();
    };
    let keep_to = start + start_marker.len();
    if end < keep_to {
        return text.to_string();
    }
    let mut result = String::with_capacity(keep_to + replacement.len() + text.len() - end);
    result.push_str(&text[..keep_to]);
    result.push_str(replacement);
    result.push_str(&text[end..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PublishOptions, RedactionConfig};
    use crate::engine::RunSummary;
    use crate::host::HostEnvironment;
    use crate::sanitizers::compiler::get_or_compile_rules;
    use std::path::PathBuf;

    fn default_redactor() -> Redactor {
        let config = RedactionConfig::load_default_rules().unwrap();
        let host = HostEnvironment::new(
            PathBuf::from("/opt/games/rimworld"),
            PathBuf::from("/home/player"),
        );
        let compiled = get_or_compile_rules(&config, &host, &PublishOptions::default()).unwrap();
        Redactor::new(compiled)
    }

    #[test]
    fn redact_between_keeps_both_markers() {
        let out = redact_between("ab START secret END cd", "START", "END", "[gone] ");
        assert_eq!(out, "ab START[gone] END cd");
    }

    #[test]
    fn redact_between_is_a_noop_without_markers() {
        assert_eq!(redact_between("abc", "START", "END", "x"), "abc");
        assert_eq!(redact_between("ab END cd", "START", "END", "x"), "ab END cd");
    }

    #[test]
    fn redact_between_rejects_end_before_start() {
        let input = "END then START later";
        assert_eq!(redact_between(input, "START", "END", "x"), input);
    }

    #[test]
    fn install_path_is_redacted_everywhere() {
        let redactor = default_redactor();
        let mut summary = RunSummary::default();
        let input = "Mono path[0] = '/opt/games/rimworld/Managed'\nloading /opt/games/rimworld/core\n";
        let out = redactor.apply(input, &mut summary).unwrap();
        assert!(!out.contains("/opt/games/rimworld"));
        assert!(out.contains("[Install_dir]/Managed"));
        assert_eq!(summary.rule_hits[0].rule_name, "install_path");
        assert_eq!(summary.rule_hits[0].occurrences, 2);
    }

    #[test]
    fn home_path_is_redacted_case_insensitively() {
        let redactor = default_redactor();
        let mut summary = RunSummary::default();
        let input = "config at /HOME/Player/.config and /home/player/.cache\n";
        let out = redactor.apply(input, &mut summary).unwrap();
        assert!(out.contains("[Home_dir]/.config"));
        assert!(out.contains("[Home_dir]/.cache"));
    }

    #[test]
    fn steam_id_lines_are_replaced() {
        let redactor = default_redactor();
        let mut summary = RunSummary::default();
        let input = "ok\nSteamworks: SetMinidumpSteamID(123456789)\nok\n";
        let out = redactor.apply(input, &mut summary).unwrap();
        assert_eq!(out, "ok\n[Steam Id redacted]\nok\n");
    }

    #[test]
    fn noise_lines_are_removed() {
        let redactor = default_redactor();
        let mut summary = RunSummary::default();
        let input = "keep me\nNon platform assembly: data/Managed/mod.dll (this message is harmless)\nUnloadTime: 2.5 ms\nkeep me too\n";
        let out = redactor.apply(input, &mut summary).unwrap();
        assert_eq!(out, "keep me\nkeep me too\n");
    }

    #[test]
    fn consecutive_blank_artifacts_collapse_in_one_application() {
        let redactor = default_redactor();
        let input = "a\n \n \nb\n";
        let once = redactor.apply(input, &mut RunSummary::default()).unwrap();
        assert_eq!(once, "a\nb\n");
        let twice = redactor.apply(&once, &mut RunSummary::default()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn rules_without_matches_leave_the_text_alone() {
        let redactor = default_redactor();
        let input = "nothing sensitive here\n";
        let mut summary = RunSummary::default();
        let out = redactor.apply(input, &mut summary).unwrap();
        assert_eq!(out, input);
        assert!(summary.rule_hits.is_empty());
    }

    #[test]
    fn redaction_is_idempotent() {
        let redactor = default_redactor();
        let input = "start\n/opt/games/rimworld/file\nPlayerConnection initialized\ndetails\nInitialize engine version 2\nSteamworks: SetMinidumpSteamID(42)\n";
        let once = redactor.apply(input, &mut RunSummary::default()).unwrap();
        let twice = redactor.apply(&once, &mut RunSummary::default()).unwrap();
        assert_eq!(once, twice);
    }
}
