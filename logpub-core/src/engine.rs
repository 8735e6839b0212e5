//! Defines the `TextTransform` stage trait and the `LogPipeline` runner.
//!
//! Each pipeline stage is a deterministic, pure text-to-text transform with
//! no shared mutable state, so stages can be unit-tested in isolation and
//! swapped behind the trait. The pipeline applies them in a fixed order:
//! normalize, redact, consolidate, bound.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::debug;

use crate::bound::SizeBounder;
use crate::config::{PublishOptions, RedactionConfig};
use crate::consolidate::RepetitionConsolidator;
use crate::host::HostEnvironment;
use crate::normalize::LineEndingNormalizer;
use crate::redact::Redactor;
use crate::sanitizers::compiler::get_or_compile_rules;

/// Occurrence count for one redaction rule during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHit {
    pub rule_name: String,
    pub occurrences: usize,
}

/// What happened during one pipeline run.
///
/// Counts only; no redacted samples are retained, so the summary itself is
/// always safe to print.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Per-rule hit counts, in rule application order.
    pub rule_hits: Vec<RuleHit>,
    /// Set when the consolidator degraded to a best-effort passthrough.
    pub consolidation_degraded: bool,
    /// Set when the size bounder trimmed the log.
    pub truncated: bool,
}

impl RunSummary {
    pub fn record(&mut self, rule_name: &str, occurrences: usize) {
        if let Some(hit) = self.rule_hits.iter_mut().find(|h| h.rule_name == rule_name) {
            hit.occurrences += occurrences;
        } else {
            self.rule_hits.push(RuleHit {
                rule_name: rule_name.to_string(),
                occurrences,
            });
        }
    }

    pub fn total_redactions(&self) -> usize {
        self.rule_hits.iter().map(|h| h.occurrences).sum()
    }
}

/// A single stage of the preparation pipeline.
pub trait TextTransform: Send + Sync {
    /// Stable stage name, used in logs and error context.
    fn name(&self) -> &'static str;

    /// Applies the transform, recording anything noteworthy in the summary.
    ///
    /// Recoverable stage trouble must be absorbed here (degrading the output
    /// and flagging the summary); an `Err` is reserved for failures the
    /// pipeline cannot continue past.
    fn apply(&self, input: &str, summary: &mut RunSummary) -> Result<String>;
}

/// The ordered text-transformation pipeline.
pub struct LogPipeline {
    stages: Vec<Box<dyn TextTransform>>,
}

impl LogPipeline {
    /// Builds the standard pipeline for a rule set, host environment and
    /// options: line-ending normalization, the redaction rule set,
    /// repetition consolidation and the size bound.
    pub fn new(
        config: &RedactionConfig,
        host: &HostEnvironment,
        options: PublishOptions,
    ) -> Result<Self> {
        let compiled = get_or_compile_rules(config, host, &options)
            .context("Failed to compile redaction rules for the pipeline")?;

        Ok(Self {
            stages: vec![
                Box::new(LineEndingNormalizer),
                Box::new(Redactor::new(compiled)),
                Box::new(RepetitionConsolidator),
                Box::new(SizeBounder::from_options(&options)),
            ],
        })
    }

    /// Runs every stage in order over the raw log text.
    pub fn run(&self, raw: &str) -> Result<(String, RunSummary)> {
        let mut summary = RunSummary::default();
        let mut text = raw.to_string();

        for stage in &self.stages {
            text = stage
                .apply(&text, &mut summary)
                .with_context(|| format!("Pipeline stage '{}' failed", stage.name()))?;
            debug!("Stage '{}' complete ({} bytes).", stage.name(), text.len());
        }

        Ok((text, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_merges_repeat_hits_per_rule() {
        let mut summary = RunSummary::default();
        summary.record("steam_id", 2);
        summary.record("home_path", 1);
        summary.record("steam_id", 3);

        assert_eq!(summary.rule_hits.len(), 2);
        assert_eq!(summary.rule_hits[0].occurrences, 5);
        assert_eq!(summary.total_redactions(), 6);
    }
}
