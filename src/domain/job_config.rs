use std::path::PathBuf;

use super::range::{FloatRange, int_range};
use super::scheduler::Scheduler;

/// Parsed template state for one generation run.
///
/// Built only by [`crate::template::parse_template`] and never mutated
/// afterwards; per-index substitution works on transient clones of the
/// template strings.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Job name, derived from the template file stem.
    pub job_name: String,
    /// Path to the payload jar, from `%jar PATH%`.
    pub jar_path: String,
    /// Resolved scheduler kind.
    pub scheduler: Scheduler,
    /// Body of the `%yaml begin%` block, with `%f BEGIN END%` directives
    /// already rewritten to positional `%f<k>%` markers.
    pub yaml_template: String,
    /// Generic `%job begin%` block, if present.
    pub job_template: Option<String>,
    /// `%SGE job begin%` block, if present.
    pub sge_job_template: Option<String>,
    /// `%SLURM job begin%` block, if present.
    pub slurm_job_template: Option<String>,
    /// Inclusive lower range bound from `%range BEGIN END%`.
    pub i0: i64,
    /// Inclusive upper range bound. Always `>= i0`.
    pub i1: i64,
    /// Float ranges in order of first appearance in the YAML template.
    pub float_ranges: Vec<FloatRange>,
    /// `%exec begin%` preamble, if present.
    pub preamble: Option<String>,
    /// Resolved output directory, if any.
    pub output_dir: Option<PathBuf>,
}

impl JobConfig {
    /// The closed integer index sequence.
    pub fn int_range(&self) -> Vec<i64> {
        int_range(self.i0, self.i1)
    }

    /// Number of configuration files the emitter will produce.
    pub fn index_count(&self) -> usize {
        (self.i1 - self.i0 + 1) as usize
    }

    /// Job template body applicable to the resolved scheduler: the
    /// scheduler-specific block wins, the generic block is the fallback.
    pub fn applicable_job_template(&self) -> Option<&String> {
        let specific = match self.scheduler {
            Scheduler::Sge => self.sge_job_template.as_ref(),
            Scheduler::Slurm => self.slurm_job_template.as_ref(),
        };
        specific.or(self.job_template.as_ref())
    }
}
