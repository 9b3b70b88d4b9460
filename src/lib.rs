//! simbatch: generate batches of parameterized YAML files and scheduler job
//! files from a single annotated template.
//!
//! A template declares an integer range (`%range BEGIN END%`), a payload jar
//! (`%jar PATH%`), a scheduler kind (`%jobmanager SGE%` or `SLURM`), a YAML
//! body (`%yaml begin% ... %yaml end%`) and one or more job-file bodies.
//! [`create`] writes one YAML file per index plus a single array-job file;
//! [`submit`] hands job files to `qsub`/`sbatch`.
//!
//! Template expressions (`%eval EXPR%` and the `%exec begin%` preamble) use a
//! closed arithmetic grammar with a fixed function whitelist. They cannot run
//! arbitrary code; see [`eval`].

pub mod domain;
pub mod emit;
pub mod eval;
pub mod submit;
pub mod template;

use std::fs;
use std::path::{Path, PathBuf};

pub use domain::{AppError, FloatSpacing, JobConfig, Scheduler};

/// Options for a `create` run.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Path to the annotated template file.
    pub input: PathBuf,
    /// Output directory override; wins over the template's `%output%` block.
    pub output: Option<PathBuf>,
    /// Scheduler kind override; wins over the template's `%jobmanager%`
    /// marker. Validated against the closed scheduler set.
    pub scheduler: Option<String>,
    /// Endpoint behavior for `%f%` float ranges.
    pub float_spacing: FloatSpacing,
}

/// Summary of a completed `create` run.
#[derive(Debug, Clone)]
pub struct CreateOutcome {
    /// Number of per-index configuration files written.
    pub config_files: usize,
    /// Path of the composed job file.
    pub job_file: PathBuf,
    /// Directory all files were written into.
    pub output_dir: PathBuf,
    /// Scheduler the run resolved to.
    pub scheduler: Scheduler,
}

/// Parse a template file and emit its configuration and job files.
///
/// The output directory is cleared of regular files first, so re-running
/// never leaves stale entries behind.
pub fn create(options: &CreateOptions) -> Result<CreateOutcome, AppError> {
    let text = fs::read_to_string(&options.input)?;
    let job_name = options
        .input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("batch")
        .to_string();

    let config = template::parse_template(
        &text,
        &job_name,
        options.output.as_deref(),
        options.scheduler.as_deref(),
    )?;
    let output_dir = config.output_dir.clone().ok_or(AppError::MissingOutputPath)?;

    emit::clear_output_dir(&output_dir)?;
    let config_files = emit::emit_config_files(&config, &output_dir, options.float_spacing)?;
    let job_file = emit::compose_job_file(&config, &output_dir)?;

    Ok(CreateOutcome { config_files, job_file, output_dir, scheduler: config.scheduler })
}

/// Submit every job file in `dir` matching `scheduler`'s file extension.
/// Returns the number of files submitted.
pub fn submit(dir: &Path, scheduler: Scheduler) -> Result<usize, AppError> {
    submit::submit_jobs(dir, scheduler)
}
